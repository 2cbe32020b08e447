//! Server-rendered HTML dashboard page

use crate::chart::escape;
use crate::dashboard::{DashboardError, DashboardView, Severity};
use crate::format::Cell;
use crate::instrument::InstrumentCatalog;
use crate::pipeline::WeekWindow;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; background: #fafafa; color: #222; }
form { display: flex; gap: 2rem; align-items: end; margin-bottom: 1.5rem; }
.banner { padding: 0.8rem 1rem; border-radius: 4px; margin: 1rem 0; }
.banner.error { background: #fde2e1; color: #8a1f17; }
.banner.warning { background: #fff4d6; color: #7a5a00; }
.banner.info { background: #e3efff; color: #0b3d7a; }
.metrics { display: flex; gap: 3rem; margin: 1rem 0; }
.metric .label { font-size: 0.85rem; color: #555; }
.metric .value { font-size: 1.6rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; }
thead th { background-color: #002b36; color: white; padding: 0.4rem; text-align: right; }
td { padding: 0.3rem 0.4rem; text-align: right; border-bottom: 1px solid #ddd; }
td.positive { color: green; }
td.negative { color: red; }
"#;

/// Renders the full dashboard page for one selection.
///
/// On failure only the selector form and a banner are rendered; no table,
/// metrics, chart or download link appear below the banner.
pub fn render_page(
    catalog: &InstrumentCatalog,
    selected_key: &str,
    weeks: usize,
    outcome: Result<&DashboardView, &DashboardError>,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Smart Money Dashboard - CFTC COT</title>");
    let _ = write!(html, "<style>{}</style></head><body>", STYLE);
    html.push_str("<h1>Smart Money Dashboard - CFTC Commitments of Traders</h1>");

    render_form(&mut html, catalog, selected_key, weeks);

    match outcome {
        Ok(view) => render_view(&mut html, view),
        Err(err) => render_banner(&mut html, err.severity(), &err.user_message()),
    }

    html.push_str("</body></html>");
    html
}

fn render_form(html: &mut String, catalog: &InstrumentCatalog, selected_key: &str, weeks: usize) {
    html.push_str("<form method=\"get\" action=\"/\">");
    html.push_str("<label>Instrument<br><select name=\"instrument\" onchange=\"this.form.submit()\">");
    for instrument in catalog.iter() {
        let selected = if instrument.key.eq_ignore_ascii_case(selected_key) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape(&instrument.key),
            selected,
            escape(&instrument.label)
        );
    }
    html.push_str("</select></label>");
    let _ = write!(
        html,
        "<label>Weeks: <output id=\"weeks-out\">{w}</output><br><input type=\"range\" name=\"weeks\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{w}\" oninput=\"document.getElementById('weeks-out').value=this.value\" onchange=\"this.form.submit()\"></label>",
        w = weeks,
        min = WeekWindow::MIN,
        max = WeekWindow::MAX,
        step = WeekWindow::STEP
    );
    html.push_str("<noscript><button type=\"submit\">Show</button></noscript></form>");
}

fn render_banner(html: &mut String, severity: Severity, message: &str) {
    let class = match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    let _ = write!(
        html,
        "<div class=\"banner {}\">{}</div>",
        class,
        escape(message)
    );
}

fn render_view(html: &mut String, view: &DashboardView) {
    let _ = write!(
        html,
        "<h2>Last {} COT reports - {}</h2>",
        view.weeks,
        escape(&view.instrument.label)
    );
    let _ = write!(
        html,
        "<div class=\"banner info\">{}</div>",
        escape(&view.interpretation)
    );

    html.push_str("<div class=\"metrics\">");
    for (label, value) in [
        ("Current net position", &view.metrics.net_position),
        ("Change this week", &view.metrics.weekly_change),
        ("Latest report", &view.metrics.latest_date),
    ] {
        let _ = write!(
            html,
            "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            label,
            escape(value)
        );
    }
    html.push_str("</div>");

    html.push_str("<table><thead><tr>");
    for column in &view.table.columns {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &view.table.rows {
        let _ = write!(html, "<tr><td>{}</td>", escape(&row.date));
        for cell in [&row.longs, &row.shorts, &row.open_interest, &row.net, &row.change] {
            push_cell(html, cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    let _ = write!(
        html,
        "<h2>Non-commercial net position - {}</h2>",
        escape(&view.instrument.label)
    );
    html.push_str(&view.chart.to_svg(900, 360));

    let _ = write!(
        html,
        "<p><a href=\"/api/cot/{}/csv?weeks={}\" download=\"{}\">Download CSV</a></p>",
        escape(&view.instrument.key),
        view.weeks,
        escape(&view.instrument.csv_file_name())
    );
}

fn push_cell(html: &mut String, cell: &Cell) {
    let _ = write!(
        html,
        "<td class=\"{}\">{}</td>",
        cell.tone.css_class(),
        escape(&cell.text)
    );
}
