//! Display formatting for the dashboard.
//!
//! Everything here reads the derived series and produces strings; the numeric
//! series itself is left untouched for the chart and the CSV export.

use crate::report::CotRecord;
use serde::Serialize;

pub const NET_LONG_MARKER: &str = "🟢";
pub const NET_SHORT_MARKER: &str = "🔴";
pub const NET_FLAT_MARKER: &str = "⚪";
pub const INCREASE_MARKER: &str = "📈";
pub const DECREASE_MARKER: &str = "📉";

/// Date format used for the "latest report" metric.
pub const METRIC_DATE_FORMAT: &str = "%d/%m/%Y";

/// Renders `value` in thousands with one decimal and a "k" suffix.
///
/// 125430 -> "125.4k", -4200 -> "-4.2k".
pub fn scale_k(value: i64) -> String {
    format!("{:.1}k", value as f64 / 1000.0)
}

/// Renders an integer with comma thousands separators: -1234567 -> "-1,234,567".
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Colour hint for a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTone {
    Positive,
    Negative,
    Neutral,
}

impl CellTone {
    fn of(value: i64) -> Self {
        match value.signum() {
            1 => CellTone::Positive,
            -1 => CellTone::Negative,
            _ => CellTone::Neutral,
        }
    }

    /// CSS class used by the HTML table.
    pub fn css_class(&self) -> &'static str {
        match self {
            CellTone::Positive => "positive",
            CellTone::Negative => "negative",
            CellTone::Neutral => "neutral",
        }
    }
}

/// A formatted cell with its colour hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    pub tone: CellTone,
}

impl Cell {
    fn plain(text: String) -> Self {
        Cell {
            text,
            tone: CellTone::Neutral,
        }
    }
}

/// Net position cell: marker plus scaled value. Only positive values get a '+'.
pub fn net_cell(net: i64) -> Cell {
    let text = match net.signum() {
        1 => format!("{} +{}", NET_LONG_MARKER, scale_k(net)),
        -1 => format!("{} {}", NET_SHORT_MARKER, scale_k(net)),
        _ => format!("{} {}", NET_FLAT_MARKER, scale_k(net)),
    };
    Cell {
        text,
        tone: CellTone::of(net),
    }
}

/// Weekly change cell. An unchanged week renders as a bare "0".
pub fn change_cell(change: i64) -> Cell {
    let text = match change.signum() {
        1 => format!("{} +{}", INCREASE_MARKER, scale_k(change)),
        -1 => format!("{} {}", DECREASE_MARKER, scale_k(change)),
        _ => "0".to_string(),
    };
    Cell {
        text,
        tone: CellTone::of(change),
    }
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub date: String,
    pub longs: Cell,
    pub shorts: Cell,
    pub open_interest: Cell,
    pub net: Cell,
    pub change: Cell,
}

impl DisplayRow {
    pub fn from_record(record: &CotRecord) -> Self {
        DisplayRow {
            date: record.date.format("%Y-%m-%d").to_string(),
            longs: Cell::plain(scale_k(record.longs)),
            shorts: Cell::plain(scale_k(record.shorts)),
            open_interest: Cell::plain(scale_k(record.open_interest)),
            net: net_cell(record.net),
            change: change_cell(record.change),
        }
    }
}

/// Column headers of the COT table, in display order.
pub const TABLE_COLUMNS: [&str; 6] = ["Date", "Longs", "Shorts", "Open Interest", "Net", "Change"];

/// Styled table view of the derived series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
    pub header_background: String,
    pub header_color: String,
}

impl TableView {
    pub fn from_series(series: &[CotRecord]) -> Self {
        TableView {
            columns: TABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: series.iter().map(DisplayRow::from_record).collect(),
            header_background: "#002b36".to_string(),
            header_color: "white".to_string(),
        }
    }
}

/// Plain-language reading of the most recent week.
pub fn interpretation(latest: &CotRecord) -> String {
    let position = match latest.net.signum() {
        1 => "Non-commercials are NET LONG.",
        -1 => "Non-commercials are NET SHORT.",
        _ => "Net position is neutral.",
    };

    let movement = match latest.change.signum() {
        1 => format!(
            "This week they added {} net contracts on the long side.",
            group_thousands(latest.change)
        ),
        -1 => format!(
            "This week they cut {} net contracts, favoring the short side.",
            group_thousands(latest.change.abs())
        ),
        _ => "No significant change this week.".to_string(),
    };

    format!("{} {}", position, movement)
}

/// Headline numbers shown above the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlineMetrics {
    pub net_position: String,
    pub weekly_change: String,
    pub latest_date: String,
}

impl HeadlineMetrics {
    pub fn from_latest(latest: &CotRecord) -> Self {
        HeadlineMetrics {
            net_position: group_thousands(latest.net),
            weekly_change: group_thousands(latest.change),
            latest_date: latest.date.format(METRIC_DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(net: i64, change: i64) -> CotRecord {
        CotRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(),
            longs: 200_000 + net.max(0),
            shorts: 200_000 - net.min(0),
            open_interest: 512_990,
            net,
            change,
        }
    }

    #[test]
    fn test_scale_k() {
        assert_eq!(scale_k(125430), "125.4k");
        assert_eq!(scale_k(-4200), "-4.2k");
        assert_eq!(scale_k(0), "0.0k");
        assert_eq!(scale_k(999), "1.0k");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(150), "150");
        assert_eq!(group_thousands(1500), "1,500");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
        assert_eq!(group_thousands(100000), "100,000");
    }

    #[test]
    fn test_net_cell() {
        let long = net_cell(125430);
        assert_eq!(long.text, "🟢 +125.4k");
        assert_eq!(long.tone, CellTone::Positive);

        let short = net_cell(-4200);
        assert_eq!(short.text, "🔴 -4.2k");
        assert_eq!(short.tone, CellTone::Negative);

        let flat = net_cell(0);
        assert!(!flat.text.contains('+'));
        assert_eq!(flat.tone, CellTone::Neutral);
    }

    #[test]
    fn test_change_cell() {
        assert_eq!(change_cell(1200).text, "📈 +1.2k");
        assert_eq!(change_cell(-1200).text, "📉 -1.2k");
        assert_eq!(change_cell(0).text, "0");
        assert_eq!(change_cell(0).tone, CellTone::Neutral);
    }

    #[test]
    fn test_interpretation_net_long_no_change() {
        let text = interpretation(&record(500, 0));
        assert!(text.contains("NET LONG"));
        assert!(text.contains("No significant change"));
    }

    #[test]
    fn test_interpretation_net_short_decrease() {
        let text = interpretation(&record(-300, -150));
        assert!(text.contains("NET SHORT"));
        assert!(text.contains("cut 150 net contracts"));
    }

    #[test]
    fn test_interpretation_neutral_increase_uses_exact_magnitude() {
        let text = interpretation(&record(0, 12_345));
        assert!(text.contains("neutral"));
        assert!(text.contains("added 12,345 net contracts"));
    }

    #[test]
    fn test_headline_metrics() {
        let metrics = HeadlineMetrics::from_latest(&record(-31_250, 4_100));
        assert_eq!(metrics.net_position, "-31,250");
        assert_eq!(metrics.weekly_change, "4,100");
        assert_eq!(metrics.latest_date, "11/06/2024");
    }

    #[test]
    fn test_table_view_does_not_touch_series() {
        let series = vec![record(125_430, 0), record(-4_200, -129_630)];
        let before = series.clone();

        let table = TableView::from_series(&series);
        assert_eq!(series, before);
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].date, "2024-06-11");
        assert_eq!(table.rows[0].net.text, "🟢 +125.4k");
        assert_eq!(table.rows[1].change.text, "📉 -129.6k");
        assert_eq!(table.rows[1].longs.tone, CellTone::Neutral);
    }
}
