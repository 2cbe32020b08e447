//! Net-position line chart: a date-ordered series plus an inline SVG rendering.

use crate::report::CotRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

pub const LINE_COLOR: &str = "#FFD700";

/// One point of the net-position line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub net: i64,
}

/// Line chart of net non-commercial position over the retained weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetPositionChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub line_color: String,
    pub points: Vec<ChartPoint>,
}

impl NetPositionChart {
    /// Builds the chart from the ascending derived series, one point per record.
    pub fn from_series(series: &[CotRecord], weeks: usize) -> Self {
        NetPositionChart {
            title: format!("Net position evolution (last {} weeks)", weeks),
            x_label: "Date".to_string(),
            y_label: "Net position".to_string(),
            line_color: LINE_COLOR.to_string(),
            points: series
                .iter()
                .map(|record| ChartPoint {
                    date: record.date,
                    net: record.net,
                })
                .collect(),
        }
    }

    /// Renders the chart as a standalone SVG element with markers on each point.
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let margin = 48.0;
        let plot_w = (width as f64 - 2.0 * margin).max(1.0);
        let plot_h = (height as f64 - 2.0 * margin).max(1.0);

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img">"#,
            w = width,
            h = height
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="24" font-size="16">{}</text>"#,
            margin,
            escape(&self.title)
        );

        if self.points.is_empty() {
            svg.push_str("</svg>");
            return svg;
        }

        let min = self.points.iter().map(|p| p.net).min().unwrap_or(0).min(0) as f64;
        let max = self.points.iter().map(|p| p.net).max().unwrap_or(0).max(0) as f64;
        let span = if max > min { max - min } else { 1.0 };
        let step = if self.points.len() > 1 {
            plot_w / (self.points.len() - 1) as f64
        } else {
            0.0
        };

        let x_at = |i: usize| margin + step * i as f64;
        let y_at = |v: i64| margin + plot_h - (v as f64 - min) / span * plot_h;

        // Zero line
        let _ = write!(
            svg,
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#888" stroke-dasharray="4 4"/>"##,
            x1 = margin,
            x2 = margin + plot_w,
            y = y_at(0)
        );

        let path: Vec<String> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(p.net)))
            .collect();
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            self.line_color,
            path.join(" ")
        );

        for (i, point) in self.points.iter().enumerate() {
            let _ = write!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"><title>{}: {}</title></circle>"#,
                x_at(i),
                y_at(point.net),
                self.line_color,
                point.date.format("%Y-%m-%d"),
                point.net
            );
        }

        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            let _ = write!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="11">{}</text><text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
                margin,
                height as f64 - 16.0,
                first.date.format("%Y-%m-%d"),
                margin + plot_w,
                height as f64 - 16.0,
                last.date.format("%Y-%m-%d")
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Escapes text for inclusion in HTML or SVG markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<CotRecord> {
        [(4, 600), (11, 300), (18, -300)]
            .iter()
            .map(|(day, net)| CotRecord {
                date: NaiveDate::from_ymd_opt(2024, 6, *day).unwrap(),
                longs: 1000,
                shorts: 1000 - net,
                open_interest: 5000,
                net: *net,
                change: 0,
            })
            .collect()
    }

    #[test]
    fn test_chart_points_follow_series_order() {
        let chart = NetPositionChart::from_series(&series(), 30);
        let nets: Vec<_> = chart.points.iter().map(|p| p.net).collect();
        assert_eq!(nets, vec![600, 300, -300]);
        assert!(chart.points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(chart.title, "Net position evolution (last 30 weeks)");
        assert_eq!(chart.line_color, "#FFD700");
    }

    #[test]
    fn test_svg_has_one_marker_per_point() {
        let chart = NetPositionChart::from_series(&series(), 4);
        let svg = chart.to_svg(640, 320);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("2024-06-18: -300"));
    }

    #[test]
    fn test_svg_empty_series() {
        let chart = NetPositionChart::from_series(&[], 4);
        let svg = chart.to_svg(640, 320);
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("S&P <500>"), "S&amp;P &lt;500&gt;");
    }
}
