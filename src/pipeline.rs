//! Filter, group and derive stages of the COT pipeline.
//!
//! All functions here are pure: they take the fetched rows and return new
//! vectors without touching shared state.

use crate::report::{CotRecord, RawReportRow, WeeklyAggregate};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of most recent report weeks kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow(usize);

impl WeekWindow {
    pub const MIN: usize = 4;
    pub const MAX: usize = 52;
    pub const STEP: usize = 2;
    pub const DEFAULT: usize = 30;

    /// Creates a window, rejecting sizes outside `MIN..=MAX`.
    pub fn new(weeks: usize) -> Result<Self, WindowError> {
        if !(Self::MIN..=Self::MAX).contains(&weeks) {
            return Err(WindowError::OutOfRange(weeks));
        }
        Ok(WeekWindow(weeks))
    }

    pub fn weeks(&self) -> usize {
        self.0
    }
}

impl Default for WeekWindow {
    fn default() -> Self {
        WeekWindow(Self::DEFAULT)
    }
}

/// Invalid week window size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    OutOfRange(usize),
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::OutOfRange(weeks) => write!(
                f,
                "Week count must be between {} and {}, got {}",
                WeekWindow::MIN,
                WeekWindow::MAX,
                weeks
            ),
        }
    }
}

impl std::error::Error for WindowError {}

/// Keeps rows whose market name contains `market` (case-insensitive).
///
/// Rows without a market name never match.
pub fn filter_rows<'a>(rows: &'a [RawReportRow], market: &str) -> Vec<&'a RawReportRow> {
    let needle = market.to_lowercase();
    rows.iter()
        .filter(|row| {
            row.market_name
                .as_deref()
                .map_or(false, |name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sums longs, shorts and open interest per report date.
///
/// Produces exactly one aggregate per distinct date among `rows`.
pub fn aggregate_by_date<'a, I>(rows: I) -> Vec<WeeklyAggregate>
where
    I: IntoIterator<Item = &'a RawReportRow>,
{
    let mut by_date: BTreeMap<NaiveDate, WeeklyAggregate> = BTreeMap::new();

    for row in rows {
        let entry = by_date
            .entry(row.report_date)
            .or_insert_with(|| WeeklyAggregate {
                date: row.report_date,
                longs: 0,
                shorts: 0,
                open_interest: 0,
            });
        entry.longs += row.noncomm_long;
        entry.shorts += row.noncomm_short;
        entry.open_interest += row.open_interest;
    }

    by_date.into_values().collect()
}

/// Keeps the `window` most recent weeks and derives net and week-over-week change.
///
/// The result is sorted ascending by date. `change` is the difference between
/// consecutive retained weeks; the earliest retained week has a change of 0.
pub fn derive_metrics(mut aggregates: Vec<WeeklyAggregate>, window: WeekWindow) -> Vec<CotRecord> {
    aggregates.sort_by(|a, b| b.date.cmp(&a.date));
    aggregates.truncate(window.weeks());
    aggregates.reverse();

    let mut previous_net: Option<i64> = None;
    aggregates
        .into_iter()
        .map(|aggregate| {
            let net = aggregate.net();
            let change = previous_net.map_or(0, |prev| net - prev);
            previous_net = Some(net);
            CotRecord {
                date: aggregate.date,
                longs: aggregate.longs,
                shorts: aggregate.shorts,
                open_interest: aggregate.open_interest,
                net,
                change,
            }
        })
        .collect()
}

/// Runs filter, aggregation and derivation for one instrument.
///
/// # Errors
/// Returns `PipelineError::NoData` if no row matches `market`.
pub fn build_series(
    rows: &[RawReportRow],
    market: &str,
    window: WeekWindow,
) -> Result<Vec<CotRecord>, PipelineError> {
    let matched = filter_rows(rows, market);
    if matched.is_empty() {
        return Err(PipelineError::NoData(market.to_string()));
    }

    tracing::debug!(market, matched = matched.len(), "filtered COT rows");

    let aggregates = aggregate_by_date(matched);
    Ok(derive_metrics(aggregates, window))
}

/// Errors raised by the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The filter matched no rows for this match-string
    NoData(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NoData(market) => write!(f, "No data found for {}", market),
        }
    }
}

impl std::error::Error for PipelineError {}
