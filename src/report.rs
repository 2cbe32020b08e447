use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A single row of the CFTC legacy futures-only COT report.
///
/// The provider sends every column as a string; counts are parsed to integers
/// and the report date (`2024-06-11T00:00:00.000`) is reduced to its date part.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawReportRow {
    /// Market and exchange name (e.g., "GOLD - COMMODITY EXCHANGE INC.")
    #[serde(rename = "market_and_exchange_names", default)]
    pub market_name: Option<String>,
    /// Report date
    #[serde(
        rename = "report_date_as_yyyy_mm_dd",
        deserialize_with = "deserialize_report_date"
    )]
    pub report_date: NaiveDate,
    /// Non-commercial long positions
    #[serde(
        rename = "noncomm_positions_long_all",
        deserialize_with = "deserialize_count"
    )]
    pub noncomm_long: i64,
    /// Non-commercial short positions
    #[serde(
        rename = "noncomm_positions_short_all",
        deserialize_with = "deserialize_count"
    )]
    pub noncomm_short: i64,
    /// Total open interest
    #[serde(rename = "open_interest_all", deserialize_with = "deserialize_count")]
    pub open_interest: i64,
}

impl RawReportRow {
    pub fn new(
        market_name: Option<&str>,
        report_date: NaiveDate,
        noncomm_long: i64,
        noncomm_short: i64,
        open_interest: i64,
    ) -> Self {
        RawReportRow {
            market_name: market_name.map(str::to_string),
            report_date,
            noncomm_long,
            noncomm_short,
            open_interest,
        }
    }
}

/// Position totals for one report date, summed across matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyAggregate {
    pub date: NaiveDate,
    pub longs: i64,
    pub shorts: i64,
    pub open_interest: i64,
}

impl WeeklyAggregate {
    /// Net non-commercial position (longs minus shorts).
    pub fn net(&self) -> i64 {
        self.longs - self.shorts
    }
}

/// A retained weekly record with derived columns.
///
/// This is the unformatted series shared by the chart and the CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CotRecord {
    pub date: NaiveDate,
    pub longs: i64,
    pub shorts: i64,
    pub open_interest: i64,
    /// longs - shorts
    pub net: i64,
    /// net minus the previous record's net; 0 for the first record of a window
    pub change: i64,
}

/// Accepts counts sent either as JSON strings ("12345") or as JSON numbers.
fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Int(i64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Int(value) => Ok(value),
        Count::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|e| de::Error::custom(format!("invalid count '{}': {}", text, e))),
    }
}

/// Parses `YYYY-MM-DD`, ignoring any time component that follows.
fn deserialize_report_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let date_part = text.get(..10).unwrap_or(&text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| de::Error::custom(format!("invalid report date '{}': {}", text, e)))
}
