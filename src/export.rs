use crate::report::CotRecord;

/// Header row of the CSV export, matching `CotRecord` field order.
pub const CSV_HEADER: [&str; 6] = ["date", "longs", "shorts", "open_interest", "net", "change"];

/// Serializes the unformatted derived series to CSV bytes (UTF-8).
///
/// Values are raw integers and ISO dates, with no scaling or markers.
///
/// # Errors
/// Returns `ExportError` if a record cannot be serialized or the writer cannot be flushed.
pub fn series_to_csv(series: &[CotRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ExportError(e.to_string()))?;
    for record in series {
        writer
            .serialize(record)
            .map_err(|e| ExportError(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| ExportError(e.to_string()))
}

/// CSV export failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportError(pub String);

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CSV export error: {}", self.0)
    }
}

impl std::error::Error for ExportError {}
