use crate::report::RawReportRow;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Legacy futures-only Commitments of Traders dataset on the CFTC Socrata portal.
pub const DEFAULT_BASE_URL: &str = "https://publicreporting.cftc.gov/resource/6dca-aqww.json";

/// Maximum rows returned by one request, across all markets.
pub const ROW_LIMIT: u32 = 1000;

/// Configuration for the CFTC client
#[derive(Debug, Clone)]
pub struct CftcConfig {
    /// Dataset endpoint (default: the public CFTC endpoint)
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_seconds: u64,
    /// `$limit` sent with every request (default: 1000)
    pub row_limit: u32,
}

impl Default for CftcConfig {
    fn default() -> Self {
        CftcConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            row_limit: ROW_LIMIT,
        }
    }
}

/// CFTC public reporting client
///
/// Issues a single GET for the most recent report rows, newest first.
#[derive(Debug, Clone)]
pub struct CftcClient {
    client: Client,
    config: CftcConfig,
}

impl CftcClient {
    /// Creates a new client with default configuration.
    ///
    /// # Returns
    /// Returns `Ok(CftcClient)` if successful, or an error if HTTP client creation fails.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(CftcConfig::default())
    }

    /// Creates a new client with custom configuration.
    ///
    /// # Arguments
    /// * `config` - Endpoint, timeout and row limit
    pub fn with_config(config: CftcConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientCreation(e.to_string()))?;

        Ok(CftcClient { client, config })
    }

    /// Fetches the most recent report rows for all markets.
    ///
    /// The request asks for rows sorted by report date, newest first, capped at
    /// `row_limit`. Filtering by instrument happens afterwards, so thin markets may
    /// see fewer weeks than requested.
    ///
    /// # Errors
    /// Returns `FetchError` if the connection fails or times out, the provider
    /// answers with a non-2xx status, or the body is not a JSON array of rows.
    pub async fn fetch_reports(&self) -> Result<Vec<RawReportRow>, FetchError> {
        let limit = self.config.row_limit.to_string();

        tracing::debug!(url = %self.config.base_url, limit = %limit, "requesting COT reports");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("$order", "report_date_as_yyyy_mm_dd DESC"),
                ("$limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.config.timeout_seconds)
                } else {
                    FetchError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.config.timeout_seconds)
            } else {
                FetchError::NetworkError(e.to_string())
            }
        })?;

        let rows: Vec<RawReportRow> =
            serde_json::from_slice(&body).map_err(|e| FetchError::ParseError(e.to_string()))?;

        tracing::debug!(rows = rows.len(), "received COT reports");

        Ok(rows)
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &CftcConfig {
        &self.config
    }
}

/// Errors that can occur while fetching COT reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP client creation failed
    ClientCreation(String),
    /// Connection could not be established or was interrupted
    NetworkError(String),
    /// No response within the configured number of seconds
    Timeout(u64),
    /// Provider answered with a non-2xx status
    HttpStatus { status: u16, reason: String },
    /// Body was not a JSON array of report rows
    ParseError(String),
}

impl FetchError {
    /// True when the provider could not be reached or failed on its side
    /// (connection errors, timeouts, 5xx). Everything else means the request
    /// or the payload was rejected.
    pub fn is_connectivity(&self) -> bool {
        match self {
            FetchError::NetworkError(_) | FetchError::Timeout(_) => true,
            FetchError::HttpStatus { status, .. } => {
                StatusCode::from_u16(*status).map_or(false, |s| s.is_server_error())
            }
            FetchError::ClientCreation(_) | FetchError::ParseError(_) => false,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::ClientCreation(msg) => write!(f, "Client creation error: {}", msg),
            FetchError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            FetchError::Timeout(secs) => write!(f, "Request timed out after {}s", secs),
            FetchError::HttpStatus { status, reason } => {
                write!(f, "HTTP {}: {}", status, reason)
            }
            FetchError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
