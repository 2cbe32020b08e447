//! Dashboard orchestration: one call per user selection.
//!
//! `CotDashboard::load` runs fetch (through the TTL cache), filter, aggregate,
//! derive and format in sequence and returns everything the page needs.

use crate::cache::TtlCache;
use crate::cftc::{CftcClient, FetchError};
use crate::chart::NetPositionChart;
use crate::format::{interpretation, HeadlineMetrics, TableView};
use crate::instrument::{Instrument, InstrumentCatalog, InstrumentError};
use crate::pipeline::{build_series, PipelineError, WeekWindow};
use crate::report::{CotRecord, RawReportRow};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

type ReportCache = TtlCache<String, Arc<Vec<RawReportRow>>>;

/// Everything rendered for one instrument and week window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub instrument: Instrument,
    pub weeks: usize,
    pub interpretation: String,
    pub metrics: HeadlineMetrics,
    pub table: TableView,
    pub chart: NetPositionChart,
    /// Unformatted series, used for the CSV export
    pub series: Vec<CotRecord>,
}

/// Runs the COT pipeline and memoizes raw provider payloads per instrument.
pub struct CotDashboard {
    client: CftcClient,
    catalog: InstrumentCatalog,
    cache: Mutex<ReportCache>,
}

impl CotDashboard {
    /// Creates a dashboard with the given client and catalog, caching fetches for `ttl`.
    pub fn new(client: CftcClient, catalog: InstrumentCatalog, ttl: Duration) -> Self {
        CotDashboard {
            client,
            catalog,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    /// Builds the dashboard for an instrument key and week window.
    ///
    /// # Errors
    /// - `UnknownInstrument` if the key is not in the catalog
    /// - `InstrumentUnavailable` for the sentinel instrument (no request is made)
    /// - `Fetch` if the provider cannot be reached or rejects the request
    /// - `NoData` if no provider row matches the instrument
    /// - `EmptyResult` if the pipeline produced no weeks
    pub async fn load(
        &self,
        instrument_key: &str,
        window: WeekWindow,
    ) -> Result<DashboardView, DashboardError> {
        let instrument = self.catalog.resolve(instrument_key)?.clone();

        let market = match instrument.market() {
            Some(market) => market.to_string(),
            None => {
                tracing::info!(instrument = %instrument.key, "instrument not covered by COT report");
                return Err(DashboardError::InstrumentUnavailable(instrument.advisory()));
            }
        };

        let rows = self.reports_for(&market).await?;
        let series = build_series(&rows, &market, window)?;

        let latest = match series.last() {
            Some(latest) => *latest,
            None => return Err(DashboardError::EmptyResult),
        };

        Ok(DashboardView {
            weeks: window.weeks(),
            interpretation: interpretation(&latest),
            metrics: HeadlineMetrics::from_latest(&latest),
            table: TableView::from_series(&series),
            chart: NetPositionChart::from_series(&series, window.weeks()),
            series,
            instrument,
        })
    }

    /// Returns the provider rows for `market`, fetching only on a cache miss.
    async fn reports_for(&self, market: &str) -> Result<Arc<Vec<RawReportRow>>, DashboardError> {
        {
            let cache = self.cache.lock().await;
            if let Some(rows) = cache.get(&market.to_string(), Utc::now()) {
                tracing::debug!(market, "COT cache hit");
                return Ok(rows);
            }
        }

        tracing::info!(market, "COT cache miss, fetching from provider");
        let rows = match self.client.fetch_reports().await {
            Ok(rows) => Arc::new(rows),
            Err(e) => {
                tracing::warn!(market, error = %e, "COT fetch failed");
                return Err(DashboardError::Fetch(e));
            }
        };

        let mut cache = self.cache.lock().await;
        let now = Utc::now();
        cache.purge_expired(now);
        cache.insert(market.to_string(), Arc::clone(&rows), now);

        Ok(rows)
    }
}

/// How a dashboard failure should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Errors that stop the dashboard pipeline for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Instrument key not in the catalog
    UnknownInstrument(String),
    /// Sentinel instrument; carries the advisory text
    InstrumentUnavailable(String),
    /// Provider request failed
    Fetch(FetchError),
    /// Provider answered but no row matched the instrument
    NoData(String),
    /// The pipeline completed without any week to show
    EmptyResult,
}

impl DashboardError {
    pub fn severity(&self) -> Severity {
        match self {
            DashboardError::InstrumentUnavailable(_) | DashboardError::EmptyResult => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Message shown to the user in place of the dashboard widgets.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::UnknownInstrument(key) => format!("Unknown instrument: {}", key),
            DashboardError::InstrumentUnavailable(advisory) => advisory.clone(),
            DashboardError::Fetch(e) if e.is_connectivity() => {
                format!("Could not reach the CFTC API: {}", e)
            }
            DashboardError::Fetch(e) => format!("The CFTC API rejected the request: {}", e),
            DashboardError::NoData(market) => format!("No data found for {}.", market),
            DashboardError::EmptyResult => "Could not load data from the API.".to_string(),
        }
    }
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for DashboardError {}

impl From<InstrumentError> for DashboardError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::UnknownKey(key) => DashboardError::UnknownInstrument(key),
            other => DashboardError::UnknownInstrument(other.to_string()),
        }
    }
}

impl From<PipelineError> for DashboardError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoData(market) => DashboardError::NoData(market),
        }
    }
}
