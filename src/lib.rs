pub mod instrument;
pub mod report;
pub mod cftc;
pub mod cache;
pub mod pipeline;
pub mod format;
pub mod chart;
pub mod export;
pub mod dashboard;
pub mod server;

pub use instrument::{Instrument, InstrumentCatalog, InstrumentError, MarketSource};
pub use report::{CotRecord, RawReportRow, WeeklyAggregate};
pub use cftc::{CftcClient, CftcConfig, FetchError};
pub use cache::TtlCache;
pub use pipeline::{
    aggregate_by_date,
    build_series,
    derive_metrics,
    filter_rows,
    PipelineError,
    WeekWindow,
    WindowError,
};
pub use format::{interpretation, scale_k, HeadlineMetrics, TableView};
pub use chart::NetPositionChart;
pub use export::series_to_csv;
pub use dashboard::{CotDashboard, DashboardError, DashboardView, Severity};
pub use server::{create_router, run_server, ApiError, AppState, ServerConfig};
