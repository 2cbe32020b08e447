//! HTTP server: dashboard page, JSON API and CSV download

mod error;
mod handlers;
mod page;
mod routes;
mod state;

pub use error::ApiError;
pub use page::render_page;
pub use routes::create_router;
pub use state::AppState;

use crate::cache::DEFAULT_TTL_SECS;
use crate::cftc::{CftcClient, CftcConfig};
use crate::dashboard::CotDashboard;
use crate::instrument::InstrumentCatalog;
use chrono::Duration;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// CFTC endpoint and timeout
    pub cftc: CftcConfig,
    /// How long fetched reports are reused, in seconds (default: one day)
    pub cache_ttl_seconds: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cftc: CftcConfig::default(),
            cache_ttl_seconds: DEFAULT_TTL_SECS,
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration with default provider settings
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            ..ServerConfig::default()
        }
    }

    /// Reads `HOST`, `PORT`, `CFTC_BASE_URL`, `CFTC_TIMEOUT_SECS` and
    /// `COT_CACHE_TTL_SECS`, falling back to defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let base_url = std::env::var("CFTC_BASE_URL").unwrap_or(defaults.cftc.base_url);
        let timeout_seconds = std::env::var("CFTC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.cftc.timeout_seconds);
        let cache_ttl_seconds = std::env::var("COT_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|ttl| *ttl >= 0)
            .unwrap_or(defaults.cache_ttl_seconds);

        ServerConfig {
            host,
            port,
            cftc: CftcConfig {
                base_url,
                timeout_seconds,
                row_limit: defaults.cftc.row_limit,
            },
            cache_ttl_seconds,
        }
    }

    /// Builds the dashboard service described by this configuration.
    pub fn build_dashboard(&self) -> Result<CotDashboard, crate::cftc::FetchError> {
        let client = CftcClient::with_config(self.cftc.clone())?;
        Ok(CotDashboard::new(
            client,
            InstrumentCatalog::default(),
            Duration::seconds(self.cache_ttl_seconds),
        ))
    }
}

/// Runs the API server
///
/// # Arguments
/// * `config` - Server configuration
///
/// # Returns
/// Returns an error if the server fails to start or encounters a fatal error
///
/// # Example
/// ```rust,no_run
/// use cot_dashboard::server::{run_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server(ServerConfig::default()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cot_dashboard=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let dashboard = config.build_dashboard()?;
    let state = Arc::new(AppState::new(dashboard));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        provider = %config.cftc.base_url,
        cache_ttl_secs = config.cache_ttl_seconds,
        "Server listening on http://{}",
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
