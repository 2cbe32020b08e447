//! Shared application state for the API server

use crate::dashboard::CotDashboard;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pipeline runner; owns the provider client and the report cache
    pub dashboard: Arc<CotDashboard>,
}

impl AppState {
    /// Creates a new application state
    pub fn new(dashboard: CotDashboard) -> Self {
        AppState {
            dashboard: Arc::new(dashboard),
        }
    }
}
