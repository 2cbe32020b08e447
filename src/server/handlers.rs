//! HTTP request handlers for API endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use super::page::render_page;
use super::state::AppState;
use crate::dashboard::DashboardView;
use crate::export::series_to_csv;
use crate::instrument::MarketSource;
use crate::pipeline::WeekWindow;

/// Health check endpoint
///
/// Returns a simple status response to verify the server is running
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// Response for instrument listing
#[derive(Debug, Serialize)]
pub struct InstrumentsResponse {
    pub instruments: Vec<InstrumentInfo>,
    pub default_instrument: String,
    pub weeks: WeeksInfo,
}

/// Information about a single instrument
#[derive(Debug, Serialize)]
pub struct InstrumentInfo {
    pub key: String,
    pub label: String,
    pub available: bool,
    pub market: Option<String>,
}

/// Bounds of the week selector
#[derive(Debug, Serialize)]
pub struct WeeksInfo {
    pub min: usize,
    pub max: usize,
    pub step: usize,
    pub default: usize,
}

/// GET /instruments - List selectable instruments
pub async fn list_instruments(State(state): State<Arc<AppState>>) -> Json<InstrumentsResponse> {
    let catalog = state.dashboard.catalog();
    let instruments = catalog
        .iter()
        .map(|instrument| InstrumentInfo {
            key: instrument.key.clone(),
            label: instrument.label.clone(),
            available: instrument.is_available(),
            market: match &instrument.source {
                MarketSource::Cftc(market) => Some(market.clone()),
                MarketSource::Unavailable => None,
            },
        })
        .collect();

    Json(InstrumentsResponse {
        instruments,
        default_instrument: catalog.default_instrument().key.clone(),
        weeks: WeeksInfo {
            min: WeekWindow::MIN,
            max: WeekWindow::MAX,
            step: WeekWindow::STEP,
            default: WeekWindow::DEFAULT,
        },
    })
}

/// Query parameters for dashboard endpoints
#[derive(Debug, Deserialize)]
pub struct WeeksQuery {
    pub weeks: Option<usize>,
}

fn parse_window(weeks: Option<usize>) -> Result<WeekWindow, ApiError> {
    match weeks {
        Some(weeks) => Ok(WeekWindow::new(weeks)?),
        None => Ok(WeekWindow::default()),
    }
}

/// GET /api/cot/{instrument} - Dashboard view as JSON
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(instrument): Path<String>,
    Query(params): Query<WeeksQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let window = parse_window(params.weeks)?;
    let view = state.dashboard.load(&instrument, window).await?;
    Ok(Json(view))
}

/// GET /api/cot/{instrument}/csv - Unformatted series as a CSV download
pub async fn download_csv(
    State(state): State<Arc<AppState>>,
    Path(instrument): Path<String>,
    Query(params): Query<WeeksQuery>,
) -> Result<Response, ApiError> {
    let window = parse_window(params.weeks)?;
    let view = state.dashboard.load(&instrument, window).await?;
    let body = series_to_csv(&view.series)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        view.instrument.csv_file_name()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Query parameters for the HTML page
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub instrument: Option<String>,
    pub weeks: Option<usize>,
}

/// GET / - Server-rendered dashboard page
///
/// Pipeline failures are rendered as a banner on the page with a 200 status;
/// only an out-of-range week count is rejected outright.
pub async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    let window = parse_window(params.weeks)?;
    let catalog = state.dashboard.catalog();
    let key = params
        .instrument
        .unwrap_or_else(|| catalog.default_instrument().key.clone());

    let outcome = state.dashboard.load(&key, window).await;
    if let Err(e) = &outcome {
        tracing::info!(instrument = %key, error = %e, "dashboard rendered with banner");
    }

    Ok(Html(render_page(
        catalog,
        &key,
        window.weeks(),
        outcome.as_ref(),
    )))
}
