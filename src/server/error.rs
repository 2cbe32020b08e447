//! Error types for the REST API server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::dashboard::{DashboardError, Severity};
use crate::export::ExportError;
use crate::pipeline::WindowError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Instrument key not in the catalog
    InstrumentNotFound(String),
    /// Invalid parameter in request
    InvalidParameter(String),
    /// Instrument is not covered by the COT report
    InstrumentUnavailable(String),
    /// Provider unreachable, timed out or failing
    UpstreamUnavailable(String),
    /// Provider rejected the request or sent an unreadable payload
    UpstreamRejected(String),
    /// No provider rows for the instrument
    NoDataForInstrument(String),
    /// Pipeline produced nothing to show
    DataUnavailable(String),
    /// Internal server error
    InternalError(String),
}

impl ApiError {
    pub fn severity(&self) -> Severity {
        match self {
            ApiError::InstrumentUnavailable(_) | ApiError::DataUnavailable(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InstrumentNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::InstrumentUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamRejected(_) => StatusCode::BAD_GATEWAY,
            ApiError::NoDataForInstrument(_) => StatusCode::NOT_FOUND,
            ApiError::DataUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InstrumentNotFound(_) => "InstrumentNotFound",
            ApiError::InvalidParameter(_) => "InvalidParameter",
            ApiError::InstrumentUnavailable(_) => "InstrumentUnavailable",
            ApiError::UpstreamUnavailable(_) => "UpstreamUnavailable",
            ApiError::UpstreamRejected(_) => "UpstreamRejected",
            ApiError::NoDataForInstrument(_) => "NoDataForInstrument",
            ApiError::DataUnavailable(_) => "DataUnavailable",
            ApiError::InternalError(_) => "InternalError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::InstrumentNotFound(msg)
            | ApiError::InvalidParameter(msg)
            | ApiError::InstrumentUnavailable(msg)
            | ApiError::UpstreamUnavailable(msg)
            | ApiError::UpstreamRejected(msg)
            | ApiError::NoDataForInstrument(msg)
            | ApiError::DataUnavailable(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "message": self.message(),
            "level": self.severity(),
        }));

        (self.status(), body).into_response()
    }
}

// Conversions from other error types

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        let message = err.user_message();
        match err {
            DashboardError::UnknownInstrument(_) => ApiError::InstrumentNotFound(message),
            DashboardError::InstrumentUnavailable(_) => ApiError::InstrumentUnavailable(message),
            DashboardError::Fetch(ref e) if e.is_connectivity() => {
                ApiError::UpstreamUnavailable(message)
            }
            DashboardError::Fetch(_) => ApiError::UpstreamRejected(message),
            DashboardError::NoData(_) => ApiError::NoDataForInstrument(message),
            DashboardError::EmptyResult => ApiError::DataUnavailable(message),
        }
    }
}

impl From<WindowError> for ApiError {
    fn from(err: WindowError) -> Self {
        ApiError::InvalidParameter(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
