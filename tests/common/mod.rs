#![allow(dead_code)]

use axum::extract::RawQuery;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use chrono::Duration;
use cot_dashboard::{CftcClient, CftcConfig, CotDashboard, InstrumentCatalog};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-process stand-in for the CFTC dataset endpoint.
pub struct MockCftc {
    pub url: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
}

impl MockCftc {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    /// Dashboard wired to this mock with a one-day cache.
    pub fn dashboard(&self) -> CotDashboard {
        self.dashboard_with_timeout(5)
    }

    pub fn dashboard_with_timeout(&self, timeout_seconds: u64) -> CotDashboard {
        let client = CftcClient::with_config(CftcConfig {
            base_url: self.url.clone(),
            timeout_seconds,
            row_limit: 1000,
        })
        .unwrap();
        CotDashboard::new(client, InstrumentCatalog::default(), Duration::hours(24))
    }
}

/// Serves `body` with `status` on every request, after an optional delay.
pub async fn spawn_mock(status: StatusCode, body: String, delay_ms: u64) -> MockCftc {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_query = Arc::new(Mutex::new(None));

    let handler_hits = Arc::clone(&hits);
    let handler_query = Arc::clone(&last_query);
    let app = Router::new().route(
        "/resource/cot.json",
        get(move |RawQuery(query): RawQuery| {
            let hits = Arc::clone(&handler_hits);
            let last_query = Arc::clone(&handler_query);
            let body = body.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                *last_query.lock().unwrap() = query;
                if delay_ms > 0 {
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockCftc {
        url: format!("http://{}/resource/cot.json", addr),
        hits,
        last_query,
    }
}

pub async fn spawn_sample_mock() -> MockCftc {
    spawn_mock(StatusCode::OK, sample_payload().to_string(), 0).await
}

fn row(name: Option<&str>, date: &str, long: i64, short: i64, oi: i64) -> Value {
    json!({
        "market_and_exchange_names": name,
        "report_date_as_yyyy_mm_dd": format!("{}T00:00:00.000", date),
        "noncomm_positions_long_all": long.to_string(),
        "noncomm_positions_short_all": short.to_string(),
        "open_interest_all": oi.to_string(),
        "cftc_contract_market_code": "000000"
    })
}

/// Provider-shaped payload, newest first, all values as strings.
///
/// GOLD net positions (including MICRO GOLD rows) per week:
/// 05-07: 190000, 05-14: 194000, 05-21: 202000, 05-28: 203000,
/// 06-04: 216000, 06-11: 209500.
pub fn sample_payload() -> Value {
    const GOLD: &str = "GOLD - COMMODITY EXCHANGE INC.";
    const MICRO_GOLD: &str = "MICRO GOLD - COMMODITY EXCHANGE INC.";
    const EURO: &str = "EURO FX - CHICAGO MERCANTILE EXCHANGE";

    Value::Array(vec![
        row(Some(GOLD), "2024-06-11", 265000, 62000, 514000),
        row(Some(MICRO_GOLD), "2024-06-11", 11000, 4500, 31000),
        row(Some(EURO), "2024-06-11", 180000, 120000, 700000),
        row(None, "2024-06-11", 1, 1, 1),
        row(Some(GOLD), "2024-06-04", 270000, 60000, 515000),
        row(Some(MICRO_GOLD), "2024-06-04", 10000, 4000, 30000),
        row(Some(EURO), "2024-06-04", 175000, 125000, 690000),
        row(Some(GOLD), "2024-05-28", 262000, 59000, 512000),
        row(Some(GOLD), "2024-05-21", 260000, 58000, 510000),
        row(Some(GOLD), "2024-05-14", 255000, 61000, 505000),
        row(Some(GOLD), "2024-05-07", 250000, 60000, 500000),
    ])
}
