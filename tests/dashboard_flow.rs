mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{spawn_mock, spawn_sample_mock};
use cot_dashboard::{DashboardError, FetchError, Severity, WeekWindow};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

#[tokio::test]
async fn gold_dashboard_end_to_end() {
    let mock = spawn_sample_mock().await;
    let dashboard = mock.dashboard();

    let view = dashboard
        .load("gold", WeekWindow::new(4).unwrap())
        .await
        .unwrap();

    let dates: Vec<_> = view.series.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(5, 21), date(5, 28), date(6, 4), date(6, 11)]
    );

    let nets: Vec<_> = view.series.iter().map(|r| r.net).collect();
    let changes: Vec<_> = view.series.iter().map(|r| r.change).collect();
    assert_eq!(nets, vec![202000, 203000, 216000, 209500]);
    assert_eq!(changes, vec![0, 1000, 13000, -6500]);

    // MICRO GOLD rows are summed into the GOLD weeks
    let latest = view.series.last().unwrap();
    assert_eq!(latest.longs, 276000);
    assert_eq!(latest.shorts, 66500);
    assert_eq!(latest.open_interest, 545000);

    assert!(view.interpretation.contains("NET LONG"));
    assert!(view.interpretation.contains("cut 6,500 net contracts"));
    assert_eq!(view.metrics.net_position, "209,500");
    assert_eq!(view.metrics.weekly_change, "-6,500");
    assert_eq!(view.metrics.latest_date, "11/06/2024");

    let last_row = view.table.rows.last().unwrap();
    assert_eq!(last_row.longs.text, "276.0k");
    assert_eq!(last_row.net.text, "🟢 +209.5k");
    assert_eq!(last_row.change.text, "📉 -6.5k");
    assert_eq!(view.table.rows[0].change.text, "0");

    assert_eq!(view.chart.points.len(), 4);
    assert_eq!(view.chart.points[0].date, date(5, 21));

    assert_eq!(mock.hits(), 1);
    let query = mock.last_query().unwrap();
    assert!(query.contains("%24order=report_date_as_yyyy_mm_dd+DESC"), "query: {}", query);
    assert!(query.contains("%24limit=1000"), "query: {}", query);
}

#[tokio::test]
async fn window_larger_than_history_keeps_every_week() {
    let mock = spawn_sample_mock().await;
    let view = mock
        .dashboard()
        .load("gold", WeekWindow::new(52).unwrap())
        .await
        .unwrap();

    assert_eq!(view.series.len(), 6);
    assert!(view.series.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(view.series[0].change, 0);
}

#[tokio::test]
async fn repeated_loads_within_ttl_issue_one_request() {
    let mock = spawn_sample_mock().await;
    let dashboard = mock.dashboard();
    let window = WeekWindow::new(4).unwrap();

    let first = dashboard.load("gold", window).await.unwrap();
    let second = dashboard.load("gold", window).await.unwrap();
    assert_eq!(first.series, second.series);
    assert_eq!(first.interpretation, second.interpretation);
    assert_eq!(mock.hits(), 1);

    // Same instrument, different window: still served from the cache
    let wider = dashboard.load("gold", WeekWindow::new(6).unwrap()).await.unwrap();
    assert_eq!(wider.series.len(), 6);
    assert_eq!(mock.hits(), 1);

    // A different instrument has its own cache entry
    let euro = dashboard.load("eur_usd", window).await.unwrap();
    assert_eq!(euro.series.len(), 2);
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn unavailable_instrument_makes_no_request() {
    let mock = spawn_sample_mock().await;
    let err = mock
        .dashboard()
        .load("hk50", WeekWindow::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::InstrumentUnavailable(_)));
    assert_eq!(err.severity(), Severity::Warning);
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn http_500_is_a_connectivity_error() {
    let mock = spawn_mock(
        StatusCode::INTERNAL_SERVER_ERROR,
        "{\"error\":true}".to_string(),
        0,
    )
    .await;
    let dashboard = mock.dashboard();

    let err = dashboard.load("gold", WeekWindow::default()).await.unwrap_err();
    match &err {
        DashboardError::Fetch(e) => {
            assert!(e.is_connectivity());
            assert_eq!(
                *e,
                FetchError::HttpStatus {
                    status: 500,
                    reason: "Internal Server Error".to_string()
                }
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.user_message().starts_with("Could not reach the CFTC API"));

    // Failures are not memoized: the next load tries again
    let _ = dashboard.load("gold", WeekWindow::default()).await;
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn http_400_is_a_rejected_request() {
    let mock = spawn_mock(StatusCode::BAD_REQUEST, "{}".to_string(), 0).await;
    let err = mock
        .dashboard()
        .load("gold", WeekWindow::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::Fetch(ref e) if !e.is_connectivity()));
    assert!(err.user_message().contains("rejected"));
}

#[tokio::test]
async fn malformed_payload_is_a_parse_error() {
    let mock = spawn_mock(StatusCode::OK, "{\"not\":\"an array\"}".to_string(), 0).await;
    let err = mock
        .dashboard()
        .load("gold", WeekWindow::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::Fetch(FetchError::ParseError(_))));
}

#[tokio::test]
async fn no_matching_rows_is_no_data() {
    let mock = spawn_sample_mock().await;
    let err = mock
        .dashboard()
        .load("btc", WeekWindow::default())
        .await
        .unwrap_err();

    assert_eq!(err, DashboardError::NoData("BITCOIN".to_string()));
    assert_eq!(err.user_message(), "No data found for BITCOIN.");
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let body = common::sample_payload().to_string();
    let mock = spawn_mock(StatusCode::OK, body, 3_000).await;

    let err = mock
        .dashboard_with_timeout(1)
        .load("gold", WeekWindow::default())
        .await
        .unwrap_err();

    assert_eq!(err, DashboardError::Fetch(FetchError::Timeout(1)));
    assert!(err.user_message().starts_with("Could not reach the CFTC API"));
}
