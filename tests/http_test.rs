//! End-to-end tests for the HTTP manifest source against a local stub of
//! the storage web endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use hutcam::config::FetchConfig;
use hutcam::fetcher::{DayFetcher, FetchError, HttpManifestSource, ManifestSource};
use hutcam::latest::LatestStateClient;
use hutcam::model::{DayKey, Period};
use hutcam::observability::Metrics;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
}

async fn index_2026_08_01(State(state): State<StubState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        r#"{
            "date": "2026-08-01",
            "snapshots": [
                { "time": "06:30", "preset": "2", "path": "2026/08/01/early_2026-08-01_snapshot_2.jpg" },
                { "time": "06:30", "preset": "1", "path": "2026/08/01/early_2026-08-01_snapshot_1.jpg" },
                { "time": "16:30", "preset": "1", "path": "2026/08/01/late_2026-08-01_snapshot_1.jpg" }
            ]
        }"#,
    )
}

async fn index_misdated() -> impl IntoResponse {
    // Declares a different date than the path it is served under.
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        r#"{
            "date": "2026-07-31",
            "snapshots": [
                { "preset": "1", "path": "2026/07/31/night_2026-07-31_snapshot_1.jpg" }
            ]
        }"#,
    )
}

async fn index_broken() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        "{ this is not json",
    )
}

async fn latest_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        r#"{
            "updated": "2026-08-01T10:00:00Z",
            "snapshots": [
                { "preset": "1", "path": "latest/snapshot_1.jpg", "time": "10:00" },
                { "preset": "2", "path": "latest/snapshot_2.jpg", "time": "10:00" }
            ]
        }"#,
    )
}

/// Binds the stub storage endpoint on an ephemeral port.
async fn start_stub() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/2026/08/01/index.json", get(index_2026_08_01))
        .route("/2026/08/02/index.json", get(index_misdated))
        .route("/2026/08/03/index.json", get(index_broken))
        .route("/latest/index.json", get(latest_index))
        .with_state(StubState { hits: hits.clone() });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), hits)
}

fn day(s: &str) -> DayKey {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_fetch_day_groups_and_sorts() {
    let (base, _hits) = start_stub().await;
    let source = HttpManifestSource::new(&base, &FetchConfig::default()).unwrap();

    let doc = source.fetch(day("2026-08-01")).await.unwrap();
    let manifest = doc.into_manifest();

    assert_eq!(manifest.entries(Period::Early).len(), 2);
    assert_eq!(manifest.entries(Period::Late).len(), 1);
    assert_eq!(manifest.entries(Period::Early)[0].camera.as_str(), "1");
    assert_eq!(
        manifest.entries(Period::Early)[0].captured_at.as_deref(),
        Some("06:30")
    );
}

#[tokio::test]
async fn test_fetcher_hits_network_once_per_day() {
    let (base, hits) = start_stub().await;
    let source = HttpManifestSource::new(&base, &FetchConfig::default()).unwrap();
    let fetcher = DayFetcher::new(Arc::new(source), Arc::new(Metrics::new()));

    let d = day("2026-08-01");
    fetcher.ensure_day(d).await.unwrap();
    fetcher.ensure_day(d).await.unwrap();
    fetcher.ensure_day(d).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.manifest(d).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_day_is_a_status_failure() {
    let (base, _hits) = start_stub().await;
    let source = HttpManifestSource::new(&base, &FetchConfig::default()).unwrap();
    let fetcher = DayFetcher::new(Arc::new(source), Arc::new(Metrics::new()));

    let d = day("2026-08-20");
    match fetcher.ensure_day(d).await {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status failure, got {other:?}"),
    }
    assert!(!fetcher.cached(d).await);
    assert!(fetcher.known_days().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_failure() {
    let (base, _hits) = start_stub().await;
    let source = HttpManifestSource::new(&base, &FetchConfig::default()).unwrap();
    let fetcher = DayFetcher::new(Arc::new(source), Arc::new(Metrics::new()));

    let d = day("2026-08-03");
    assert!(matches!(
        fetcher.ensure_day(d).await,
        Err(FetchError::Decode(_))
    ));
    assert!(!fetcher.cached(d).await);
}

#[tokio::test]
async fn test_declared_date_keys_the_cache() {
    let (base, _hits) = start_stub().await;
    let source = HttpManifestSource::new(&base, &FetchConfig::default()).unwrap();
    let fetcher = DayFetcher::new(Arc::new(source), Arc::new(Metrics::new()));

    let requested = day("2026-08-02");
    let key = fetcher.ensure_day(requested).await.unwrap();

    assert_eq!(key, day("2026-07-31"));
    assert!(fetcher.cached(key).await);
    assert!(!fetcher.cached(requested).await);
}

#[tokio::test]
async fn test_latest_state_staleness() {
    let (base, _hits) = start_stub().await;
    let client = LatestStateClient::new(&base, &FetchConfig::default()).unwrap();

    let state = client.fetch().await.unwrap();
    assert_eq!(
        state.path_for(&"1".into()),
        Some("latest/snapshot_1.jpg")
    );

    let now = "2026-08-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
    assert_eq!(state.staleness(now), Some(Duration::minutes(120)));
    assert_eq!(state.is_stale(now, Duration::minutes(75)), Some(true));
}
