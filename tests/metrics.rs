// tests/metrics.rs
//
// One test per binary: the Prometheus recorder is process-global.

mod common;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::{routing::get, Json, Router};
use common::{serve, ScriptedSummarizer};
use personal_news::config::FeedConfig;
use personal_news::ingest::providers::build_provider;
use personal_news::metrics::Metrics;
use personal_news::store::InMemoryStore;
use personal_news::{run_once, IngestOptions};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn metrics_endpoint_exposes_ingestion_series() {
    let metrics = Metrics::init().expect("recorder installs once per process");

    let feed = Router::new().route(
        "/v2/top-headlines",
        get(|| async {
            Json(json!({ "articles": [
                { "title": "A", "description": "a", "source": { "name": "W" }, "url": "https://e.test/a" },
                { "title": "B", "description": "FAIL", "source": { "name": "W" }, "url": "https://e.test/b" },
                42
            ]}))
        }),
    );
    let cfg = FeedConfig {
        api_key: Some("k".into()),
        base_url: Some(serve(feed).await),
        ..FeedConfig::default()
    };
    let store = InMemoryStore::new();
    run_once(
        build_provider(&cfg).as_ref(),
        &ScriptedSummarizer::failing_on("FAIL"),
        &store,
        &IngestOptions::default(),
    )
    .await
    .unwrap();

    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    for (series, value) in [
        ("ingest_runs_total", "1"),
        ("ingest_fetched_total", "3"),
        ("ingest_skipped_total", "1"),
        ("ingest_summarize_failed_total", "1"),
        ("ingest_stored_total", "1"),
    ] {
        let line = text
            .lines()
            .find(|l| l.starts_with(series) && !l.starts_with('#'))
            .unwrap_or_else(|| panic!("missing {series} in:\n{text}"));
        assert!(line.ends_with(value), "{line}");
    }
    assert!(text.contains("ingest_last_run_ts"));
}
