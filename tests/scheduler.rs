// tests/scheduler.rs
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use common::{serve, ScriptedSummarizer};
use personal_news::config::{FeedConfig, IngestConfig};
use personal_news::ingest::providers::build_provider;
use personal_news::ingest::scheduler::{spawn_scheduler, IngestSchedulerCfg};
use personal_news::store::InMemoryStore;
use personal_news::{IngestOptions, Ingestor};
use serde_json::json;

/// Feed that hands out one fresh article per request.
async fn counting_feed() -> (FeedConfig, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/v2/top-headlines",
        get(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                Json(json!({
                    "articles": [{
                        "title": format!("Tick {n}"),
                        "description": "body",
                        "source": { "name": "Wire" },
                        "url": format!("https://example.test/{n}")
                    }]
                }))
            }
        }),
    );
    let cfg = FeedConfig {
        api_key: Some("k".into()),
        base_url: Some(serve(app).await),
        ..FeedConfig::default()
    };
    (cfg, hits)
}

fn ingestor(cfg: &FeedConfig, store: Arc<InMemoryStore>) -> Ingestor {
    Ingestor::new(
        build_provider(cfg),
        Arc::new(ScriptedSummarizer::ok()),
        store,
        IngestOptions::default(),
    )
}

async fn wait_for(store: &InMemoryStore, at_least: usize) -> usize {
    for _ in 0..100 {
        let n = store.article_count().await;
        if n >= at_least {
            return n;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    store.article_count().await
}

#[tokio::test]
async fn nothing_is_spawned_without_a_trigger() {
    let (cfg, hits) = counting_feed().await;
    let store = Arc::new(InMemoryStore::new());
    let handle = spawn_scheduler(
        ingestor(&cfg, store),
        IngestSchedulerCfg {
            on_start: false,
            interval: None,
        },
    );
    assert!(handle.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn startup_run_populates_the_store() {
    let (cfg, hits) = counting_feed().await;
    let store = Arc::new(InMemoryStore::new());
    let handle = spawn_scheduler(
        ingestor(&cfg, store.clone()),
        IngestSchedulerCfg {
            on_start: true,
            interval: None,
        },
    )
    .expect("startup run scheduled");

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("single run finishes")
        .expect("task not panicked");
    assert_eq!(store.article_count().await, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interval_keeps_ingesting() {
    let (cfg, _hits) = counting_feed().await;
    let store = Arc::new(InMemoryStore::new());
    let handle = spawn_scheduler(
        ingestor(&cfg, store.clone()),
        IngestSchedulerCfg {
            on_start: false,
            interval: Some(Duration::from_millis(50)),
        },
    )
    .expect("interval scheduled");

    let n = wait_for(&store, 2).await;
    handle.abort();
    assert!(n >= 2, "expected repeated runs, got {n}");
}

#[tokio::test]
async fn failing_feed_does_not_kill_the_schedule() {
    let store = Arc::new(InMemoryStore::new());
    let offline = FeedConfig::default();
    let handle = spawn_scheduler(
        ingestor(&offline, store.clone()),
        IngestSchedulerCfg {
            on_start: true,
            interval: Some(Duration::from_millis(30)),
        },
    )
    .expect("scheduled");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!handle.is_finished(), "loop survives feed errors");
    handle.abort();
    assert_eq!(store.article_count().await, 0);
}

#[tokio::test]
async fn zero_interval_is_treated_as_unset() {
    let (cfg, hits) = counting_feed().await;
    let store = Arc::new(InMemoryStore::new());

    let from_config = IngestSchedulerCfg::from(&IngestConfig {
        concurrency: 1,
        on_start: false,
        interval_secs: Some(0),
    });
    assert!(from_config.interval.is_none());
    assert!(spawn_scheduler(ingestor(&cfg, store.clone()), from_config).is_none());

    let handle = spawn_scheduler(
        ingestor(&cfg, store.clone()),
        IngestSchedulerCfg {
            on_start: true,
            interval: Some(Duration::ZERO),
        },
    )
    .expect("startup run scheduled");
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("task ends after the startup run")
        .expect("task not panicked");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.article_count().await, 1);
}
