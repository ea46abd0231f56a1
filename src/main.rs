//! Personal news service: binary entrypoint.
//! Boots the Axum HTTP server, wires configuration, store, background ingestion and metrics.

use personal_news::ingest::scheduler::{spawn_scheduler, IngestSchedulerCfg};
use personal_news::metrics::Metrics;
use personal_news::{build_state, router, AppConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` filter, compact lines by default, JSON lines with `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("personal_news=info,ingest=info,warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    // The runtime may already have installed a subscriber; keep it in that case.
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load()?;
    tracing::info!(config = ?cfg, "configuration loaded");

    let state = build_state(&cfg).await?;

    spawn_scheduler(state.ingestor.clone(), IngestSchedulerCfg::from(&cfg.ingest));

    let mut app = router(state);
    match Metrics::init() {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "prometheus recorder not installed"),
    }

    Ok(app.into())
}
