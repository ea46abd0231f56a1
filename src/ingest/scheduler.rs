// src/ingest/scheduler.rs
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::config::IngestConfig;
use crate::ingest::Ingestor;

#[derive(Clone, Copy, Debug, Default)]
pub struct IngestSchedulerCfg {
    pub on_start: bool,
    pub interval: Option<Duration>,
}

impl From<&IngestConfig> for IngestSchedulerCfg {
    fn from(cfg: &IngestConfig) -> Self {
        Self {
            on_start: cfg.on_start,
            interval: cfg
                .interval_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
        }
    }
}

async fn run_logged(ingestor: &Ingestor, trigger: &'static str) {
    counter!("ingest_scheduled_runs_total", "trigger" => trigger).increment(1);
    match ingestor.run().await {
        Ok(report) => tracing::info!(target: "ingest", trigger, stored = report.stored, "background ingestion done"),
        Err(e) => tracing::error!(target: "ingest", trigger, error = %e, "background ingestion failed"),
    }
}

/// Spawn the start-up run and/or the periodic runs. `None` when neither is configured.
/// A zero interval counts as unset.
pub fn spawn_scheduler(ingestor: Ingestor, cfg: IngestSchedulerCfg) -> Option<JoinHandle<()>> {
    let interval = cfg.interval.filter(|d| !d.is_zero());
    if !cfg.on_start && interval.is_none() {
        return None;
    }
    Some(tokio::spawn(async move {
        if cfg.on_start {
            run_logged(&ingestor, "startup").await;
        }
        let Some(period) = interval else {
            return;
        };
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_logged(&ingestor, "interval").await;
        }
    }))
}
