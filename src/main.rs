use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;

mod analytics;
mod config;
mod model;
mod pipeline;
mod report;
mod source;

use config::Config;
use pipeline::Snapshot;
use source::{FileCsvSource, HttpCsvSource, RowSource, SnapshotStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let row_source: Arc<dyn RowSource> = if config.uses_http() {
        Arc::new(HttpCsvSource::new(&config.data_source)?)
    } else {
        Arc::new(FileCsvSource::new(&config.data_source))
    };
    info!(
        "Data source: {} ({})",
        config.data_source,
        row_source.name()
    );

    if config.watch_secs == 0 {
        // One-shot: fetch, build, render.
        let rows = source::fetch_row_set(row_source.as_ref()).await;
        let snapshot = Snapshot::from_rows(&rows, Utc::now());
        info!(
            "Loaded {} games, {} recommendations, {} settled bets",
            snapshot.games.len(),
            snapshot.recommendations.len(),
            snapshot.stats.len()
        );
        report::render(&snapshot, &config, Utc::now())?;
        return Ok(());
    }

    // Watch mode: background refresh loop keeps the store current while the
    // foreground re-renders on its own cadence.
    let interval = Duration::from_secs(config.watch_secs);
    let store = SnapshotStore::new(Snapshot::empty(Utc::now()));
    source::start_refresh_loop(Arc::clone(&row_source), store.clone(), interval);

    let mut render_interval = tokio::time::interval(interval);
    render_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // Let the first refresh land before the first render.
    tokio::time::sleep(Duration::from_millis(500)).await;

    loop {
        // The first tick completes immediately, so the initial render is
        // not delayed by a full interval.
        render_interval.tick().await;
        let snapshot = store.current();
        info!("Rendering snapshot fetched at {}", snapshot.fetched_at);
        report::render(&snapshot, &config, Utc::now())?;
    }
}
