pub mod csv;
pub mod provider;
pub mod rows;

pub use csv::{FileCsvSource, HttpCsvSource};
pub use provider::{RowKind, RowSource, SourceError};
pub use rows::RawRow;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::pipeline::Snapshot;

/// One full acquisition pass: the raw rows of every kind.
#[derive(Debug, Default)]
pub struct RowSet {
    pub games: Vec<RawRow>,
    pub recommendations: Vec<RawRow>,
    pub settled: Vec<RawRow>,
}

/// Fetch all row kinds from the source concurrently. A kind that fails to
/// fetch degrades to an empty list with a warning — the pipeline is total
/// over empty inputs, and a partial snapshot beats no snapshot.
pub async fn fetch_row_set(source: &dyn RowSource) -> RowSet {
    let fetches = RowKind::ALL.map(|kind| async move { (kind, source.fetch_rows(kind).await) });
    let results = futures_util::future::join_all(fetches).await;

    let mut set = RowSet::default();
    for (kind, result) in results {
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Source '{}' failed for {:?}: {}", source.name(), kind, e);
                Vec::new()
            }
        };
        match kind {
            RowKind::Games => set.games = rows,
            RowKind::Recommendations => set.recommendations = rows,
            RowKind::SettledBets => set.settled = rows,
        }
    }
    set
}

/// Shared handle to the current snapshot. Readers clone an `Arc` out; a
/// refresh builds a complete new snapshot and swaps it in whole, so a reader
/// sees either the old state or the new state, never a mix.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> SnapshotStore {
        SnapshotStore {
            current: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().unwrap().clone()
    }

    pub fn swap(&self, snapshot: Snapshot) {
        *self.current.write().unwrap() = Arc::new(snapshot);
    }
}

/// Spawn the background refresh loop: fetch rows, rebuild the snapshot, swap
/// it into the store, sleep, repeat. A single sequential task — refreshes
/// cannot interleave, and the newest result always supersedes the older one.
pub fn start_refresh_loop(
    source: Arc<dyn RowSource>,
    store: SnapshotStore,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Refresh loop started (source: {}, interval: {:?})",
            source.name(),
            interval
        );
        loop {
            let rows = fetch_row_set(source.as_ref()).await;
            let snapshot = Snapshot::from_rows(&rows, Utc::now());
            info!(
                "Snapshot refreshed: {} games, {} recommendations, {} settled bets",
                snapshot.games.len(),
                snapshot.recommendations.len(),
                snapshot.stats.len()
            );
            store.swap(snapshot);

            // Jitter the sleep so repeated runs don't hammer the export host
            // on exact boundaries.
            let jitter = rand::thread_rng().gen_range(0..=interval.as_millis() as u64 / 10);
            tokio::time::sleep(interval + Duration::from_millis(jitter)).await;
        }
    })
}
