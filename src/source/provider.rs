use async_trait::async_trait;
use thiserror::Error;

use super::rows::RawRow;

/// The three tabular exports the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Match schedule with attached recommendations (`unified_games.csv`).
    Games,
    /// Standalone tips (`recommendations_latest.csv`).
    Recommendations,
    /// Settled-bet performance statistics (`settled_bets.csv`).
    SettledBets,
}

impl RowKind {
    pub const ALL: [RowKind; 3] = [
        RowKind::Games,
        RowKind::Recommendations,
        RowKind::SettledBets,
    ];

    /// Conventional export file name for this kind.
    pub fn file_name(&self) -> &'static str {
        match self {
            RowKind::Games => "unified_games.csv",
            RowKind::Recommendations => "recommendations_latest.csv",
            RowKind::SettledBets => "settled_bets.csv",
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv decode failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Trait every raw-row supplier must implement. The pipeline itself never
/// performs I/O; it is handed full row snapshots through this seam.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch a full snapshot of rows of the given kind.
    async fn fetch_rows(&self, kind: RowKind) -> Result<Vec<RawRow>, SourceError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
