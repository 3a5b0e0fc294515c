use std::collections::HashMap;

use chrono::Datelike;

use crate::model::StatRow;
use crate::pipeline::report_date;

use super::LineBand;

/// One (league, line-band) cell of the ROI heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiCell {
    pub league: String,
    pub band: LineBand,
    pub bets: usize,
    pub staked: f64,
    pub profit: f64,
}

impl RoiCell {
    /// Return on investment over the cell's turnover; 0 with no turnover.
    pub fn roi(&self) -> f64 {
        if self.staked > 0.0 {
            self.profit / self.staked
        } else {
            0.0
        }
    }
}

/// Aggregate settled bets into ROI heatmap cells, ordered by league name
/// then band.
pub fn roi_heatmap(stats: &[StatRow]) -> Vec<RoiCell> {
    let mut cells: HashMap<(String, LineBand), RoiCell> = HashMap::new();
    for row in stats {
        let band = LineBand::of(row.line);
        let cell = cells
            .entry((row.league.clone(), band))
            .or_insert_with(|| RoiCell {
                league: row.league.clone(),
                band,
                bets: 0,
                staked: 0.0,
                profit: 0.0,
            });
        cell.bets += 1;
        cell.staked += row.stake;
        cell.profit += row.profit;
    }

    let mut cells: Vec<RoiCell> = cells.into_values().collect();
    cells.sort_by(|a, b| (&a.league, a.band).cmp(&(&b.league, b.band)));
    cells
}

/// The heatmap cells with at least `min_bets` settled bets, ranked by ROI
/// descending, truncated to `top`.
pub fn top_segments(cells: &[RoiCell], min_bets: usize, top: usize) -> Vec<RoiCell> {
    let mut qualified: Vec<RoiCell> = cells
        .iter()
        .filter(|c| c.bets >= min_bets)
        .cloned()
        .collect();
    qualified.sort_by(|a, b| b.roi().total_cmp(&a.roi()));
    qualified.truncate(top);
    qualified
}

/// Headline performance numbers over the settled-bet collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub settled: usize,
    pub wins: usize,
    pub staked: f64,
    pub profit: f64,
    /// Profit per GMT+8 calendar month, chronological, keyed "YYYY-MM".
    pub profit_by_month: Vec<(String, f64)>,
}

impl SummaryMetrics {
    pub fn hit_rate(&self) -> f64 {
        if self.settled > 0 {
            self.wins as f64 / self.settled as f64
        } else {
            0.0
        }
    }

    pub fn roi(&self) -> f64 {
        if self.staked > 0.0 {
            self.profit / self.staked
        } else {
            0.0
        }
    }
}

pub fn summarize(stats: &[StatRow]) -> SummaryMetrics {
    let mut by_month: HashMap<String, f64> = HashMap::new();
    let mut wins = 0;
    let mut staked = 0.0;
    let mut profit = 0.0;

    for row in stats {
        if row.won() {
            wins += 1;
        }
        staked += row.stake;
        profit += row.profit;
        let date = report_date(row.settled_at);
        let month = format!("{:04}-{:02}", date.year(), date.month());
        *by_month.entry(month).or_default() += row.profit;
    }

    let mut profit_by_month: Vec<(String, f64)> = by_month.into_iter().collect();
    profit_by_month.sort_by(|a, b| a.0.cmp(&b.0));

    SummaryMetrics {
        settled: stats.len(),
        wins,
        staked,
        profit,
        profit_by_month,
    }
}
