pub mod buckets;
pub mod filter;
pub mod group;
pub mod handicap;
pub mod parse;

pub use buckets::{clamp_bucket_index, day_buckets, games_in_bucket, report_date};
pub use filter::{
    ConfidenceChoice, DateRange, FilterContext, LeagueChoice, ViewContext, game_passes,
    recommendation_passes,
};
pub use group::{LeagueGroup, group_by_league};

use chrono::{DateTime, Utc};

use crate::model::{DayBucket, Game, Recommendation, StatRow};
use crate::source::RowSet;

/// One fully derived, immutable view of the source data. Built from a raw
/// row set in a single pass and replaced wholesale on refresh; queries
/// borrow from it and never mutate it.
#[derive(Debug)]
pub struct Snapshot {
    pub games: Vec<Game>,
    pub recommendations: Vec<Recommendation>,
    pub stats: Vec<StatRow>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn from_rows(rows: &RowSet, fetched_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            games: parse::parse_games(&rows.games),
            recommendations: parse::parse_recommendations(&rows.recommendations),
            stats: parse::parse_stat_rows(&rows.settled),
            fetched_at,
        }
    }

    pub fn empty(fetched_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            games: Vec::new(),
            recommendations: Vec::new(),
            stats: Vec::new(),
            fetched_at,
        }
    }

    /// The day buckets covering the current game collection.
    pub fn day_buckets(&self) -> Vec<DayBucket> {
        buckets::day_buckets(&self.games)
    }

    /// Games falling on the bucket at `index`, after clamping a stale index
    /// back to the first bucket. Empty when there are no buckets at all.
    pub fn games_in_bucket(&self, index: usize) -> Vec<&Game> {
        let buckets = self.day_buckets();
        if buckets.is_empty() {
            return Vec::new();
        }
        let bucket = buckets[buckets::clamp_bucket_index(index, &buckets)];
        buckets::games_in_bucket(&self.games, &bucket)
    }

    /// Games passing the filter chain in the given consumption context.
    pub fn filter_games(
        &self,
        ctx: &FilterContext,
        view: ViewContext,
        now: DateTime<Utc>,
    ) -> Vec<&Game> {
        self.games
            .iter()
            .filter(|g| filter::game_passes(g, ctx, view, now))
            .collect()
    }

    /// Standalone recommendations passing the filter chain; the live-picks
    /// view is the usual consumer.
    pub fn filter_recommendations(
        &self,
        ctx: &FilterContext,
        view: ViewContext,
        now: DateTime<Utc>,
    ) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| filter::recommendation_passes(r, ctx, view, now))
            .collect()
    }

    /// Filtered games grouped by league in presentation order.
    pub fn league_groups(
        &self,
        ctx: &FilterContext,
        view: ViewContext,
        now: DateTime<Utc>,
    ) -> Vec<LeagueGroup<'_>> {
        group::group_by_league(self.filter_games(ctx, view, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawRow;
    use serde_json::json;

    fn game_row(wall_clock: &str, league: &str) -> RawRow {
        let mut row = RawRow::new();
        row.set("datetime_gmt8", json!(wall_clock));
        row.set("league", json!(league));
        row.set("home_name", json!("Home"));
        row.set("away_name", json!("Away"));
        row
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().expect("valid test instant")
    }

    #[test]
    fn test_empty_row_set_yields_empty_outputs() {
        let snapshot = Snapshot::from_rows(&RowSet::default(), at("2025-03-10T12:00:00Z"));
        assert!(snapshot.games.is_empty());
        assert!(snapshot.recommendations.is_empty());
        assert!(snapshot.stats.is_empty());
        assert!(snapshot.day_buckets().is_empty());
        assert!(snapshot.games_in_bucket(0).is_empty());
    }

    #[test]
    fn test_snapshot_query_surface() {
        let rows = RowSet {
            games: vec![
                game_row("2025-09-14 21:00:00", "England Premier League"),
                game_row("2025-09-15 18:00:00", "Japan J1 League"),
            ],
            recommendations: Vec::new(),
            settled: Vec::new(),
        };
        let snapshot = Snapshot::from_rows(&rows, at("2025-09-14T00:00:00Z"));

        assert_eq!(snapshot.day_buckets().len(), 2);
        assert_eq!(snapshot.games_in_bucket(0).len(), 1);
        // A stale bucket selection clamps back to the first day.
        assert_eq!(
            snapshot.games_in_bucket(9)[0].league,
            "England Premier League"
        );

        let groups = snapshot.league_groups(
            &FilterContext::default(),
            ViewContext::Schedule,
            at("2025-09-14T12:00:00Z"),
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].league, "England Premier League");
    }
}
