use clap::{Parser, ValueEnum};

use crate::pipeline::{ConfidenceChoice, DateRange, FilterContext, LeagueChoice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Day-bucketed schedule grouped by league.
    Schedule,
    /// Forward-looking recommendation list.
    LivePicks,
    /// ROI heatmap, top segments and parlay wins.
    Analytics,
}

/// Asian-handicap picks pipeline
#[derive(Parser, Debug, Clone)]
#[command(name = "pickline", version, about)]
pub struct Config {
    /// CSV export location: a directory or an http(s) base URL
    #[arg(long, env = "DATA_SOURCE", default_value = "site")]
    pub data_source: String,

    /// View to render
    #[arg(long, env = "VIEW", value_enum, default_value = "schedule")]
    pub view: View,

    /// Day bucket to show in the schedule view (clamped to the bucket list)
    #[arg(long, env = "BUCKET", default_value = "0")]
    pub bucket: usize,

    /// Date-range filter: "all" or a day count
    #[arg(long, env = "DATE_RANGE", default_value = "all")]
    pub date_range: String,

    /// League filter: "all" or an exact league name
    #[arg(long, env = "LEAGUE", default_value = "all")]
    pub league: String,

    /// Minimum expected value in percentage points (5 = 5%)
    #[arg(long, env = "MIN_EV", default_value = "0.0")]
    pub min_ev: f64,

    /// Confidence filter: "all", "high", "medium" or "low"
    #[arg(long, env = "CONFIDENCE", default_value = "all")]
    pub confidence: String,

    /// Re-fetch and re-render at this interval in seconds; 0 runs once
    #[arg(long, env = "WATCH_SECS", default_value = "0")]
    pub watch_secs: u64,

    /// Minimum settled bets for a heatmap cell to qualify as a top segment
    #[arg(long, env = "MIN_SEGMENT_BETS", default_value = "5")]
    pub min_segment_bets: usize,

    /// Number of top segments to list
    #[arg(long, env = "TOP_SEGMENTS", default_value = "10")]
    pub top_segments: usize,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=100.0).contains(&self.min_ev) {
            anyhow::bail!("min_ev must be between 0 and 100 (percentage points)");
        }
        if self.watch_secs != 0 && self.watch_secs < 5 {
            anyhow::bail!("watch_secs must be 0 (one-shot) or at least 5");
        }
        self.date_range
            .parse::<DateRange>()
            .map_err(anyhow::Error::msg)?;
        self.confidence
            .parse::<ConfidenceChoice>()
            .map_err(anyhow::Error::msg)?;
        Ok(())
    }

    /// The filter context the CLI flags describe. `validate()` has already
    /// established that the raw strings parse.
    pub fn filter_context(&self) -> anyhow::Result<FilterContext> {
        Ok(FilterContext {
            date_range: self
                .date_range
                .parse::<DateRange>()
                .map_err(anyhow::Error::msg)?,
            league: LeagueChoice::parse(&self.league),
            min_ev_pct: self.min_ev,
            confidence: self
                .confidence
                .parse::<ConfidenceChoice>()
                .map_err(anyhow::Error::msg)?,
        })
    }

    pub fn uses_http(&self) -> bool {
        self.data_source.starts_with("http://") || self.data_source.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("pickline").chain(args.iter().copied()))
            .expect("args should parse")
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = config(&[]);
        cfg.validate().expect("defaults validate");
        let ctx = cfg.filter_context().expect("defaults build a context");
        assert_eq!(ctx, FilterContext::default());
    }

    #[test]
    fn test_filter_flags() {
        let cfg = config(&[
            "--date-range",
            "3",
            "--league",
            "Spain La Liga",
            "--min-ev",
            "5",
            "--confidence",
            "high",
        ]);
        cfg.validate().expect("flags validate");
        let ctx = cfg.filter_context().unwrap();
        assert_eq!(ctx.date_range, DateRange::Days(3));
        assert_eq!(ctx.league, LeagueChoice::Exact("Spain La Liga".to_string()));
        assert_eq!(ctx.min_ev_pct, 5.0);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        assert!(config(&["--date-range", "soon"]).validate().is_err());
        assert!(config(&["--confidence", "sure"]).validate().is_err());
        assert!(config(&["--min-ev", "150"]).validate().is_err());
        assert!(config(&["--watch-secs", "1"]).validate().is_err());
    }

    #[test]
    fn test_source_kind_detection() {
        assert!(config(&["--data-source", "https://example.com/site"]).uses_http());
        assert!(!config(&["--data-source", "./site"]).uses_http());
    }
}
