use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::model::{ConfidenceTier, Game, Recommendation};

/// How long after kick-off a pick still counts as live. Matches that started
/// within this window remain visible in the live-picks view.
const LIVE_GRACE_MINUTES: i64 = 30;

/// How the filtered collection is consumed. The date-range and minimum-EV
/// dimensions deliberately behave differently per context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewContext {
    /// Mixed historical/upcoming schedule; games without a recommendation
    /// are first-class citizens.
    Schedule,
    /// Forward-looking recommendation-only list.
    LivePicks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    All,
    Days(u32),
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(raw: &str) -> Result<DateRange, String> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(DateRange::All);
        }
        trimmed
            .parse::<u32>()
            .map(DateRange::Days)
            .map_err(|_| format!("invalid date range '{raw}' (expected 'all' or a day count)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeagueChoice {
    All,
    Exact(String),
}

impl LeagueChoice {
    pub fn parse(raw: &str) -> LeagueChoice {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            LeagueChoice::All
        } else {
            LeagueChoice::Exact(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceChoice {
    All,
    Only(ConfidenceTier),
}

impl FromStr for ConfidenceChoice {
    type Err = String;

    fn from_str(raw: &str) -> Result<ConfidenceChoice, String> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(ConfidenceChoice::All);
        }
        match trimmed.to_lowercase().as_str() {
            "high" => Ok(ConfidenceChoice::Only(ConfidenceTier::High)),
            "medium" => Ok(ConfidenceChoice::Only(ConfidenceTier::Medium)),
            "low" => Ok(ConfidenceChoice::Only(ConfidenceTier::Low)),
            _ => Err(format!(
                "invalid confidence '{raw}' (expected 'all', 'high', 'medium' or 'low')"
            )),
        }
    }
}

/// The active filter parameter values. An immutable value passed into each
/// query — the orchestrating layer swaps in a new context rather than
/// mutating a shared one.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterContext {
    pub date_range: DateRange,
    pub league: LeagueChoice,
    /// Minimum expected value in percentage points (5.0 means 5%).
    pub min_ev_pct: f64,
    pub confidence: ConfidenceChoice,
}

impl Default for FilterContext {
    fn default() -> FilterContext {
        FilterContext {
            date_range: DateRange::All,
            league: LeagueChoice::All,
            min_ev_pct: 0.0,
            confidence: ConfidenceChoice::All,
        }
    }
}

/// Does a game pass the full filter chain in the given context? All four
/// dimensions must pass; evaluation is side-effect-free.
pub fn game_passes(
    game: &Game,
    ctx: &FilterContext,
    view: ViewContext,
    now: DateTime<Utc>,
) -> bool {
    passes_date_range(game.start_time, now, ctx.date_range, view)
        && passes_league(&game.league, &ctx.league)
        && passes_min_ev(
            game.has_recommendation,
            game.expected_value,
            ctx.min_ev_pct,
            view,
        )
        && passes_confidence(game.confidence, ctx.confidence)
}

/// Does a standalone recommendation pass the full filter chain? Every
/// record in this collection is a recommendation, so the EV dimension is
/// always constraining.
pub fn recommendation_passes(
    rec: &Recommendation,
    ctx: &FilterContext,
    view: ViewContext,
    now: DateTime<Utc>,
) -> bool {
    passes_date_range(rec.start_time, now, ctx.date_range, view)
        && passes_league(&rec.league, &ctx.league)
        && passes_min_ev(true, rec.expected_value, ctx.min_ev_pct, view)
        && passes_confidence(rec.confidence, ctx.confidence)
}

/// Date-range dimension. `Schedule` is symmetric around "now" (historical
/// records inside the window match too); `LivePicks` is forward-looking
/// with a short grace period for matches that just kicked off.
pub fn passes_date_range(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    range: DateRange,
    view: ViewContext,
) -> bool {
    let days = match range {
        DateRange::All => return true,
        DateRange::Days(days) => i64::from(days),
    };
    match view {
        ViewContext::Schedule => {
            let distance = (start - now).abs();
            distance <= Duration::days(days)
        }
        ViewContext::LivePicks => {
            start >= now - Duration::minutes(LIVE_GRACE_MINUTES)
                && start <= now + Duration::days(days)
        }
    }
}

/// League dimension: "all" or exact, case-sensitive equality.
pub fn passes_league(league: &str, choice: &LeagueChoice) -> bool {
    match choice {
        LeagueChoice::All => true,
        LeagueChoice::Exact(name) => league == name,
    }
}

/// Minimum-EV dimension. Thresholds are percentage points; stored values
/// are fractions and are scaled by 100 before comparison. Missing EV data
/// fails open in `Schedule` (the filter only constrains records that carry
/// a recommendation) and fails closed in `LivePicks` (an unrankable pick
/// must not be shown).
pub fn passes_min_ev(
    has_recommendation: bool,
    expected_value: Option<f64>,
    min_ev_pct: f64,
    view: ViewContext,
) -> bool {
    match view {
        ViewContext::Schedule => {
            if !has_recommendation {
                return true;
            }
            match expected_value {
                Some(ev) => ev * 100.0 >= min_ev_pct,
                None => true,
            }
        }
        ViewContext::LivePicks => match expected_value {
            Some(ev) => ev * 100.0 >= min_ev_pct,
            None => false,
        },
    }
}

/// Confidence dimension: "all" or exact tier equality.
pub fn passes_confidence(tier: ConfidenceTier, choice: ConfidenceChoice) -> bool {
    match choice {
        ConfidenceChoice::All => true,
        ConfidenceChoice::Only(wanted) => tier == wanted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawRow;
    use serde_json::json;

    fn game(wall_clock: &str, league: &str, rec: bool, ev: Option<f64>) -> Game {
        let mut row = RawRow::new();
        row.set("datetime_gmt8", json!(wall_clock));
        row.set("league", json!(league));
        row.set("home_name", json!("Home"));
        row.set("away_name", json!("Away"));
        row.set("has_recommendation", json!(rec));
        if let Some(ev) = ev {
            row.set("rec_ev", json!(ev));
        }
        crate::pipeline::parse::parse_games(&[row]).remove(0)
    }

    fn rec(wall_clock: &str, ev: Option<f64>) -> Recommendation {
        let mut row = RawRow::new();
        row.set("datetime_gmt8", json!(wall_clock));
        row.set("home_name", json!("Home"));
        row.set("away_name", json!("Away"));
        if let Some(ev) = ev {
            row.set("ev", json!(ev));
        }
        crate::pipeline::parse::parse_recommendations(&[row]).remove(0)
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().expect("valid test instant")
    }

    #[test]
    fn test_schedule_range_is_symmetric() {
        let now = at("2025-03-10T20:00:00Z");
        let range = DateRange::Days(1);
        // 12 hours in the past passes in schedule context.
        assert!(passes_date_range(
            at("2025-03-10T08:00:00Z"),
            now,
            range,
            ViewContext::Schedule
        ));
        // 2 days out fails.
        assert!(!passes_date_range(
            at("2025-03-12T21:00:00Z"),
            now,
            range,
            ViewContext::Schedule
        ));
    }

    #[test]
    fn test_live_picks_grace_window() {
        let now = at("2025-03-10T20:00:00Z");
        let range = DateRange::Days(1);
        // 15 minutes into the match: still live.
        assert!(passes_date_range(
            at("2025-03-10T19:45:00Z"),
            now,
            range,
            ViewContext::LivePicks
        ));
        // 60 minutes in: gone.
        assert!(!passes_date_range(
            at("2025-03-10T19:00:00Z"),
            now,
            range,
            ViewContext::LivePicks
        ));
        // Too far in the future: gone.
        assert!(!passes_date_range(
            at("2025-03-12T20:00:00Z"),
            now,
            range,
            ViewContext::LivePicks
        ));
    }

    #[test]
    fn test_all_range_passes_everything() {
        let now = at("2025-03-10T20:00:00Z");
        for view in [ViewContext::Schedule, ViewContext::LivePicks] {
            assert!(passes_date_range(
                at("1999-01-01T00:00:00Z"),
                now,
                DateRange::All,
                view
            ));
        }
    }

    #[test]
    fn test_league_exact_is_case_sensitive() {
        assert!(passes_league("Spain La Liga", &LeagueChoice::All));
        assert!(passes_league(
            "Spain La Liga",
            &LeagueChoice::Exact("Spain La Liga".to_string())
        ));
        assert!(!passes_league(
            "Spain La Liga",
            &LeagueChoice::Exact("spain la liga".to_string())
        ));
    }

    #[test]
    fn test_ev_fail_open_in_schedule() {
        for threshold in 0..=100 {
            let threshold = f64::from(threshold);
            // No recommendation: always passes.
            assert!(passes_min_ev(false, None, threshold, ViewContext::Schedule));
            // Recommendation with unresolved EV: still passes.
            assert!(passes_min_ev(true, None, threshold, ViewContext::Schedule));
        }
        // A resolved EV is constrained normally.
        assert!(passes_min_ev(
            true,
            Some(0.08),
            5.0,
            ViewContext::Schedule
        ));
        assert!(!passes_min_ev(
            true,
            Some(0.02),
            5.0,
            ViewContext::Schedule
        ));
    }

    #[test]
    fn test_ev_fail_closed_in_live_picks() {
        for threshold in 0..=100 {
            let threshold = f64::from(threshold);
            assert!(!passes_min_ev(
                true,
                None,
                threshold,
                ViewContext::LivePicks
            ));
        }
        assert!(passes_min_ev(
            true,
            Some(0.18),
            5.0,
            ViewContext::LivePicks
        ));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let now = at("2025-03-10T12:00:00Z");
        // Kick-off 20:30 GMT+8 on the same day = 12:30 UTC.
        let g = game(
            "2025-03-10 20:30:00",
            "Spain La Liga",
            true,
            Some(0.08),
        );

        let pass = FilterContext {
            date_range: DateRange::Days(1),
            league: LeagueChoice::Exact("Spain La Liga".to_string()),
            min_ev_pct: 5.0,
            confidence: ConfidenceChoice::All,
        };
        assert!(game_passes(&g, &pass, ViewContext::Schedule, now));

        // Flipping any single dimension fails the whole chain.
        let mut wrong_league = pass.clone();
        wrong_league.league = LeagueChoice::Exact("England Premier League".to_string());
        let mut high_ev = pass.clone();
        high_ev.min_ev_pct = 20.0;
        let mut wrong_conf = pass.clone();
        wrong_conf.confidence = ConfidenceChoice::Only(ConfidenceTier::High);
        let mut tight_range = pass.clone();
        tight_range.date_range = DateRange::Days(0);

        for ctx in [&wrong_league, &high_ev, &wrong_conf] {
            assert!(!game_passes(&g, ctx, ViewContext::Schedule, now));
        }
        // A zero-day window still admits a game 30 minutes away (distance
        // under one day is not what Days(0) means: distance must be <= 0
        // days, so it fails).
        assert!(!game_passes(&g, &tight_range, ViewContext::Schedule, now));

        // Conjunctivity: combined pass == every dimension passing.
        let combined = game_passes(&g, &pass, ViewContext::Schedule, now);
        let individual = passes_date_range(g.start_time, now, pass.date_range, ViewContext::Schedule)
            && passes_league(&g.league, &pass.league)
            && passes_min_ev(
                g.has_recommendation,
                g.expected_value,
                pass.min_ev_pct,
                ViewContext::Schedule,
            )
            && passes_confidence(g.confidence, pass.confidence);
        assert_eq!(combined, individual);
    }

    #[test]
    fn test_recommendation_ev_always_constrains() {
        let now = at("2025-03-10T12:00:00Z");
        let r = rec("2025-03-10 21:00:00", None);
        let ctx = FilterContext::default();
        // Even with a zero threshold, an EV-less pick is rejected in the
        // live-picks view.
        assert!(!recommendation_passes(&r, &ctx, ViewContext::LivePicks, now));

        let ranked = rec("2025-03-10 21:00:00", Some(0.05));
        assert!(recommendation_passes(
            &ranked,
            &ctx,
            ViewContext::LivePicks,
            now
        ));
    }

    #[test]
    fn test_date_range_parsing() {
        assert_eq!("all".parse::<DateRange>(), Ok(DateRange::All));
        assert_eq!("ALL".parse::<DateRange>(), Ok(DateRange::All));
        assert_eq!("3".parse::<DateRange>(), Ok(DateRange::Days(3)));
        assert!("-1".parse::<DateRange>().is_err());
        assert!("soon".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_confidence_choice_parsing() {
        assert_eq!(
            "high".parse::<ConfidenceChoice>(),
            Ok(ConfidenceChoice::Only(ConfidenceTier::High))
        );
        assert_eq!("all".parse::<ConfidenceChoice>(), Ok(ConfidenceChoice::All));
        assert!("sky-high".parse::<ConfidenceChoice>().is_err());
    }
}
