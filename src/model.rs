use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a match a line or pick refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

/// Coarse three-level rating attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Parse a tier label case-insensitively. Unknown or empty labels fall
    /// back to `Medium`, the neutral default.
    pub fn parse(raw: &str) -> ConfidenceTier {
        match raw.trim().to_lowercase().as_str() {
            "high" => ConfidenceTier::High,
            "low" => ConfidenceTier::Low,
            _ => ConfidenceTier::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::Low => "Low",
        }
    }
}

/// Whether a match has been played out in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Incomplete,
    Complete,
}

impl GameStatus {
    pub fn parse(raw: &str) -> GameStatus {
        match raw.trim().to_lowercase().as_str() {
            "complete" | "finished" | "ft" => GameStatus::Complete,
            _ => GameStatus::Incomplete,
        }
    }
}

/// A single scheduled match, with any staff recommendation attached.
///
/// Constructed once per raw row during ingestion and immutable thereafter;
/// the whole collection is superseded on each data refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Kick-off instant (source data carries GMT+8 wall-clock strings).
    pub start_time: DateTime<Utc>,
    pub league: String,
    /// League prestige tier; lower is more prestigious.
    pub tier: u8,
    pub home_team: String,
    pub away_team: String,
    /// 1X2 market odds: home / draw / away.
    pub market_odds: [Option<f64>; 3],
    pub has_recommendation: bool,
    /// Free-text pick, e.g. "Arsenal -1.5".
    pub recommendation_text: String,
    pub recommended_odds: f64,
    /// Expected value as a signed fraction (0.18 = +18%). `None` when the
    /// source row carried no usable value — the EV filter gives absence
    /// different defaults per consumption context.
    pub expected_value: Option<f64>,
    pub confidence: ConfidenceTier,
    pub analysis_note: String,
    pub status: GameStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    /// Resolved handicap line for the home side (negative = favorite).
    pub home_line: f64,
    /// Resolved handicap line for the away side; always `-home_line`.
    pub away_line: f64,
    /// Side the recommendation backs, when text inference resolved one.
    pub recommended_side: Option<TeamSide>,
    /// Both lines are exactly zero (a true pick-even line and missing line
    /// data collapse to the same representation).
    pub pick_even: bool,
}

impl Game {
    /// Resolved line for the given side.
    pub fn line_for(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home_line,
            TeamSide::Away => self.away_line,
        }
    }
}

/// A standalone betting tip. Team names are free text, not keys into the
/// game collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub start_time: DateTime<Utc>,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub pick_text: String,
    pub line: f64,
    pub odds: f64,
    pub expected_value: Option<f64>,
    pub confidence: ConfidenceTier,
    pub analysis_note: String,
}

/// One settled Asian-handicap bet from the performance export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatRow {
    /// Match kick-off (GMT+8 wall-clock in the source data).
    pub settled_at: DateTime<Utc>,
    pub league: String,
    pub home: String,
    pub away: String,
    pub side: TeamSide,
    /// Line taken on the betted side.
    pub line: f64,
    pub odds: f64,
    pub stake: f64,
    /// Profit in units of stake; negative on a loss.
    pub profit: f64,
}

impl StatRow {
    pub fn won(&self) -> bool {
        self.profit > 0.0
    }
}

/// One calendar day (GMT+8 wall-clock date) used for schedule navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// 0-based chronological position in the current bucket list.
    pub index: usize,
    pub date: NaiveDate,
}

/// League always listed first in grouped schedule views.
pub const PREMIER_LEAGUE: &str = "England Premier League";

/// Tier applied when neither the row nor the built-in table knows the league.
pub const DEFAULT_TIER: u8 = 3;

/// Built-in league prestige tiers, used when the source row carries no
/// explicit tier column.
pub fn league_tier(league: &str) -> u8 {
    match league {
        "England Premier League"
        | "Spain La Liga"
        | "Germany Bundesliga"
        | "Italy Serie A"
        | "France Ligue 1" => 1,
        "England Championship"
        | "Netherlands Eredivisie"
        | "Portugal Liga NOS"
        | "Belgium Pro League"
        | "Scotland Premiership" => 2,
        _ => DEFAULT_TIER,
    }
}
