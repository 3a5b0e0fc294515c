use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::model::{
    ConfidenceTier, Game, GameStatus, Recommendation, StatRow, TeamSide, league_tier,
};
use crate::source::RawRow;

use super::handicap;

/// The source system timestamps everything in GMT+8 wall-clock time.
const REPORT_OFFSET_SECS: i32 = 8 * 3600;

pub fn report_offset() -> FixedOffset {
    FixedOffset::east_opt(REPORT_OFFSET_SECS).expect("static offset is valid")
}

/// Parse a `"YYYY-MM-DD[ HH:MM:SS]"` wall-clock string in the fixed GMT+8
/// frame into a UTC instant. The time portion defaults to midnight.
/// Malformed components reject (`None`) rather than defaulting.
pub fn parse_report_time(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    // A fixed offset has no gaps or folds, so this always resolves uniquely.
    let local = naive.and_local_timezone(report_offset()).single()?;
    Some(local.with_timezone(&Utc))
}

/// Render a UTC instant back into the GMT+8 wall-clock frame.
pub fn format_report_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&report_offset())
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Parse game rows. Rows missing identity fields (start time, home, away)
/// or with unparseable start times are dropped silently; malformed numeric
/// fields degrade to defaults instead of rejecting the row.
pub fn parse_games(rows: &[RawRow]) -> Vec<Game> {
    rows.iter().filter_map(parse_game).collect()
}

fn parse_game(row: &RawRow) -> Option<Game> {
    let start_time = parse_report_time(&row.text(&["datetime_gmt8", "dt_gmt8"])?)?;
    let home_team = row.text(&["home_name", "home"])?;
    let away_team = row.text(&["away_name", "away"])?;

    let league = row.text(&["league"]).unwrap_or_default();
    let tier = row
        .number(&["tier"])
        .map(|t| t as u8)
        .unwrap_or_else(|| league_tier(&league));

    let market_odds = [
        row.number(&["odds_home", "odds_ft_1"]),
        row.number(&["odds_draw", "odds_ft_x"]),
        row.number(&["odds_away", "odds_ft_2"]),
    ];

    let recommendation_text = row.text(&["rec_text"]).unwrap_or_default();
    let has_recommendation = row
        .flag(&["has_recommendation"])
        .unwrap_or(!recommendation_text.is_empty());
    let recommended_odds = row.number(&["rec_odds"]).unwrap_or(0.0);
    let expected_value = row.number(&["rec_ev", "ev"]);
    let confidence = row
        .text(&["rec_confidence", "confidence"])
        .map(|s| ConfidenceTier::parse(&s))
        .unwrap_or(ConfidenceTier::Medium);
    let analysis_note = row.text(&["rec_note", "note"]).unwrap_or_default();

    let status = row
        .text(&["status"])
        .map(|s| GameStatus::parse(&s))
        .unwrap_or(GameStatus::Incomplete);
    let home_score = row.number(&["home_score"]).map(|v| v as i32);
    let away_score = row.number(&["away_score"]).map(|v| v as i32);

    let lines = handicap::resolve_lines(
        row.number(&["home_line"]),
        row.number(&["away_line"]),
        has_recommendation,
        &recommendation_text,
        &home_team,
        &away_team,
    );

    Some(Game {
        start_time,
        league,
        tier,
        home_team,
        away_team,
        market_odds,
        has_recommendation,
        recommendation_text,
        recommended_odds,
        expected_value,
        confidence,
        analysis_note,
        status,
        home_score,
        away_score,
        home_line: lines.home_line,
        away_line: lines.away_line,
        recommended_side: lines.recommended_side,
        pick_even: lines.pick_even,
    })
}

/// Parse standalone recommendation rows. Identity rules match game rows.
pub fn parse_recommendations(rows: &[RawRow]) -> Vec<Recommendation> {
    rows.iter().filter_map(parse_recommendation).collect()
}

fn parse_recommendation(row: &RawRow) -> Option<Recommendation> {
    let start_time = parse_report_time(&row.text(&["datetime_gmt8", "dt_gmt8"])?)?;
    let home_team = row.text(&["home_name", "home"])?;
    let away_team = row.text(&["away_name", "away"])?;

    Some(Recommendation {
        start_time,
        league: row.text(&["league"]).unwrap_or_default(),
        home_team,
        away_team,
        pick_text: row.text(&["pick_text", "rec_text"]).unwrap_or_default(),
        line: row.number(&["line"]).unwrap_or(0.0),
        odds: row.number(&["odds", "rec_odds"]).unwrap_or(0.0),
        expected_value: row.number(&["ev", "rec_ev"]),
        confidence: row
            .text(&["confidence", "rec_confidence"])
            .map(|s| ConfidenceTier::parse(&s))
            .unwrap_or(ConfidenceTier::Medium),
        analysis_note: row.text(&["note", "rec_note"]).unwrap_or_default(),
    })
}

/// Parse settled-bet rows from the performance export.
pub fn parse_stat_rows(rows: &[RawRow]) -> Vec<StatRow> {
    rows.iter().filter_map(parse_stat_row).collect()
}

fn parse_stat_row(row: &RawRow) -> Option<StatRow> {
    let settled_at = parse_report_time(&row.text(&["dt_gmt8", "datetime_gmt8"])?)?;
    let home = row.text(&["home", "home_name"])?;
    let away = row.text(&["away", "away_name"])?;

    // The export spells the side as a bet-type tag, e.g. "bet_home_refined_ah".
    let side_raw = row
        .text(&["bet_type_refined_ah", "side"])
        .unwrap_or_default()
        .to_lowercase();
    let side = if side_raw.contains("home") {
        TeamSide::Home
    } else if side_raw.contains("away") {
        TeamSide::Away
    } else {
        return None;
    };

    Some(StatRow {
        settled_at,
        league: row.text(&["league"]).unwrap_or_default(),
        home,
        away,
        side,
        line: row
            .number(&["line_betted_on_refined", "line"])
            .unwrap_or(0.0),
        odds: row
            .number(&["odds_betted_on_refined", "odds"])
            .unwrap_or(0.0),
        stake: row.number(&["stake"]).unwrap_or(1.0),
        profit: row.number(&["pl", "profit"]).unwrap_or(0.0),
    })
}
