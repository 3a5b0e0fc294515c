use tracing::warn;

use crate::model::TeamSide;

/// Outcome of handicap-line resolution for one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLines {
    pub home_line: f64,
    pub away_line: f64,
    pub recommended_side: Option<TeamSide>,
    pub pick_even: bool,
}

impl ResolvedLines {
    fn zero() -> ResolvedLines {
        ResolvedLines {
            home_line: 0.0,
            away_line: 0.0,
            recommended_side: None,
            pick_even: true,
        }
    }
}

/// Resolve per-side handicap lines and the recommended side.
///
/// Priority order:
/// 1. explicit structured columns when both sides are present;
/// 2. free-text inference over the recommendation text;
/// 3. zero fallback (renders as pick-even).
///
/// Never errors — unresolvable data is represented by the zero state so
/// presentation always has a renderable value.
pub fn resolve_lines(
    structured_home: Option<f64>,
    structured_away: Option<f64>,
    has_recommendation: bool,
    recommendation_text: &str,
    home_team: &str,
    away_team: &str,
) -> ResolvedLines {
    let mut resolved = match (structured_home, structured_away) {
        (Some(home_line), Some(away_line)) => ResolvedLines {
            home_line,
            away_line,
            recommended_side: None,
            pick_even: false,
        },
        _ => infer_from_text(has_recommendation, recommendation_text, home_team, away_team)
            .unwrap_or_else(ResolvedLines::zero),
    };

    enforce_symmetry(&mut resolved, home_team, away_team);
    resolved.pick_even = resolved.home_line == 0.0 && resolved.away_line == 0.0;
    resolved
}

fn infer_from_text(
    has_recommendation: bool,
    text: &str,
    home_team: &str,
    away_team: &str,
) -> Option<ResolvedLines> {
    if !has_recommendation || text.trim().is_empty() {
        return None;
    }
    let (label, line) = split_pick_text(text)?;
    match match_team(&label, home_team, away_team)? {
        TeamSide::Home => Some(ResolvedLines {
            home_line: line,
            away_line: -line,
            recommended_side: Some(TeamSide::Home),
            pick_even: false,
        }),
        TeamSide::Away => Some(ResolvedLines {
            home_line: -line,
            away_line: line,
            recommended_side: Some(TeamSide::Away),
            pick_even: false,
        }),
    }
}

/// Split a pick string of the form `<team-label> <signed-decimal>`, e.g.
/// "Sparta Rotterdam +0.25". Returns the team label and the parsed line.
pub fn split_pick_text(text: &str) -> Option<(String, f64)> {
    let trimmed = text.trim();
    let (label, number) = trimmed.rsplit_once(char::is_whitespace)?;
    let line: f64 = number.parse().ok()?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    Some((label.to_string(), line))
}

/// Match a pick-text team label against the two team names.
///
/// Tiers, per side in home-then-away order: exact case-insensitive match,
/// substring containment in either direction, then the first
/// whitespace-delimited token of the team name. Ambiguous short labels can
/// mis-match; this is the single place where that heuristic lives.
pub fn match_team(label: &str, home_team: &str, away_team: &str) -> Option<TeamSide> {
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }
    let home = home_team.trim().to_lowercase();
    let away = away_team.trim().to_lowercase();

    if label == home {
        return Some(TeamSide::Home);
    }
    if label == away {
        return Some(TeamSide::Away);
    }

    if home.contains(&label) || label.contains(&home) {
        return Some(TeamSide::Home);
    }
    if away.contains(&label) || label.contains(&away) {
        return Some(TeamSide::Away);
    }

    if first_token(&home).is_some_and(|token| label.contains(token)) {
        return Some(TeamSide::Home);
    }
    if first_token(&away).is_some_and(|token| label.contains(token)) {
        return Some(TeamSide::Away);
    }

    None
}

fn first_token(name: &str) -> Option<&str> {
    name.split_whitespace().next()
}

/// Line symmetry (`home_line == -away_line`) must hold once resolution is
/// done. A violation means either inconsistent structured source data or an
/// inference bug: assert in test builds, degrade to the zero-line state with
/// an anomaly log in production.
fn enforce_symmetry(resolved: &mut ResolvedLines, home_team: &str, away_team: &str) {
    if resolved.home_line + resolved.away_line == 0.0 {
        return;
    }
    debug_assert!(
        false,
        "handicap symmetry violated for {home_team} vs {away_team}: {} / {}",
        resolved.home_line, resolved.away_line
    );
    warn!(
        "Handicap symmetry violated for {} vs {} ({} / {}); falling back to pick-even",
        home_team, away_team, resolved.home_line, resolved.away_line
    );
    resolved.home_line = 0.0;
    resolved.away_line = 0.0;
}
