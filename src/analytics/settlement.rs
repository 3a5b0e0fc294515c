use crate::model::{Game, GameStatus, StatRow, TeamSide};

/// Settle an Asian-handicap bet from the final score.
///
/// `home_goals`/`away_goals` are the full-time score, `line` is the line on
/// the betted side (favorite-negative), `odds` the decimal odds taken.
/// Quarter lines split the stake across the two adjacent half-lines, which
/// produces the half-win and half-loss outcomes.
///
/// Returns the signed profit in units of stake (0 on a push).
pub fn resolve_ah_profit(
    home_goals: i32,
    away_goals: i32,
    line: f64,
    side: TeamSide,
    odds: f64,
    stake: f64,
) -> f64 {
    if odds <= 0.0 {
        return 0.0;
    }

    let margin = f64::from(home_goals - away_goals);
    let effective = match side {
        TeamSide::Home => margin + line,
        TeamSide::Away => -margin + line,
    };

    // Quarter lines are exact multiples of 0.25, so these comparisons are
    // binary-exact.
    if effective > 0.25 {
        (odds - 1.0) * stake
    } else if effective == 0.25 {
        (odds - 1.0) * stake / 2.0
    } else if effective == 0.0 {
        0.0
    } else if effective == -0.25 {
        -stake / 2.0
    } else {
        -stake
    }
}

/// Convert completed games that carry a resolved recommendation and a final
/// score into settled stat rows. Games missing any of side, score, or
/// completion are skipped silently — absence of a settleable bet is a
/// normal outcome, not an error.
pub fn settle_games(games: &[Game]) -> Vec<StatRow> {
    games
        .iter()
        .filter_map(|game| {
            if game.status != GameStatus::Complete || !game.has_recommendation {
                return None;
            }
            let side = game.recommended_side?;
            let home_goals = game.home_score?;
            let away_goals = game.away_score?;
            let line = game.line_for(side);
            let stake = 1.0;

            Some(StatRow {
                settled_at: game.start_time,
                league: game.league.clone(),
                home: game.home_team.clone(),
                away: game.away_team.clone(),
                side,
                line,
                odds: game.recommended_odds,
                stake,
                profit: resolve_ah_profit(
                    home_goals,
                    away_goals,
                    line,
                    side,
                    game.recommended_odds,
                    stake,
                ),
            })
        })
        .collect()
}
