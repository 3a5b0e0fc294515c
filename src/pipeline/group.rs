use std::collections::HashMap;

use crate::model::{Game, PREMIER_LEAGUE};

/// Games of one league, ordered by kick-off.
#[derive(Debug)]
pub struct LeagueGroup<'a> {
    pub league: String,
    pub tier: u8,
    pub games: Vec<&'a Game>,
}

/// Group games by league with the stable presentation order: the Premier
/// League always first, then ascending tier, then alphabetical league name.
pub fn group_by_league<'a>(games: impl IntoIterator<Item = &'a Game>) -> Vec<LeagueGroup<'a>> {
    let mut by_league: HashMap<String, Vec<&Game>> = HashMap::new();
    for game in games {
        by_league.entry(game.league.clone()).or_default().push(game);
    }

    let mut groups: Vec<LeagueGroup<'a>> = by_league
        .into_iter()
        .map(|(league, mut games)| {
            games.sort_by_key(|g| g.start_time);
            let tier = games.iter().map(|g| g.tier).min().unwrap_or(u8::MAX);
            LeagueGroup {
                league,
                tier,
                games,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        let a_key = (a.league != PREMIER_LEAGUE, a.tier, a.league.as_str());
        let b_key = (b.league != PREMIER_LEAGUE, b.tier, b.league.as_str());
        a_key.cmp(&b_key)
    });
    groups
}
