use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::{StatRow, TeamSide, league_tier};

/// Seconds per parlay window: winning legs are combined only when their
/// matches fall inside the same 6-hour slot.
const WINDOW_SECS: i64 = 6 * 60 * 60;

/// Minimum legs for any parlay.
const MIN_LEGS: usize = 3;
/// At most this many legs per window are considered (earliest first).
const MAX_WINDOW_LEGS: usize = 12;
/// Flat stake per constructed parlay, in display units.
const PARLAY_STAKE: f64 = 100.0;
/// Odds bonus applied when a same-league parlay reaches four legs.
const SAME_LEAGUE_BONUS: f64 = 1.05;

#[derive(Debug, Clone, PartialEq)]
pub enum ParlayKind {
    SameLeague(String),
    SameTier(u8),
    Mixed,
}

impl ParlayKind {
    pub fn label(&self) -> String {
        match self {
            ParlayKind::SameLeague(league) => format!("SAME LEAGUE - {league}"),
            ParlayKind::SameTier(tier) => format!("TIER {tier}"),
            ParlayKind::Mixed => "MIXED".to_string(),
        }
    }
}

/// A retrospective winning parlay assembled from settled legs.
#[derive(Debug, Clone)]
pub struct Parlay {
    pub kind: ParlayKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub legs: Vec<String>,
    pub combined_odds: f64,
    pub stake: f64,
    pub payout: f64,
    pub profit: f64,
}

#[derive(Debug, Clone)]
struct Leg {
    at: DateTime<Utc>,
    league: String,
    tier: u8,
    odds: f64,
    description: String,
}

fn leg_from_stat(row: &StatRow) -> Leg {
    let side = match row.side {
        TeamSide::Home => &row.home,
        TeamSide::Away => &row.away,
    };
    let line = if row.line >= 0.0 {
        format!("+{}", row.line)
    } else {
        row.line.to_string()
    };
    Leg {
        at: row.settled_at,
        league: row.league.clone(),
        tier: league_tier(&row.league),
        odds: row.odds,
        description: format!(
            "{} vs {} | {side} {line}@{:.2}",
            row.home, row.away, row.odds
        ),
    }
}

/// Build the parlay-wins report: winning legs grouped into 6-hour windows,
/// combined in priority order — same-league first (3–5 legs, with an odds
/// bonus at four or more), then same-tier across leagues (3–4 legs) from
/// legs not already used, then a single mixed 3-leg fallback. Per group and
/// size only the highest-odds combination is kept.
pub fn build_parlays(stats: &[StatRow]) -> Vec<Parlay> {
    // Window key -> winning legs, keyed by the floor of the 6-hour slot so
    // iteration is chronological.
    let mut windows: BTreeMap<i64, Vec<Leg>> = BTreeMap::new();
    for row in stats.iter().filter(|r| r.won()) {
        let slot = row.settled_at.timestamp().div_euclid(WINDOW_SECS);
        windows.entry(slot).or_default().push(leg_from_stat(row));
    }

    let mut parlays = Vec::new();
    for (_, mut legs) in windows {
        if legs.len() < MIN_LEGS {
            continue;
        }
        legs.sort_by_key(|l| l.at);
        legs.truncate(MAX_WINDOW_LEGS);
        build_window_parlays(&legs, &mut parlays);
    }
    parlays
}

fn build_window_parlays(legs: &[Leg], parlays: &mut Vec<Parlay>) {
    let mut used: HashSet<usize> = HashSet::new();

    // Priority 1: same-league parlays.
    for (league, members) in group_indices(legs, |l| l.league.clone()) {
        if members.len() < MIN_LEGS {
            continue;
        }
        for size in MIN_LEGS..=members.len().min(5) {
            let bonus = if size >= 4 { SAME_LEAGUE_BONUS } else { 1.0 };
            if let Some(combo) = best_combo(legs, &members, size, bonus) {
                used.extend(combo.iter().copied());
                parlays.push(make_parlay(
                    legs,
                    &combo,
                    bonus,
                    ParlayKind::SameLeague(league.clone()),
                ));
            }
        }
    }

    // Priority 2: same-tier cross-league parlays from unused legs.
    let mut tier_used: HashSet<usize> = HashSet::new();
    for (tier, members) in group_indices(legs, |l| l.tier) {
        let available: Vec<usize> = members
            .into_iter()
            .filter(|i| !used.contains(i))
            .collect();
        if available.len() < MIN_LEGS {
            continue;
        }
        for size in MIN_LEGS..=available.len().min(4) {
            if let Some(combo) = best_combo(legs, &available, size, 1.0) {
                tier_used.extend(combo.iter().copied());
                parlays.push(make_parlay(legs, &combo, 1.0, ParlayKind::SameTier(tier)));
            }
        }
    }
    used.extend(tier_used);

    // Priority 3: one mixed fallback from whatever is left.
    let available: Vec<usize> = (0..legs.len()).filter(|i| !used.contains(i)).collect();
    if available.len() >= MIN_LEGS {
        if let Some(combo) = best_combo(legs, &available, MIN_LEGS, 1.0) {
            parlays.push(make_parlay(legs, &combo, 1.0, ParlayKind::Mixed));
        }
    }
}

fn group_indices<K: Ord>(legs: &[Leg], key: impl Fn(&Leg) -> K) -> BTreeMap<K, Vec<usize>> {
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, leg) in legs.iter().enumerate() {
        groups.entry(key(leg)).or_default().push(i);
    }
    groups
}

/// Highest-scoring combination of `size` members, scored by odds product
/// times the group bonus.
fn best_combo(legs: &[Leg], members: &[usize], size: usize, bonus: f64) -> Option<Vec<usize>> {
    let mut best: Option<(f64, Vec<usize>)> = None;
    for combo in combinations(members, size) {
        let product: f64 = combo.iter().map(|&i| legs[i].odds.max(1.0)).product();
        let score = product * bonus;
        if best.as_ref().map_or(true, |(b, _)| score > *b) {
            best = Some((score, combo));
        }
    }
    best.map(|(_, combo)| combo)
}

fn make_parlay(legs: &[Leg], combo: &[usize], bonus: f64, kind: ParlayKind) -> Parlay {
    let combined_odds: f64 = combo.iter().map(|&i| legs[i].odds.max(1.0)).product::<f64>() * bonus;
    let start = combo.iter().map(|&i| legs[i].at).min().expect("non-empty combo");
    let end = combo.iter().map(|&i| legs[i].at).max().expect("non-empty combo");
    let payout = PARLAY_STAKE * combined_odds;
    Parlay {
        kind,
        start,
        end,
        legs: combo.iter().map(|&i| legs[i].description.clone()).collect(),
        combined_odds,
        stake: PARLAY_STAKE,
        payout,
        profit: payout - PARLAY_STAKE,
    }
}

/// All k-element combinations of the given items, in lexicographic order.
fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    fn recurse(
        items: &[usize],
        k: usize,
        start: usize,
        current: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..items.len() {
            current.push(items[i]);
            recurse(items, k, i + 1, current, out);
            current.pop();
        }
    }
    recurse(items, k, 0, &mut current, &mut out);
    out
}
