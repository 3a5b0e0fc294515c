use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{DayBucket, Game};

use super::parse::report_offset;

/// Calendar date of an instant in the fixed GMT+8 reporting frame. Day
/// membership is defined by wall-clock date components, not absolute-instant
/// arithmetic.
pub fn report_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&report_offset()).date_naive()
}

/// Derive the ordered, deduplicated day buckets for the current game
/// collection. Only days that actually contain at least one game produce a
/// bucket; an empty game collection yields an empty list, which is a valid
/// terminal state ("no upcoming games"), not an error.
///
/// Recomputed from the live collection on each request — never cached
/// across refreshes.
pub fn day_buckets(games: &[Game]) -> Vec<DayBucket> {
    let mut dates: Vec<NaiveDate> = games.iter().map(|g| report_date(g.start_time)).collect();
    dates.sort();
    dates.dedup();
    dates
        .into_iter()
        .enumerate()
        .map(|(index, date)| DayBucket { index, date })
        .collect()
}

/// Games whose GMT+8 calendar date matches the bucket's date.
pub fn games_in_bucket<'a>(games: &'a [Game], bucket: &DayBucket) -> Vec<&'a Game> {
    games
        .iter()
        .filter(|g| report_date(g.start_time) == bucket.date)
        .collect()
}

/// A previously selected bucket index that falls outside the freshly
/// recomputed list snaps back to the first bucket.
pub fn clamp_bucket_index(selected: usize, buckets: &[DayBucket]) -> usize {
    if selected < buckets.len() {
        selected
    } else {
        0
    }
}
