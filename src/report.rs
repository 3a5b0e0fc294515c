use chrono::{DateTime, Utc};
use tabled::{Table, Tabled};

use crate::analytics::{self, Parlay, RoiCell};
use crate::config::Config;
use crate::model::{Game, Recommendation};
use crate::pipeline::{Snapshot, ViewContext, parse::format_report_time};

#[derive(Debug, Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Kick-off (GMT+8)")]
    kickoff: String,
    #[tabled(rename = "Fixture")]
    fixture: String,
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "Pick")]
    pick: String,
    #[tabled(rename = "EV")]
    ev: String,
    #[tabled(rename = "Conf")]
    confidence: String,
}

impl ScheduleRow {
    fn from_game(game: &Game) -> ScheduleRow {
        ScheduleRow {
            kickoff: format_report_time(game.start_time),
            fixture: format!("{} vs {}", game.home_team, game.away_team),
            line: if game.pick_even {
                "PK".to_string()
            } else {
                format!("{:+.2} / {:+.2}", game.home_line, game.away_line)
            },
            pick: if game.has_recommendation {
                game.recommendation_text.clone()
            } else {
                "-".to_string()
            },
            ev: format_ev(game.expected_value),
            confidence: game.confidence.label().to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
struct PickRow {
    #[tabled(rename = "Kick-off (GMT+8)")]
    kickoff: String,
    #[tabled(rename = "League")]
    league: String,
    #[tabled(rename = "Fixture")]
    fixture: String,
    #[tabled(rename = "Pick")]
    pick: String,
    #[tabled(rename = "Odds")]
    odds: String,
    #[tabled(rename = "EV")]
    ev: String,
    #[tabled(rename = "Conf")]
    confidence: String,
}

impl PickRow {
    fn from_recommendation(rec: &Recommendation) -> PickRow {
        PickRow {
            kickoff: format_report_time(rec.start_time),
            league: rec.league.clone(),
            fixture: format!("{} vs {}", rec.home_team, rec.away_team),
            pick: rec.pick_text.clone(),
            odds: format!("{:.3}", rec.odds),
            ev: format_ev(rec.expected_value),
            confidence: rec.confidence.label().to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
struct HeatmapRow {
    #[tabled(rename = "League")]
    league: String,
    #[tabled(rename = "Line band")]
    band: String,
    #[tabled(rename = "Bets")]
    bets: usize,
    #[tabled(rename = "Staked")]
    staked: String,
    #[tabled(rename = "P/L")]
    profit: String,
    #[tabled(rename = "ROI")]
    roi: String,
}

impl HeatmapRow {
    fn from_cell(cell: &RoiCell) -> HeatmapRow {
        HeatmapRow {
            league: cell.league.clone(),
            band: cell.band.label().to_string(),
            bets: cell.bets,
            staked: format!("{:.2}", cell.staked),
            profit: format!("{:+.2}", cell.profit),
            roi: format!("{:+.1}%", cell.roi() * 100.0),
        }
    }
}

fn format_ev(ev: Option<f64>) -> String {
    match ev {
        Some(ev) => format!("{:+.1}%", ev * 100.0),
        None => "-".to_string(),
    }
}

/// Render the configured view of the snapshot to stdout.
pub fn render(snapshot: &Snapshot, config: &Config, now: DateTime<Utc>) -> anyhow::Result<()> {
    let ctx = config.filter_context()?;
    match config.view {
        crate::config::View::Schedule => {
            let buckets = snapshot.day_buckets();
            if buckets.is_empty() {
                println!("No upcoming games.");
                return Ok(());
            }
            let selected =
                crate::pipeline::clamp_bucket_index(config.bucket, &buckets);
            let days: Vec<String> = buckets
                .iter()
                .map(|b| {
                    if b.index == selected {
                        format!("[{}]", b.date)
                    } else {
                        b.date.to_string()
                    }
                })
                .collect();
            println!("Days: {}", days.join("  "));

            let bucket_games = snapshot.games_in_bucket(selected);
            let groups = crate::pipeline::group_by_league(
                bucket_games
                    .into_iter()
                    .filter(|g| crate::pipeline::game_passes(g, &ctx, ViewContext::Schedule, now)),
            );
            if groups.is_empty() {
                println!("No games match the current filters.");
            }
            for group in groups {
                println!("\n{} (tier {})", group.league, group.tier);
                let rows: Vec<ScheduleRow> = group
                    .games
                    .iter()
                    .map(|g| ScheduleRow::from_game(g))
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
        crate::config::View::LivePicks => {
            let picks = snapshot.filter_recommendations(&ctx, ViewContext::LivePicks, now);
            if picks.is_empty() {
                println!("No live picks match the current filters.");
                return Ok(());
            }
            let rows: Vec<PickRow> = picks
                .iter()
                .map(|r| PickRow::from_recommendation(r))
                .collect();
            println!("{}", Table::new(rows));
        }
        crate::config::View::Analytics => {
            let metrics = analytics::summarize(&snapshot.stats);
            println!(
                "Settled: {}  Hit rate: {:.1}%  P/L: {:+.2}  ROI: {:+.1}%",
                metrics.settled,
                metrics.hit_rate() * 100.0,
                metrics.profit,
                metrics.roi() * 100.0
            );
            for (month, profit) in &metrics.profit_by_month {
                println!("  {month}: {profit:+.2}");
            }

            let cells = analytics::roi_heatmap(&snapshot.stats);
            if !cells.is_empty() {
                println!("\nROI heatmap");
                let rows: Vec<HeatmapRow> = cells.iter().map(HeatmapRow::from_cell).collect();
                println!("{}", Table::new(rows));

                let top =
                    analytics::top_segments(&cells, config.min_segment_bets, config.top_segments);
                if !top.is_empty() {
                    println!("\nTop segments (min {} bets)", config.min_segment_bets);
                    let rows: Vec<HeatmapRow> = top.iter().map(HeatmapRow::from_cell).collect();
                    println!("{}", Table::new(rows));
                }
            }

            let parlays = analytics::build_parlays(&snapshot.stats);
            if !parlays.is_empty() {
                println!("\nParlay wins");
                for parlay in &parlays {
                    print_parlay(parlay);
                }
            }
        }
    }
    Ok(())
}

fn print_parlay(parlay: &Parlay) {
    println!(
        "[{}] {} .. {} | {} legs @ {:.4} | stake {:.0} -> payout {:.2} (profit {:+.2})",
        parlay.kind.label(),
        format_report_time(parlay.start),
        format_report_time(parlay.end),
        parlay.legs.len(),
        parlay.combined_odds,
        parlay.stake,
        parlay.payout,
        parlay.profit
    );
    for leg in &parlay.legs {
        println!("    {leg}");
    }
}
