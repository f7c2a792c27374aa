//! Round outcome aggregation.
//!
//! A single pass over the player list: collecting -> validating -> grading
//! -> ranking -> finalized. The pass never fails as a whole; every problem
//! surfaces as an invalid entry and the remaining players still get ranked.

use crate::difficulty::{AttributeCache, AttributeCalculator};
use crate::logic::grading::{self, GRADE_EPSILON};
use crate::logic::validator;
use crate::models::outcome::{GradeEntry, MatchOutcome, RejectReason, TeamStanding};
use crate::models::room::{RoundSnapshot, Team, TeamMode, WinCondition};
use crate::mods::codec;
use std::cmp::Ordering;

/// Computes the final outcome of a round from an immutable snapshot.
///
/// Re-running with the same snapshot and calculator yields the same outcome;
/// there is no resume, a re-request recomputes from scratch.
pub async fn compute_outcome<C: AttributeCalculator>(
    snapshot: &RoundSnapshot,
    cache: &AttributeCache,
    calculator: &C,
) -> MatchOutcome {
    let settings = &snapshot.settings;
    log::debug!(
        "AGGREGATOR: collecting {} players, win condition {:?}",
        snapshot.players.len(),
        settings.win_condition
    );

    let mut graded: Vec<(Team, GradeEntry)> = Vec::new();

    for player in snapshot.players.iter().filter(|p| !p.spectating) {
        let entry = match snapshot.reports.get(&player.id) {
            None => {
                log::debug!("AGGREGATOR: no score submitted by {}", player.username);
                GradeEntry::invalid(player.id, &player.username, RejectReason::ScoreNotFound)
            }
            Some(report) => {
                let decoded = codec::decode(&report.mods);
                match validator::validate(settings, &snapshot.status, report, &decoded) {
                    Err(reason) => {
                        log::warn!("AGGREGATOR: rejected {}: {}", player.username, reason);
                        GradeEntry::invalid(player.id, &player.username, reason)
                    }
                    Ok(()) => {
                        match grading::grade(settings, report, &decoded, cache, calculator).await {
                            Ok(value) => GradeEntry::valid(player.id, &player.username, value),
                            Err(e) => {
                                log::warn!(
                                    "AGGREGATOR: grading {} failed: {}",
                                    player.username,
                                    e
                                );
                                GradeEntry::invalid(
                                    player.id,
                                    &player.username,
                                    RejectReason::CalculationUnavailable,
                                )
                            }
                        }
                    }
                }
            }
        };
        graded.push((player.team, entry));
    }

    log::debug!("AGGREGATOR: ranking {} entries", graded.len());
    let ascending = settings.win_condition.lower_is_better();

    match settings.team_mode {
        TeamMode::HeadToHead => finalize_head_to_head(graded, ascending),
        TeamMode::TeamVs => finalize_team_vs(graded, ascending, settings.win_condition),
    }
}

/// Sorts entries by grade in the win condition's order; invalid entries sink
/// to the end regardless of their (zero) grade.
fn sort_entries(entries: &mut [GradeEntry], ascending: bool) {
    entries.sort_by(|a, b| match (a.is_valid(), b.is_valid()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
        (true, true) => {
            let ord = a.grade.partial_cmp(&b.grade).unwrap_or(Ordering::Equal);
            if ascending { ord } else { ord.reverse() }
        }
    });
}

fn finalize_head_to_head(graded: Vec<(Team, GradeEntry)>, ascending: bool) -> MatchOutcome {
    let mut entries: Vec<GradeEntry> = graded.into_iter().map(|(_, e)| e).collect();
    sort_entries(&mut entries, ascending);

    // After sorting, the first valid entry holds the best grade. Everyone
    // within tolerance of it is a winner; all-winners is a draw.
    let best = entries.iter().find(|e| e.is_valid()).map(|e| e.grade);
    let winners: Vec<u32> = match best {
        None => Vec::new(),
        Some(best) => entries
            .iter()
            .filter(|e| e.is_valid() && (e.grade - best).abs() <= GRADE_EPSILON)
            .map(|e| e.player_id)
            .collect(),
    };

    let valid_count = entries.iter().filter(|e| e.is_valid()).count();
    let draw = valid_count > 0 && winners.len() == valid_count;

    log::debug!(
        "AGGREGATOR: finalized head-to-head, {} winners, draw: {}",
        winners.len(),
        draw
    );
    MatchOutcome::HeadToHead {
        entries,
        winners,
        draw,
    }
}

fn finalize_team_vs(
    graded: Vec<(Team, GradeEntry)>,
    ascending: bool,
    win_condition: WinCondition,
) -> MatchOutcome {
    let mut red_entries = Vec::new();
    let mut blue_entries = Vec::new();
    for (team, entry) in graded {
        match team {
            Team::Red => red_entries.push(entry),
            Team::Blue => blue_entries.push(entry),
        }
    }
    sort_entries(&mut red_entries, ascending);
    sort_entries(&mut blue_entries, ascending);

    let total = |entries: &[GradeEntry]| -> f64 {
        entries
            .iter()
            .filter(|e| e.is_valid())
            .map(|e| e.grade)
            .sum()
    };
    let red_total = total(&red_entries);
    let blue_total = total(&blue_entries);

    // The margin is always a magnitude; which side wins is a separate,
    // explicit field so ascending conditions cannot flip its sign.
    let margin = (red_total - blue_total).abs();
    let winner = if red_total == blue_total {
        None
    } else {
        let red_wins = if ascending {
            red_total < blue_total
        } else {
            red_total > blue_total
        };
        Some(if red_wins { Team::Red } else { Team::Blue })
    };

    log::debug!(
        "AGGREGATOR: finalized team-vs under {:?}: red {} vs blue {}, margin {}",
        win_condition,
        red_total,
        blue_total,
        margin
    );
    MatchOutcome::TeamVs {
        red: TeamStanding {
            entries: red_entries,
            total: red_total,
        },
        blue: TeamStanding {
            entries: blue_entries,
            total: blue_total,
        },
        winner,
        margin,
    }
}
