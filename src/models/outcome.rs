//! Derived per-round results: grade entries and the match outcome.
//!
//! Everything here is recomputed fresh on every request; recomputing from
//! the same snapshot yields the same outcome.

use crate::models::room::Team;
use crate::mods::ModSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a reported score was not graded.
///
/// A reason is never fatal: the entry stays in the result list, it just does
/// not rank or contribute to team totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RejectReason {
    WrongBeatmap,
    SliderLockForbidden,
    SliderAccuracyMismatch,
    SubmittedTooLate { excess_secs: f64 },
    SubmittedTooEarly { deficit_secs: f64 },
    RequiredModsMissing { mods: ModSet },
    RestrictedMods { mods: ModSet },
    SpeedMultiplierMismatch { reported: f64, expected: f64 },
    ForcedArForbidden,
    ForcedArOutOfRange { value: f64, min: f64, max: f64 },
    ScoreNotFound,
    CalculationUnavailable,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::WrongBeatmap => write!(f, "score was set on the wrong beatmap"),
            RejectReason::SliderLockForbidden => {
                write!(f, "slider lock is not allowed in this room")
            }
            RejectReason::SliderAccuracyMismatch => {
                write!(f, "slider accuracy setting does not match the room")
            }
            RejectReason::SubmittedTooLate { excess_secs } => {
                write!(f, "submitted too late ({excess_secs:.1} s past the window)")
            }
            RejectReason::SubmittedTooEarly { deficit_secs } => {
                write!(
                    f,
                    "submitted too early ({deficit_secs:.1} s before the window)"
                )
            }
            RejectReason::RequiredModsMissing { mods } => {
                write!(f, "required mods missing: {mods}")
            }
            RejectReason::RestrictedMods { mods } => write!(f, "restricted mods used: {mods}"),
            RejectReason::SpeedMultiplierMismatch { reported, expected } => {
                write!(
                    f,
                    "speed multiplier {reported} does not match the room's {expected}"
                )
            }
            RejectReason::ForcedArForbidden => {
                write!(f, "forced AR is not allowed in this room")
            }
            RejectReason::ForcedArOutOfRange { value, min, max } => {
                write!(f, "forced AR {value} is outside the allowed {min}..{max}")
            }
            RejectReason::ScoreNotFound => write!(f, "score not found"),
            RejectReason::CalculationUnavailable => write!(f, "calculation unavailable"),
        }
    }
}

/// One player's graded (or rejected) score for the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub player_id: u32,
    pub username: String,
    pub grade: f64,
    /// Present on invalid entries; they are listed but never ranked.
    pub reason: Option<RejectReason>,
}

impl GradeEntry {
    pub fn valid(player_id: u32, username: impl Into<String>, grade: f64) -> Self {
        Self {
            player_id,
            username: username.into(),
            grade,
            reason: None,
        }
    }

    pub fn invalid(player_id: u32, username: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            player_id,
            username: username.into(),
            grade: 0.0,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.reason.is_none()
    }
}

/// One team's side of a team-vs outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    /// Members sorted by the win condition's order, invalid entries last.
    pub entries: Vec<GradeEntry>,
    /// Sum of valid grades; invalid entries contribute zero.
    pub total: f64,
}

/// Final result of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum MatchOutcome {
    HeadToHead {
        /// All entries sorted by the win condition's order.
        entries: Vec<GradeEntry>,
        /// Player ids whose grade is indistinguishable from the best. More
        /// than one means a tie.
        winners: Vec<u32>,
        /// True when every valid entry is a winner.
        draw: bool,
    },
    TeamVs {
        red: TeamStanding,
        blue: TeamStanding,
        /// None on an exact draw.
        winner: Option<Team>,
        /// Non-negative magnitude of the total difference, regardless of
        /// whether the win condition is ascending or descending.
        margin: f64,
    },
}
