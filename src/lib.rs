//! Score verification and grading engine for multiplayer osu!droid rooms.
//!
//! When a match round ends, every client reports a score. This crate decides
//! whether each report is a legitimate result for the round that was actually
//! played, grades it under the room's win condition and combines the grades
//! into a [`models::MatchOutcome`]. The whole computation is a pure pass over
//! an immutable [`models::RoundSnapshot`], so outcomes are deterministic and
//! replayable.
//!
//! Difficulty/performance attributes come from an external
//! [`difficulty::AttributeCalculator`], memoized per room by
//! [`difficulty::AttributeCache`].

pub mod config;
pub mod difficulty;
pub mod logic;
pub mod models;
pub mod mods;

pub use difficulty::{AttributeCache, AttributeCalculator, CalcError};
pub use logic::compute_outcome;
pub use models::{MatchOutcome, RoundSnapshot};
