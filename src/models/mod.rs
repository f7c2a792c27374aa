//! Data model: room snapshot types, score reports, derived results.

pub mod outcome;
pub mod room;
pub mod score;

pub use outcome::{GradeEntry, MatchOutcome, RejectReason, TeamStanding};
pub use room::{
    BeatmapInfo, ForcedArPolicy, Player, RoomSettings, RoomStatus, RoundSnapshot, Team, TeamMode,
    WinCondition,
};
pub use score::{JudgementCounts, ScoreReport};
