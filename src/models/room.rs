//! Room-held state: settings, round status, players.
//!
//! These types arrive as an immutable snapshot from the room-state
//! collaborator. The engine never mutates them; validation and grading are
//! pure functions over the snapshot so tests can build synthetic rooms.

use crate::models::score::ScoreReport;
use crate::mods::ModSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How grades are combined into a match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamMode {
    HeadToHead,
    TeamVs,
}

/// Team assignment in team-vs mode. Ignored head-to-head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Team {
    Red,
    Blue,
}

impl Default for Team {
    fn default() -> Self {
        Team::Red
    }
}

/// The room-configured rule deciding which grade a score receives and how
/// grades are ordered.
///
/// Closed on purpose: grading and sort order match on this exhaustively, so
/// a new condition fails to compile until it is handled everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinCondition {
    ScoreV1,
    Accuracy,
    MaxCombo,
    ScoreV2,
    Most300,
    Least100,
    Least50,
    LeastMisses,
    LeastUnstableRate,
    MostDroidPp,
    MostPcPp,
}

impl WinCondition {
    /// Whether a lower grade ranks better under this condition.
    pub fn lower_is_better(&self) -> bool {
        matches!(
            self,
            WinCondition::Least100
                | WinCondition::Least50
                | WinCondition::LeastMisses
                | WinCondition::LeastUnstableRate
        )
    }
}

/// Forced approach-rate policy of the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcedArPolicy {
    pub allowed: bool,
    pub min_value: f64,
    pub max_value: f64,
}

impl Default for ForcedArPolicy {
    fn default() -> Self {
        Self {
            allowed: false,
            min_value: 0.0,
            max_value: 12.5,
        }
    }
}

/// Reference beatmap the round is played on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapInfo {
    /// MD5 hash acting as identity.
    pub hash: String,
    /// Real duration at rate 1.0, in milliseconds.
    pub duration_ms: i64,
    pub id: i64,
}

/// Room settings, immutable during a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSettings {
    pub team_mode: TeamMode,
    pub win_condition: WinCondition,
    /// Weight of the score portion in the scoreV2 blend, 0..1.
    #[serde(default = "default_score_portion")]
    pub score_portion: f64,
    #[serde(default)]
    pub forced_ar: ForcedArPolicy,
    /// Custom speed multiplier every player must use.
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,
    #[serde(default)]
    pub allow_slider_lock: bool,
    /// Slider-accuracy judging mode; reports must match it exactly.
    #[serde(default)]
    pub slider_accuracy: bool,
    /// Mods every player must have active.
    #[serde(default)]
    pub required_mods: ModSet,
    /// Optional mods a player may additionally use.
    #[serde(default)]
    pub allowed_mods: ModSet,
    /// Per-mod score multiplier overrides, keyed by acronym.
    #[serde(default)]
    pub custom_mod_multipliers: HashMap<String, f64>,
    pub beatmap: BeatmapInfo,
}

fn default_score_portion() -> f64 {
    0.4
}

fn default_speed_multiplier() -> f64 {
    1.0
}

impl RoomSettings {
    /// Effective playback rate of the room itself: required-mod speed change
    /// times the room speed multiplier. Timing checks are anchored to this,
    /// never to a score's claimed speed.
    pub fn room_rate(&self) -> f64 {
        self.required_mods.speed_factor() * self.speed_multiplier
    }
}

/// Round state of the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStatus {
    pub playing: bool,
    /// Wall-clock unix timestamp (ms) the current round started being played.
    pub playing_since: i64,
}

/// A participant of the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub team: Team,
    /// Spectators are never graded.
    #[serde(default)]
    pub spectating: bool,
}

/// Everything the engine needs to settle one round: the room snapshot plus
/// the reports submitted for the current round, keyed by player id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub settings: RoomSettings,
    pub status: RoomStatus,
    pub players: Vec<Player>,
    #[serde(default)]
    pub reports: HashMap<u32, ScoreReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::ModSet;

    #[test]
    fn room_rate_uses_required_mods() {
        let settings = RoomSettings {
            team_mode: TeamMode::HeadToHead,
            win_condition: WinCondition::ScoreV1,
            score_portion: 0.4,
            forced_ar: ForcedArPolicy::default(),
            speed_multiplier: 1.2,
            allow_slider_lock: false,
            slider_accuracy: false,
            required_mods: ModSet::from_acronyms("D"),
            allowed_mods: ModSet::new(),
            custom_mod_multipliers: HashMap::new(),
            beatmap: BeatmapInfo {
                hash: "abc".into(),
                duration_ms: 120_000,
                id: 1,
            },
        };
        // DoubleTime 1.5 x custom 1.2
        assert!((settings.room_rate() - 1.8).abs() < 1e-12);
    }

    #[test]
    fn ascending_conditions() {
        assert!(WinCondition::LeastMisses.lower_is_better());
        assert!(WinCondition::Least100.lower_is_better());
        assert!(WinCondition::Least50.lower_is_better());
        assert!(WinCondition::LeastUnstableRate.lower_is_better());
        assert!(!WinCondition::ScoreV1.lower_is_better());
        assert!(!WinCondition::MostDroidPp.lower_is_better());
    }
}
