//! Client-reported score data and the shared judgement value object.

use serde::{Deserialize, Serialize};

/// Four-tier judgement counts of a finished play.
///
/// Accuracy weighting follows the standard 300/100/50 values; misses weigh
/// zero but still count toward the judgement total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementCounts {
    pub perfect: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl JudgementCounts {
    pub fn new(perfect: u32, good: u32, bad: u32, miss: u32) -> Self {
        Self {
            perfect,
            good,
            bad,
            miss,
        }
    }

    /// Total judgements, i.e. the maximum number of judgeable objects the
    /// play produced.
    pub fn total(&self) -> u32 {
        self.perfect + self.good + self.bad + self.miss
    }

    /// Accuracy in `0.0..=1.0`.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let value = f64::from(self.perfect) * 300.0
            + f64::from(self.good) * 100.0
            + f64::from(self.bad) * 50.0;

        value / (f64::from(total) * 300.0)
    }

    /// Accuracy as a percentage, rounded to two decimals.
    pub fn accuracy_percent(&self) -> f64 {
        (self.accuracy() * 10_000.0).round() / 100.0
    }
}

/// A score reported by a client for the current round.
///
/// Ephemeral: one per player per round, discarded once the outcome is
/// computed. Everything in here is untrusted until it passes validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Beatmap hash the client claims to have played.
    pub hash: String,
    pub score: u64,
    pub max_combo: u32,
    /// Letter rank as rendered by the client (display only).
    pub rank: String,
    /// Encoded modifier string, see [`crate::mods::codec`].
    pub mods: String,
    pub judgements: JudgementCounts,
    /// Unix timestamp (ms) the score was submitted.
    pub submitted_at: i64,
    /// Time the player fast-forwarded through (skip intro etc.), in ms.
    #[serde(default)]
    pub skipped_time_ms: i64,
    /// Timing-deviation statistic; lower is better.
    #[serde(default)]
    pub unstable_rate: f64,
    #[serde(default)]
    pub slider_lock: bool,
    #[serde(default)]
    pub slider_accuracy: bool,
}
