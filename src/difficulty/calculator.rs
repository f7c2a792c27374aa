//! Trait boundary to the external difficulty/performance calculator.

use super::{DifficultyAttributes, ModProfile, PerformanceAttributes, Ruleset, ScoreState};
use std::fmt;

/// Error type for attribute calculation failures.
#[derive(Debug, Clone)]
pub enum CalcError {
    /// The beatmap data is invalid or missing.
    InvalidBeatmap(String),
    /// The calculator failed to compute the attributes.
    CalculationFailed(String),
    /// The calculator does not serve this ruleset.
    UnsupportedRuleset(Ruleset),
    /// The calculator cannot be reached at all.
    Unavailable(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::InvalidBeatmap(msg) => write!(f, "Invalid beatmap: {}", msg),
            CalcError::CalculationFailed(msg) => write!(f, "Calculation failed: {}", msg),
            CalcError::UnsupportedRuleset(ruleset) => {
                write!(f, "Unsupported ruleset: {}", ruleset)
            }
            CalcError::Unavailable(msg) => write!(f, "Calculator unavailable: {}", msg),
        }
    }
}

impl std::error::Error for CalcError {}

/// The difficulty/performance calculator collaborator.
///
/// Both calls are potentially suspending and potentially failing; a failure
/// surfaces as an invalid grade entry, never as an aborted round. Difficulty
/// lookups should go through [`super::AttributeCache`] so players sharing a
/// modifier combination compute once.
#[allow(async_fn_in_trait)]
pub trait AttributeCalculator: Send + Sync {
    /// Difficulty attributes for the beatmap under the given profile.
    async fn difficulty(&self, profile: &ModProfile) -> Result<DifficultyAttributes, CalcError>;

    /// Performance attributes for one play: previously computed difficulty
    /// attributes plus the play's judgement breakdown.
    async fn performance(
        &self,
        attrs: &DifficultyAttributes,
        profile: &ModProfile,
        state: &ScoreState,
    ) -> Result<PerformanceAttributes, CalcError>;
}
