//! Fallback calculator for rooms with no attribute backend configured.

use crate::difficulty::{
    AttributeCalculator, CalcError, DifficultyAttributes, ModProfile, PerformanceAttributes,
    ScoreState,
};

/// Always-failing calculator. Grading a pp win condition through it yields
/// "calculation unavailable" entries instead of aborting the round, which is
/// exactly what a room without a backend should produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCalculator;

impl AttributeCalculator for OfflineCalculator {
    async fn difficulty(&self, _profile: &ModProfile) -> Result<DifficultyAttributes, CalcError> {
        Err(CalcError::Unavailable(
            "no attribute calculator configured".to_string(),
        ))
    }

    async fn performance(
        &self,
        _attrs: &DifficultyAttributes,
        _profile: &ModProfile,
        _state: &ScoreState,
    ) -> Result<PerformanceAttributes, CalcError> {
        Err(CalcError::Unavailable(
            "no attribute calculator configured".to_string(),
        ))
    }
}
