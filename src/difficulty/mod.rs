//! Difficulty and performance attribute plumbing.
//!
//! The engine never computes attributes itself: it asks an
//! [`AttributeCalculator`] through the per-room [`AttributeCache`]. The cache
//! is keyed by an explicit signature type so semantically different modifier
//! combinations can never collide on a string representation.

pub mod builtin;
pub mod cache;
pub mod calculator;

pub use builtin::{OfflineCalculator, RosuCalculator};
pub use cache::AttributeCache;
pub use calculator::{AttributeCalculator, CalcError};

use crate::mods::{DecodedMods, ModSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Which ruleset's attributes are being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ruleset {
    Droid,
    Standard,
}

impl std::fmt::Display for Ruleset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ruleset::Droid => write!(f, "droid"),
            Ruleset::Standard => write!(f, "standard"),
        }
    }
}

/// Difficulty-adjustment profile of one play: the exact modifier combination
/// a calculator needs to reproduce it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModProfile {
    pub ruleset: Ruleset,
    pub mods: ModSet,
    /// Effective playback rate (mod speed change x custom multiplier).
    pub clock_rate: f64,
    pub forced_ar: Option<f64>,
}

impl ModProfile {
    pub fn from_decoded(ruleset: Ruleset, decoded: &DecodedMods) -> Self {
        Self {
            ruleset,
            mods: decoded.mods.clone(),
            clock_rate: decoded.play_rate(),
            forced_ar: decoded.forced_ar,
        }
    }

    /// Cache key for this profile.
    pub fn signature(&self) -> ModSignature {
        ModSignature {
            ruleset: self.ruleset,
            acronyms: self.mods.acronyms(),
            clock_rate: OrderedFloat(self.clock_rate),
            forced_ar: self.forced_ar.map(OrderedFloat),
        }
    }
}

/// Explicit attribute-cache key: sorted acronyms plus the numeric overrides,
/// hashable thanks to `OrderedFloat`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModSignature {
    ruleset: Ruleset,
    acronyms: String,
    clock_rate: OrderedFloat<f64>,
    forced_ar: Option<OrderedFloat<f64>>,
}

/// Difficulty attributes of a beatmap under a specific profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAttributes {
    pub stars: f64,
    pub max_combo: u32,
}

/// The judgement breakdown a performance request is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreState {
    /// Accuracy in `0.0..=1.0`.
    pub accuracy: f64,
    pub max_combo: u32,
    pub misses: u32,
}

/// Performance attributes of one play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAttributes {
    /// Total performance value; the grade for pp win conditions.
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::codec;

    #[test]
    fn signatures_distinguish_numeric_overrides() {
        let a = ModProfile::from_decoded(Ruleset::Droid, &codec::decode("HD|x1.5"));
        let b = ModProfile::from_decoded(Ruleset::Droid, &codec::decode("HD|x1.25"));
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn signatures_distinguish_rulesets() {
        let decoded = codec::decode("HD");
        let droid = ModProfile::from_decoded(Ruleset::Droid, &decoded);
        let standard = ModProfile::from_decoded(Ruleset::Standard, &decoded);
        assert_ne!(droid.signature(), standard.signature());
    }

    #[test]
    fn signature_ignores_acronym_order() {
        let a = ModProfile::from_decoded(Ruleset::Standard, &codec::decode("HD"));
        let b = ModProfile::from_decoded(Ruleset::Standard, &codec::decode("DH"));
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn profile_rate_includes_mod_speed() {
        let profile = ModProfile::from_decoded(Ruleset::Droid, &codec::decode("D|x1.2"));
        assert!((profile.clock_rate - 1.8).abs() < 1e-12);
    }
}
