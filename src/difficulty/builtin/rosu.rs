//! Standard-ruleset attribute calculator backed by rosu-pp.

use crate::difficulty::{
    AttributeCalculator, CalcError, DifficultyAttributes, ModProfile, PerformanceAttributes,
    Ruleset, ScoreState,
};

/// Attribute calculator for the standard ruleset, fed with raw `.osu` bytes.
///
/// The beatmap is parsed once at construction; every request replays the
/// profile's mods, clock rate and forced AR onto it. Droid attributes are a
/// different calculator's job and are refused here.
#[derive(Debug, Clone)]
pub struct RosuCalculator {
    map: rosu_pp::Beatmap,
    hash: String,
}

impl RosuCalculator {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CalcError> {
        let map = rosu_pp::Beatmap::from_bytes(bytes)
            .map_err(|e| CalcError::InvalidBeatmap(e.to_string()))?;
        let hash = format!("{:x}", md5::compute(bytes));
        Ok(Self { map, hash })
    }

    /// MD5 of the raw bytes, usable as the room's beatmap identity.
    pub fn beatmap_hash(&self) -> &str {
        &self.hash
    }

    fn check_ruleset(profile: &ModProfile) -> Result<(), CalcError> {
        match profile.ruleset {
            Ruleset::Standard => Ok(()),
            Ruleset::Droid => Err(CalcError::UnsupportedRuleset(Ruleset::Droid)),
        }
    }
}

impl AttributeCalculator for RosuCalculator {
    async fn difficulty(&self, profile: &ModProfile) -> Result<DifficultyAttributes, CalcError> {
        Self::check_ruleset(profile)?;

        let mut difficulty = rosu_pp::Difficulty::new()
            .mods(profile.mods.legacy_bits())
            .clock_rate(profile.clock_rate);
        if let Some(ar) = profile.forced_ar {
            difficulty = difficulty.ar(ar as f32, true);
        }

        let attrs = difficulty.calculate(&self.map);
        Ok(DifficultyAttributes {
            stars: attrs.stars(),
            max_combo: attrs.max_combo(),
        })
    }

    async fn performance(
        &self,
        _attrs: &DifficultyAttributes,
        profile: &ModProfile,
        state: &ScoreState,
    ) -> Result<PerformanceAttributes, CalcError> {
        Self::check_ruleset(profile)?;

        // rosu-pp re-derives its own difficulty attributes from the parsed
        // map; the cached ones only feed calculators that cannot.
        let mut performance = rosu_pp::Performance::new(&self.map)
            .mods(profile.mods.legacy_bits())
            .clock_rate(profile.clock_rate)
            .combo(state.max_combo)
            .misses(state.misses)
            .accuracy(state.accuracy * 100.0);
        if let Some(ar) = profile.forced_ar {
            performance = performance.ar(ar as f32, true);
        }

        let attrs = performance.calculate();
        Ok(PerformanceAttributes { total: attrs.pp() })
    }
}
