//! The grading function table: one formula per win condition.
//!
//! Every function maps a validated score to a single orderable grade. The
//! dispatch is an exhaustive match so a new win condition cannot ship
//! ungraded.

use crate::difficulty::{AttributeCache, AttributeCalculator, CalcError, ModProfile, Ruleset, ScoreState};
use crate::models::room::{RoomSettings, WinCondition};
use crate::models::score::ScoreReport;
use crate::mods::DecodedMods;

/// Tolerance when comparing grades for winner ties. Grades are rounded to at
/// most two decimals upstream, so this only has to absorb float noise.
pub const GRADE_EPSILON: f64 = 1e-6;

/// Bonus raw score granted by a non-default speed multiplier in the client.
///
/// Invertible: removing and reapplying the factor must not drift beyond
/// integer rounding.
pub fn speed_bonus_factor(speed_multiplier: f64) -> f64 {
    if speed_multiplier >= 1.0 {
        1.0 + (speed_multiplier - 1.0) * 0.24
    } else {
        0.3_f64.powf((1.0 - speed_multiplier) * 4.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the grade of a validated score under the room's win condition.
///
/// Only the pp conditions can suspend (cache miss -> calculator call) or
/// fail; every other condition is a pure local computation.
pub async fn grade<C: AttributeCalculator>(
    settings: &RoomSettings,
    report: &ScoreReport,
    decoded: &DecodedMods,
    cache: &AttributeCache,
    calculator: &C,
) -> Result<f64, CalcError> {
    let value = match settings.win_condition {
        WinCondition::ScoreV1 => score_v1(settings, report, decoded),
        WinCondition::Accuracy => report.judgements.accuracy_percent(),
        WinCondition::MaxCombo => f64::from(report.max_combo),
        WinCondition::ScoreV2 => score_v2(settings, report),
        WinCondition::Most300 => f64::from(report.judgements.perfect),
        WinCondition::Least100 => f64::from(report.judgements.good),
        WinCondition::Least50 => f64::from(report.judgements.bad),
        WinCondition::LeastMisses => f64::from(report.judgements.miss),
        WinCondition::LeastUnstableRate => round2(report.unstable_rate),
        WinCondition::MostDroidPp => {
            performance_total(Ruleset::Droid, report, decoded, cache, calculator).await?
        }
        WinCondition::MostPcPp => {
            performance_total(Ruleset::Standard, report, decoded, cache, calculator).await?
        }
    };

    Ok(value)
}

/// Raw score with the room's custom multiplier overrides applied.
///
/// The client already baked each mod's built-in multiplier into the raw
/// value, so an override rescales by `custom / built-in`.
fn score_v1(settings: &RoomSettings, report: &ScoreReport, decoded: &DecodedMods) -> f64 {
    let mut value = report.score as f64;

    for m in decoded.mods.iter() {
        if let Some(custom) = settings.custom_mod_multipliers.get(&m.acronym().to_string()) {
            let built_in = m.score_multiplier();
            if built_in > 0.0 {
                value *= custom / built_in;
            }
        }
    }

    value.round()
}

/// Normalized blend of raw score and combo-weighted squared accuracy.
///
/// The room's speed bonus is removed before blending and reapplied after,
/// keeping totals comparable across rooms with different speed multipliers.
fn score_v2(settings: &RoomSettings, report: &ScoreReport) -> f64 {
    let factor = speed_bonus_factor(settings.speed_multiplier);
    let normalized = report.score as f64 / factor;

    let accuracy = report.judgements.accuracy();
    let total = report.judgements.total();
    let combo_ratio = if total > 0 {
        (f64::from(report.max_combo) / f64::from(total)).min(1.0)
    } else {
        0.0
    };

    let portion = settings.score_portion.clamp(0.0, 1.0);
    let blended = normalized * (portion + (1.0 - portion) * accuracy * accuracy * combo_ratio);

    (blended * factor).round()
}

async fn performance_total<C: AttributeCalculator>(
    ruleset: Ruleset,
    report: &ScoreReport,
    decoded: &DecodedMods,
    cache: &AttributeCache,
    calculator: &C,
) -> Result<f64, CalcError> {
    let profile = ModProfile::from_decoded(ruleset, decoded);
    let attrs = cache.difficulty(calculator, &profile).await?;

    let state = ScoreState {
        accuracy: report.judgements.accuracy(),
        max_combo: report.max_combo,
        misses: report.judgements.miss,
    };
    let performance = calculator.performance(&attrs, &profile, &state).await?;

    Ok(round2(performance.total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{DifficultyAttributes, PerformanceAttributes};
    use crate::models::room::{BeatmapInfo, ForcedArPolicy, TeamMode};
    use crate::models::score::JudgementCounts;
    use crate::mods::codec;
    use std::collections::HashMap;

    struct StubCalculator;

    impl AttributeCalculator for StubCalculator {
        async fn difficulty(
            &self,
            profile: &ModProfile,
        ) -> Result<DifficultyAttributes, CalcError> {
            Ok(DifficultyAttributes {
                stars: 4.0 * profile.clock_rate,
                max_combo: 1000,
            })
        }

        async fn performance(
            &self,
            attrs: &DifficultyAttributes,
            _profile: &ModProfile,
            state: &ScoreState,
        ) -> Result<PerformanceAttributes, CalcError> {
            Ok(PerformanceAttributes {
                total: attrs.stars * state.accuracy * 100.0,
            })
        }
    }

    fn settings(win_condition: WinCondition) -> RoomSettings {
        RoomSettings {
            team_mode: TeamMode::HeadToHead,
            win_condition,
            score_portion: 0.4,
            forced_ar: ForcedArPolicy::default(),
            speed_multiplier: 1.0,
            allow_slider_lock: false,
            slider_accuracy: false,
            required_mods: crate::mods::ModSet::new(),
            allowed_mods: crate::mods::ModSet::new(),
            custom_mod_multipliers: HashMap::new(),
            beatmap: BeatmapInfo {
                hash: "abc".into(),
                duration_ms: 120_000,
                id: 1,
            },
        }
    }

    fn report() -> ScoreReport {
        ScoreReport {
            hash: "abc".into(),
            score: 700_000,
            max_combo: 400,
            rank: "A".into(),
            mods: String::new(),
            judgements: JudgementCounts::new(380, 15, 3, 2),
            submitted_at: 121_000,
            skipped_time_ms: 0,
            unstable_rate: 74.336,
            slider_lock: false,
            slider_accuracy: false,
        }
    }

    async fn grade_with(win_condition: WinCondition, report: &ScoreReport) -> f64 {
        let settings = settings(win_condition);
        let decoded = codec::decode(&report.mods);
        let cache = AttributeCache::new();
        grade(&settings, report, &decoded, &cache, &StubCalculator)
            .await
            .unwrap()
    }

    #[test]
    fn speed_bonus_factor_shape() {
        assert_eq!(speed_bonus_factor(1.0), 1.0);
        assert!((speed_bonus_factor(1.5) - 1.12).abs() < 1e-12);
        // Slowing down is punished exponentially.
        assert!((speed_bonus_factor(0.75) - 0.3_f64.powf(1.0)).abs() < 1e-12);
        assert!(speed_bonus_factor(0.5) < speed_bonus_factor(0.75));
    }

    #[test]
    fn speed_bonus_factor_is_invertible() {
        for multiplier in [0.5, 0.75, 1.0, 1.25, 1.5, 2.0] {
            let factor = speed_bonus_factor(multiplier);
            let raw = 734_562.0;
            let round_tripped = ((raw / factor) * factor).round();
            assert_eq!(round_tripped, raw);
        }
    }

    #[tokio::test]
    async fn hit_count_conditions_return_counts() {
        let report = report();
        assert_eq!(grade_with(WinCondition::Most300, &report).await, 380.0);
        assert_eq!(grade_with(WinCondition::Least100, &report).await, 15.0);
        assert_eq!(grade_with(WinCondition::Least50, &report).await, 3.0);
        assert_eq!(grade_with(WinCondition::LeastMisses, &report).await, 2.0);
        assert_eq!(grade_with(WinCondition::MaxCombo, &report).await, 400.0);
    }

    #[tokio::test]
    async fn unstable_rate_rounds_to_two_decimals() {
        assert_eq!(
            grade_with(WinCondition::LeastUnstableRate, &report()).await,
            74.34
        );
    }

    #[tokio::test]
    async fn accuracy_uses_the_shared_value_object() {
        let report = report();
        assert_eq!(
            grade_with(WinCondition::Accuracy, &report).await,
            report.judgements.accuracy_percent()
        );
    }

    #[tokio::test]
    async fn score_v1_without_overrides_is_raw() {
        assert_eq!(grade_with(WinCondition::ScoreV1, &report()).await, 700_000.0);
    }

    #[tokio::test]
    async fn score_v1_applies_custom_multiplier_overrides() {
        let mut settings = settings(WinCondition::ScoreV1);
        // Hidden normally grants 1.06; this room halves it instead.
        settings.custom_mod_multipliers.insert("H".into(), 0.53);
        let mut report = report();
        report.mods = "H".into();
        let decoded = codec::decode(&report.mods);
        let cache = AttributeCache::new();

        let value = grade(&settings, &report, &decoded, &cache, &StubCalculator)
            .await
            .unwrap();
        assert_eq!(value, (700_000.0_f64 * 0.53 / 1.06).round());
    }

    #[tokio::test]
    async fn score_v2_is_speed_comparable() {
        // The same underlying play in a 1.5x room, with the raw score
        // inflated by the client's speed bonus, must grade identically to
        // the 1.0x room.
        let base = report();
        let base_grade = grade_with(WinCondition::ScoreV2, &base).await;

        let mut fast_settings = settings(WinCondition::ScoreV2);
        fast_settings.speed_multiplier = 1.5;
        let mut fast = report();
        fast.score = (fast.score as f64 * speed_bonus_factor(1.5)) as u64;
        let decoded = codec::decode("x1.5");
        let cache = AttributeCache::new();
        let fast_grade = grade(&fast_settings, &fast, &decoded, &cache, &StubCalculator)
            .await
            .unwrap();

        // The inflated score earns the factor back after normalization.
        let expected = (base_grade * speed_bonus_factor(1.5)).round();
        assert!((fast_grade - expected).abs() <= 1.0);
    }

    #[tokio::test]
    async fn score_v2_portion_bounds() {
        // Portion 1.0 ignores accuracy entirely.
        let mut settings = settings(WinCondition::ScoreV2);
        settings.score_portion = 1.0;
        let report = report();
        let decoded = codec::decode("");
        let cache = AttributeCache::new();
        let value = grade(&settings, &report, &decoded, &cache, &StubCalculator)
            .await
            .unwrap();
        assert_eq!(value, 700_000.0);
    }

    #[tokio::test]
    async fn pp_conditions_round_to_two_decimals() {
        let value = grade_with(WinCondition::MostDroidPp, &report()).await;
        assert_eq!(value, (value * 100.0).round() / 100.0);
    }

    #[tokio::test]
    async fn pp_grades_are_deterministic_for_equal_signatures() {
        let settings = settings(WinCondition::MostPcPp);
        let cache = AttributeCache::new();
        let mut a = report();
        a.mods = "HD|x1.5".into();
        let mut b = report();
        b.mods = "DH|x1.5".into();

        let ga = grade(&settings, &a, &codec::decode(&a.mods), &cache, &StubCalculator)
            .await
            .unwrap();
        let gb = grade(&settings, &b, &codec::decode(&b.mods), &cache, &StubCalculator)
            .await
            .unwrap();
        assert_eq!(ga, gb);
        assert_eq!(cache.len().await, 1);
    }
}
