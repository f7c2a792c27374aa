//! Score validation against the room snapshot.
//!
//! A reported score is untrusted: the checks below reconcile it with the
//! server-held settings and round status. The function is pure; identical
//! inputs always produce the identical verdict.

use crate::models::outcome::RejectReason;
use crate::models::room::{RoomSettings, RoomStatus};
use crate::models::score::ScoreReport;
use crate::mods::{DecodedMods, ModSet};

/// How far past the expected finish a submission may arrive (network delay
/// is legitimate).
const LATE_TOLERANCE_MS: f64 = 30_000.0;

/// How far before the expected finish a submission may arrive. Meaningfully
/// early means a truncated or fabricated play, hence the asymmetry.
const EARLY_TOLERANCE_MS: f64 = 10_000.0;

/// Decides whether a reported score is a legitimate result for the round.
///
/// Checks run in a fixed order and the first failing one wins.
pub fn validate(
    settings: &RoomSettings,
    status: &RoomStatus,
    report: &ScoreReport,
    decoded: &DecodedMods,
) -> Result<(), RejectReason> {
    // 1. Beatmap identity.
    if report.hash != settings.beatmap.hash {
        return Err(RejectReason::WrongBeatmap);
    }

    // 2/3. Slider toggles. Lock is an allowance, accuracy must match exactly.
    if report.slider_lock && !settings.allow_slider_lock {
        return Err(RejectReason::SliderLockForbidden);
    }
    if report.slider_accuracy != settings.slider_accuracy {
        return Err(RejectReason::SliderAccuracyMismatch);
    }

    // 4. Timing window, anchored to the room's own rate so a spoofed speed
    // multiplier cannot stretch the time budget.
    let room_rate = settings.room_rate();
    let expected_finish =
        status.playing_since as f64 + settings.beatmap.duration_ms as f64 / room_rate;
    let actual_submission = report.submitted_at as f64 + report.skipped_time_ms as f64 / room_rate;
    let diff = actual_submission - expected_finish;

    if diff > LATE_TOLERANCE_MS {
        return Err(RejectReason::SubmittedTooLate {
            excess_secs: (diff - LATE_TOLERANCE_MS) / 1000.0,
        });
    }
    if diff < -EARLY_TOLERANCE_MS {
        return Err(RejectReason::SubmittedTooEarly {
            deficit_secs: (-diff - EARLY_TOLERANCE_MS) / 1000.0,
        });
    }

    // 5. Required mods that the play did not carry.
    let missing: ModSet = settings
        .required_mods
        .iter()
        .filter(|m| !decoded.mods.contains(*m))
        .collect();

    // 6. Mods outside required + allowed. A restricted mod outranks a
    // missing required one when both apply.
    let incorrect: ModSet = decoded
        .mods
        .iter()
        .filter(|m| !settings.required_mods.contains(*m) && !settings.allowed_mods.contains(*m))
        .collect();

    if !incorrect.is_empty() {
        return Err(RejectReason::RestrictedMods { mods: incorrect });
    }
    if !missing.is_empty() {
        return Err(RejectReason::RequiredModsMissing { mods: missing });
    }

    // 7. Custom speed multiplier must match the room exactly.
    if decoded.speed_multiplier != settings.speed_multiplier {
        return Err(RejectReason::SpeedMultiplierMismatch {
            reported: decoded.speed_multiplier,
            expected: settings.speed_multiplier,
        });
    }

    // 8. Forced AR policy.
    if let Some(ar) = decoded.forced_ar {
        if !settings.forced_ar.allowed {
            return Err(RejectReason::ForcedArForbidden);
        }
        if ar < settings.forced_ar.min_value || ar > settings.forced_ar.max_value {
            return Err(RejectReason::ForcedArOutOfRange {
                value: ar,
                min: settings.forced_ar.min_value,
                max: settings.forced_ar.max_value,
            });
        }
    }

    Ok(())
}
