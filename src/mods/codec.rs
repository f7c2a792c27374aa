//! Pipe-delimited modifier encoding.
//!
//! This is the wire format for "how a score was played" and crosses the
//! client/server boundary, so token semantics are frozen: `AR<number>`
//! forces an approach rate, `x<number>` sets the custom speed multiplier,
//! and any other non-empty token is a run of legacy acronym characters.
//! Historical reports must stay decodable.

use super::{DecodedMods, Mod, ModSet};

/// Decodes a modifier string.
///
/// Tokens are processed left to right; a later token of the same category
/// overrides an earlier one. Clients emit each category at most once, but a
/// repeated or malformed token must never panic: an unparsable numeric token
/// counts as "no override provided".
pub fn decode(encoded: &str) -> DecodedMods {
    let mut mods = ModSet::new();
    let mut speed_multiplier = 1.0;
    let mut forced_ar = None;

    for token in encoded.split('|') {
        if token.is_empty() {
            continue;
        }

        if let Some(value) = token.strip_prefix("AR") {
            forced_ar = parse_decimal(value);
        } else if let Some(value) = token.strip_prefix('x') {
            speed_multiplier = parse_decimal(value).unwrap_or(1.0);
        } else {
            for c in token.chars() {
                if let Some(m) = Mod::from_acronym(c) {
                    mods.insert(m);
                }
            }
        }
    }

    DecodedMods {
        mods,
        speed_multiplier,
        forced_ar,
    }
}

/// Encodes back to the wire format. `decode(encode(m))` is semantically equal
/// to `m`; acronym order is the set's sorted order.
pub fn encode(decoded: &DecodedMods) -> String {
    let mut tokens = Vec::new();

    if !decoded.mods.is_empty() {
        tokens.push(decoded.mods.acronyms());
    }
    if decoded.speed_multiplier != 1.0 {
        tokens.push(format!("x{}", decoded.speed_multiplier));
    }
    if let Some(ar) = decoded.forced_ar {
        tokens.push(format!("AR{ar}"));
    }

    tokens.join("|")
}

/// Strict decimal parse that never lets NaN or infinities escape.
fn parse_decimal(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_acronyms_use_defaults() {
        let decoded = decode("HD");
        assert_eq!(decoded.speed_multiplier, 1.0);
        assert_eq!(decoded.forced_ar, None);
        assert!(decoded.mods.contains(Mod::Hidden));
        assert!(decoded.mods.contains(Mod::DoubleTime));
    }

    #[test]
    fn speed_and_ar_tokens() {
        let decoded = decode("HR|x1.25|AR10.3");
        assert!(decoded.mods.contains(Mod::Hidden));
        assert!(decoded.mods.contains(Mod::HardRock));
        assert_eq!(decoded.speed_multiplier, 1.25);
        assert_eq!(decoded.forced_ar, Some(10.3));
    }

    #[test]
    fn empty_string_decodes_to_nomod() {
        let decoded = decode("");
        assert!(decoded.mods.is_empty());
        assert_eq!(decoded.speed_multiplier, 1.0);
        assert_eq!(decoded.forced_ar, None);
    }

    #[test]
    fn repeated_tokens_last_write_wins() {
        let decoded = decode("x1.5|x0.75");
        assert_eq!(decoded.speed_multiplier, 0.75);

        let decoded = decode("AR9|AR10");
        assert_eq!(decoded.forced_ar, Some(10.0));
    }

    #[test]
    fn malformed_numerics_are_no_override() {
        let decoded = decode("ARxyz");
        assert_eq!(decoded.forced_ar, None);

        let decoded = decode("H|x");
        assert_eq!(decoded.speed_multiplier, 1.0);
        assert!(decoded.mods.contains(Mod::Hidden));

        // A malformed repeat clears the earlier, well-formed value: the
        // category was provided but carries no usable override.
        let decoded = decode("AR9|ARoops");
        assert_eq!(decoded.forced_ar, None);
    }

    #[test]
    fn nan_token_never_escapes() {
        let decoded = decode("xNaN|ARNaN");
        assert_eq!(decoded.speed_multiplier, 1.0);
        assert_eq!(decoded.forced_ar, None);
    }

    #[test]
    fn round_trip_is_semantically_equal() {
        let original = DecodedMods {
            mods: ModSet::from_acronyms("RHD"),
            speed_multiplier: 1.4,
            forced_ar: Some(9.5),
        };
        let decoded = decode(&encode(&original));
        assert_eq!(decoded, original);

        let nomod = DecodedMods::default();
        assert_eq!(decode(&encode(&nomod)), nomod);
    }

    #[test]
    fn unknown_characters_are_dropped() {
        let decoded = decode("HQZ");
        assert_eq!(decoded.mods.len(), 1);
        assert!(decoded.mods.contains(Mod::Hidden));
    }
}
