//! Gameplay modifier table and the compact wire encoding used by score reports.
//!
//! The droid client identifies every mod by a single-character legacy acronym.
//! A score report carries its mods as a `|`-separated string (see [`codec`]);
//! only acronyms this table recognizes survive decoding.

pub mod codec;

pub use codec::{decode, encode};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Gameplay modifiers applicable on the droid client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mod {
    NoFail,
    Easy,
    Hidden,
    HardRock,
    DoubleTime,
    NightCore,
    HalfTime,
    Flashlight,
    Precise,
    ReallyEasy,
    SmallCircle,
    SuddenDeath,
    Perfect,
    Relax,
    AutoPilot,
    ScoreV2,
}

impl Mod {
    /// Legacy single-character acronym used in the wire encoding.
    pub fn acronym(&self) -> char {
        match self {
            Mod::NoFail => 'N',
            Mod::Easy => 'E',
            Mod::Hidden => 'H',
            Mod::HardRock => 'R',
            Mod::DoubleTime => 'D',
            Mod::NightCore => 'C',
            Mod::HalfTime => 'T',
            Mod::Flashlight => 'I',
            Mod::Precise => 'S',
            Mod::ReallyEasy => 'L',
            Mod::SmallCircle => 'M',
            Mod::SuddenDeath => 'U',
            Mod::Perfect => 'F',
            Mod::Relax => 'X',
            Mod::AutoPilot => 'P',
            Mod::ScoreV2 => 'V',
        }
    }

    /// Resolves an acronym character. Unknown characters are not droid mods
    /// and must be dropped by the caller.
    pub fn from_acronym(c: char) -> Option<Mod> {
        match c.to_ascii_uppercase() {
            'N' => Some(Mod::NoFail),
            'E' => Some(Mod::Easy),
            'H' => Some(Mod::Hidden),
            'R' => Some(Mod::HardRock),
            'D' => Some(Mod::DoubleTime),
            'C' => Some(Mod::NightCore),
            'T' => Some(Mod::HalfTime),
            'I' => Some(Mod::Flashlight),
            'S' => Some(Mod::Precise),
            'L' => Some(Mod::ReallyEasy),
            'M' => Some(Mod::SmallCircle),
            'U' => Some(Mod::SuddenDeath),
            'F' => Some(Mod::Perfect),
            'X' => Some(Mod::Relax),
            'P' => Some(Mod::AutoPilot),
            'V' => Some(Mod::ScoreV2),
            _ => None,
        }
    }

    /// Built-in score multiplier applied by the client.
    pub fn score_multiplier(&self) -> f64 {
        match self {
            Mod::NoFail => 0.5,
            Mod::Easy => 0.5,
            Mod::Hidden => 1.06,
            Mod::HardRock => 1.06,
            Mod::DoubleTime => 1.12,
            Mod::NightCore => 1.12,
            Mod::HalfTime => 0.3,
            Mod::Flashlight => 1.12,
            Mod::Precise => 1.06,
            Mod::ReallyEasy => 0.4,
            Mod::SmallCircle => 1.06,
            Mod::SuddenDeath => 1.0,
            Mod::Perfect => 1.0,
            Mod::Relax => 0.001,
            Mod::AutoPilot => 0.001,
            Mod::ScoreV2 => 1.0,
        }
    }

    /// Playback rate change inherent to the mod (1.0 for non-speed mods).
    pub fn speed_factor(&self) -> f64 {
        match self {
            Mod::DoubleTime | Mod::NightCore => 1.5,
            Mod::HalfTime => 0.75,
            _ => 1.0,
        }
    }

    /// Legacy osu! bitmask value, for calculators that speak the standard
    /// ruleset. Droid-only mods map to 0.
    pub fn legacy_bits(&self) -> u32 {
        match self {
            Mod::NoFail => 1,
            Mod::Easy => 2,
            Mod::Hidden => 8,
            Mod::HardRock => 16,
            Mod::SuddenDeath => 32,
            Mod::DoubleTime => 64,
            Mod::Relax => 128,
            Mod::HalfTime => 256,
            // NightCore always implies DoubleTime in the legacy mask.
            Mod::NightCore => 512 | 64,
            Mod::Flashlight => 1024,
            Mod::AutoPilot => 8192,
            Mod::Perfect => 16384 | 32,
            Mod::Precise | Mod::ReallyEasy | Mod::SmallCircle | Mod::ScoreV2 => 0,
        }
    }
}

/// An ordered set of active mods.
///
/// Serializes as its acronym string (`"HD"`) so snapshots stay close to the
/// wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModSet {
    mods: BTreeSet<Mod>,
}

impl ModSet {
    pub fn new() -> Self {
        Self {
            mods: BTreeSet::new(),
        }
    }

    /// Builds a set from a run of acronym characters, dropping anything the
    /// droid client does not know.
    pub fn from_acronyms(acronyms: &str) -> Self {
        let mut set = Self::new();
        for c in acronyms.chars() {
            if let Some(m) = Mod::from_acronym(c) {
                set.insert(m);
            }
        }
        set
    }

    pub fn insert(&mut self, m: Mod) {
        self.mods.insert(m);
    }

    pub fn contains(&self, m: Mod) -> bool {
        self.mods.contains(&m)
    }

    pub fn iter(&self) -> impl Iterator<Item = Mod> + '_ {
        self.mods.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Combined playback rate change of all mods in the set.
    pub fn speed_factor(&self) -> f64 {
        self.iter().map(|m| m.speed_factor()).product()
    }

    /// Combined legacy bitmask of the set.
    pub fn legacy_bits(&self) -> u32 {
        self.iter().map(|m| m.legacy_bits()).fold(0, |acc, b| acc | b)
    }

    /// Acronym characters in sorted order. Deterministic for a given set, so
    /// it can participate in cache keys.
    pub fn acronyms(&self) -> String {
        let mut chars: Vec<char> = self.iter().map(|m| m.acronym()).collect();
        chars.sort_unstable();
        chars.into_iter().collect()
    }
}

impl FromIterator<Mod> for ModSet {
    fn from_iter<I: IntoIterator<Item = Mod>>(iter: I) -> Self {
        Self {
            mods: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ModSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.acronyms())
        }
    }
}

impl Serialize for ModSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.acronyms())
    }
}

impl<'de> Deserialize<'de> for ModSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        for c in s.chars() {
            if Mod::from_acronym(c).is_none() {
                return Err(D::Error::custom(format!("unknown mod acronym: {c}")));
            }
        }
        Ok(ModSet::from_acronyms(&s))
    }
}

/// Structured form of a score report's modifier string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMods {
    pub mods: ModSet,
    /// Custom speed multiplier on top of the mods' own rate change.
    pub speed_multiplier: f64,
    /// Forced approach rate, when the client overrode it.
    pub forced_ar: Option<f64>,
}

impl Default for DecodedMods {
    fn default() -> Self {
        Self {
            mods: ModSet::new(),
            speed_multiplier: 1.0,
            forced_ar: None,
        }
    }
}

impl DecodedMods {
    /// Effective playback rate: mod speed change times the custom multiplier.
    pub fn play_rate(&self) -> f64 {
        self.mods.speed_factor() * self.speed_multiplier
    }
}
