//! Binary configuration, loaded from an optional TOML file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the snapshot-replay binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefereeConfig {
    /// Default log filter when RUST_LOG is unset.
    pub log_filter: String,
    /// Raw `.osu` file backing the standard-ruleset calculator. Without it,
    /// pp win conditions grade as "calculation unavailable".
    pub beatmap_file: Option<PathBuf>,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            beatmap_file: None,
        }
    }
}

impl RefereeConfig {
    /// Loads the config file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str(&content).map_err(|e| e.to_string())
    }
}
