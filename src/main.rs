//! Snapshot-replay entry point.
//!
//! Reads a recorded round snapshot from JSON, settles the round and prints
//! the outcome. Useful for auditing: the engine is deterministic, so
//! replaying a snapshot reproduces the exact outcome the room produced.

use droid_referee::config::RefereeConfig;
use droid_referee::difficulty::{AttributeCache, AttributeCalculator, OfflineCalculator, RosuCalculator};
use droid_referee::logic::compute_outcome;
use droid_referee::models::RoundSnapshot;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next() else {
        eprintln!("usage: droid-referee <snapshot.json> [config.toml]");
        return ExitCode::FAILURE;
    };
    let config_path = args.next().unwrap_or_else(|| "referee.toml".to_string());

    let config = match RefereeConfig::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", &config.log_filter);
        }
    }
    env_logger::init();

    log::info!("MAIN: replaying round snapshot {snapshot_path}");

    let snapshot: RoundSnapshot = match std::fs::read_to_string(&snapshot_path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("MAIN: failed to load snapshot: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &config.beatmap_file {
        Some(path) => {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::error!("MAIN: failed to read beatmap {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            };
            match RosuCalculator::from_bytes(&bytes) {
                Ok(calculator) => {
                    if calculator.beatmap_hash() != snapshot.settings.beatmap.hash {
                        log::warn!(
                            "MAIN: configured beatmap hash {} does not match the room's {}",
                            calculator.beatmap_hash(),
                            snapshot.settings.beatmap.hash
                        );
                    }
                    settle(&snapshot, &calculator).await
                }
                Err(e) => {
                    log::error!("MAIN: failed to parse beatmap: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        None => settle(&snapshot, &OfflineCalculator).await,
    }
}

async fn settle<C: AttributeCalculator>(snapshot: &RoundSnapshot, calculator: &C) -> ExitCode {
    let cache = AttributeCache::new();
    let outcome = compute_outcome(snapshot, &cache, calculator).await;

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("MAIN: failed to serialize outcome: {e}");
            ExitCode::FAILURE
        }
    }
}
