//! Per-room memoization of difficulty attribute lookups.

use super::{AttributeCalculator, CalcError, DifficultyAttributes, ModProfile, ModSignature};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory cache of difficulty attributes, keyed by modifier signature.
///
/// Scoped to one room instance for its lifetime; rooms never share a cache.
/// The map lock is held across the compute so that two players with the same
/// modifier combination trigger exactly one calculator call.
#[derive(Debug, Default)]
pub struct AttributeCache {
    entries: Mutex<HashMap<ModSignature, DifficultyAttributes>>,
}

impl AttributeCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached attributes for the profile's signature, computing
    /// and storing them on a miss.
    pub async fn difficulty<C: AttributeCalculator>(
        &self,
        calculator: &C,
        profile: &ModProfile,
    ) -> Result<DifficultyAttributes, CalcError> {
        let signature = profile.signature();
        let mut entries = self.entries.lock().await;

        if let Some(attrs) = entries.get(&signature) {
            log::debug!("CACHE: hit for {:?}", signature);
            return Ok(*attrs);
        }

        let attrs = calculator.difficulty(profile).await?;
        log::debug!("CACHE: computed {:?} -> {:.3} stars", signature, attrs.stars);
        entries.insert(signature, attrs);
        Ok(attrs)
    }

    /// Number of distinct signatures computed so far.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
