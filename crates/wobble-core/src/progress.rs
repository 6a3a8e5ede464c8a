//! Which formulas the learner has opened or unlocked, plus their display
//! settings. Stored as one JSON document behind [`KeyValueStore`].

use std::collections::BTreeSet;

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::background::BackgroundParams;
use crate::error::StoreError;
use crate::formula::FormulaId;

pub const PROGRESS_KEY: &str = "wobble.progress.v1";

/// Always available without unlocking.
pub const FREE_FORMULAS: [FormulaId; 3] = [
    FormulaId::NewtonSecondLaw,
    FormulaId::ProjectileRange,
    FormulaId::OhmsLaw,
];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: FnvHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub start_paused: bool,
    pub reduced_motion: bool,
    pub background: BackgroundParams,
}

impl Settings {
    /// Background parameters with reduced motion applied.
    pub fn effective_background(&self) -> BackgroundParams {
        let params = self.background.sanitized();
        if self.reduced_motion {
            params.calmed()
        } else {
            params
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub seen: BTreeSet<String>,
    pub unlocked: BTreeSet<String>,
    pub settings: Settings,
}

impl Progress {
    /// Read progress from `store`. Missing, unreadable or corrupt data gives
    /// a fresh default.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let raw = match store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                log::warn!("[store] {}", e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Progress>(&raw) {
            Ok(mut progress) => {
                progress.settings.background = progress.settings.background.sanitized();
                progress
            }
            Err(e) => {
                log::warn!("[store] discarding corrupt progress: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(PROGRESS_KEY, &json)
    }

    /// Forget everything, including settings.
    pub fn clear(store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        store.remove(PROGRESS_KEY)
    }

    /// Record a visit. Opening a formula unlocks the next one in catalogue
    /// order. Returns whether anything changed.
    pub fn mark_seen(&mut self, id: FormulaId) -> bool {
        let mut changed = self.seen.insert(id.slug().to_string());
        if let Some(pos) = FormulaId::ALL.iter().position(|f| *f == id) {
            if let Some(next) = FormulaId::ALL.get(pos + 1) {
                changed |= self.unlock(*next);
            }
        }
        changed
    }

    pub fn unlock(&mut self, id: FormulaId) -> bool {
        if FREE_FORMULAS.contains(&id) {
            return false;
        }
        self.unlocked.insert(id.slug().to_string())
    }

    pub fn is_unlocked(&self, id: FormulaId) -> bool {
        FREE_FORMULAS.contains(&id) || self.unlocked.contains(id.slug())
    }

    pub fn has_seen(&self, id: FormulaId) -> bool {
        self.seen.contains(id.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_formulas_are_always_unlocked() {
        let p = Progress::default();
        for id in FREE_FORMULAS {
            assert!(p.is_unlocked(id));
        }
        assert!(!p.is_unlocked(FormulaId::MassEnergy));
    }

    #[test]
    fn seeing_a_formula_unlocks_the_next() {
        let mut p = Progress::default();
        assert!(p.mark_seen(FormulaId::ProjectileRange));
        assert!(p.has_seen(FormulaId::ProjectileRange));
        assert!(p.is_unlocked(FormulaId::WaveSpeed));
        assert!(!p.mark_seen(FormulaId::ProjectileRange));
    }

    #[test]
    fn last_formula_unlocks_nothing_further() {
        let mut p = Progress::default();
        p.mark_seen(FormulaId::MassEnergy);
        assert!(p.unlocked.is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let mut p = Progress::default();
        p.mark_seen(FormulaId::HookesLaw);
        p.settings.reduced_motion = true;
        p.save(&mut store).unwrap();
        assert_eq!(Progress::load(&store), p);
    }

    #[test]
    fn corrupt_json_loads_as_default() {
        let mut store = MemoryStore::new();
        store.set(PROGRESS_KEY, "{not json").unwrap();
        assert_eq!(Progress::load(&store), Progress::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"seen":["ohms-law"],"settings":{"background":{"contrast":50}}}"#)
            .unwrap();
        let p = Progress::load(&store);
        assert!(p.has_seen(FormulaId::OhmsLaw));
        assert_eq!(p.settings.background.contrast, 3.0);
        assert_eq!(p.settings.background.warp, BackgroundParams::default().warp);
    }

    #[test]
    fn reduced_motion_calms_background() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let bg = settings.effective_background();
        assert_eq!(bg.ripple, 0.0);
        assert!(bg.flow_speed < BackgroundParams::default().flow_speed);
    }
}
