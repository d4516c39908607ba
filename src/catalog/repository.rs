//! Holds payload catalogs for several airframes and swaps reloaded ones in.
//!
//! `PayloadRepository` keeps one index per unit type so presets are always
//! resolved against the airframe that will carry them. `SharedIndex` lets a
//! reloader publish a freshly built index while readers keep using whatever
//! snapshot they already hold.

use crate::catalog::identity::UnitType;
use crate::catalog::index::LoadoutIndex;
use crate::catalog::model::LoadoutPreset;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Default)]
/// In-memory store of loadout indexes keyed by `UnitType`.
pub struct PayloadRepository {
    catalogs: BTreeMap<UnitType, Arc<LoadoutIndex>>,
}

impl PayloadRepository {
    /// Register an index, replacing any earlier one for the same unit type.
    pub fn register(&mut self, index: LoadoutIndex) -> Option<Arc<LoadoutIndex>> {
        let unit_type = index.unit_type().clone();
        info!(unit_type = %unit_type, presets = index.presets().len(), "registered payload catalog");
        self.catalogs.insert(unit_type, Arc::new(index))
    }

    /// Fetch the index for a unit type, if present.
    pub fn get(&self, unit_type: &UnitType) -> Option<&Arc<LoadoutIndex>> {
        self.catalogs.get(unit_type)
    }

    /// Resolve a preset inside a registered catalog.
    pub fn find_preset(&self, unit_type: &UnitType, name: &str) -> Option<&LoadoutPreset> {
        self.get(unit_type)?.find_by_name(name)
    }

    /// Registered unit types in stable order.
    pub fn unit_types(&self) -> impl Iterator<Item = &UnitType> {
        self.catalogs.keys()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

/// Reloadable handle to the current index.
///
/// Readers take an `Arc` snapshot and query it without holding any lock.
/// `replace` publishes a complete new index in one step, so a reader sees
/// either the old catalog or the new one, never a mix.
pub struct SharedIndex {
    current: RwLock<Arc<LoadoutIndex>>,
}

impl SharedIndex {
    pub fn new(index: LoadoutIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Current index; stays valid even if a reload happens afterwards.
    pub fn snapshot(&self) -> Arc<LoadoutIndex> {
        let guard = self.current.read().unwrap_or_else(|err| err.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a rebuilt index and hand back the one it replaced.
    pub fn replace(&self, index: LoadoutIndex) -> Arc<LoadoutIndex> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(|err| err.into_inner());
        info!(
            unit_type = %next.unit_type(),
            presets = next.presets().len(),
            "swapped in reloaded payload catalog"
        );
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::load_catalog;
    use serde_json::json;

    fn index(unit_type: &str, preset: &str) -> LoadoutIndex {
        let raw = json!({
            "unitType": unit_type,
            "payloads": [{
                "name": preset,
                "pylons": [{"CLSID": "{AIM-9X}", "num": 1}],
                "tasks": [11]
            }]
        });
        LoadoutIndex::build(load_catalog(&raw).unwrap()).unwrap()
    }

    #[test]
    fn finds_preset_in_registered_catalog() {
        let mut repo = PayloadRepository::default();
        assert!(repo.is_empty());
        repo.register(index("F-16C_50", "Liberation BARCAP"));
        repo.register(index("FA-18C_hornet", "Liberation CAS"));

        let viper = UnitType("F-16C_50".into());
        let hornet = UnitType("FA-18C_hornet".into());
        assert!(repo.find_preset(&viper, "Liberation BARCAP").is_some());
        assert!(repo.find_preset(&viper, "Liberation CAS").is_none());
        assert!(repo.find_preset(&hornet, "Liberation CAS").is_some());
        assert!(repo.get(&UnitType("A-10C".into())).is_none());

        let keys: Vec<_> = repo.unit_types().map(UnitType::as_str).collect();
        assert_eq!(keys, vec!["F-16C_50", "FA-18C_hornet"]);
    }

    #[test]
    fn register_replaces_existing_unit_type() {
        let mut repo = PayloadRepository::default();
        assert!(repo.register(index("F-16C_50", "old")).is_none());
        let previous = repo.register(index("F-16C_50", "new")).unwrap();
        assert!(previous.find_by_name("old").is_some());
        assert_eq!(repo.len(), 1);
        let viper = UnitType("F-16C_50".into());
        assert!(repo.find_preset(&viper, "new").is_some());
    }

    #[test]
    fn snapshot_survives_replace() {
        let shared = SharedIndex::new(index("F-16C_50", "before"));
        let held = shared.snapshot();
        let old = shared.replace(index("F-16C_50", "after"));

        assert!(held.find_by_name("before").is_some());
        assert!(old.find_by_name("before").is_some());
        let current = shared.snapshot();
        assert!(current.find_by_name("after").is_some());
        assert!(current.find_by_name("before").is_none());
    }
}
