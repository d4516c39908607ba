//! Indexed, read-only view of a validated payload catalog.
//!
//! The index refuses catalogs that fail validation, so every lookup runs over
//! data whose invariants already hold. It owns its catalog and never changes
//! after construction; share it across threads behind an `Arc` (see
//! `SharedIndex` for swapping in a reloaded catalog).

use crate::catalog::identity::{StoreId, TaskTag, UnitType};
use crate::catalog::loader::load_catalog_from_path;
use crate::catalog::model::{LoadoutPreset, UnitPayloadSet};
use crate::error::{QueryError, ValidationErrors};
use crate::validation::validate_catalog;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
/// Payload catalog plus derived lookups by preset name and task tag.
pub struct LoadoutIndex {
    catalog: UnitPayloadSet,
    by_name: BTreeMap<String, usize>,
    by_task: BTreeMap<TaskTag, Vec<usize>>,
}

impl LoadoutIndex {
    /// Validate the catalog and build the lookup tables.
    pub fn build(catalog: UnitPayloadSet) -> Result<Self, ValidationErrors> {
        validate_catalog(&catalog)?;

        let mut by_name = BTreeMap::new();
        let mut by_task: BTreeMap<TaskTag, Vec<usize>> = BTreeMap::new();
        for (position, preset) in catalog.payloads.iter().enumerate() {
            by_name.insert(preset.name.clone(), position);
            let tags: BTreeSet<TaskTag> =
                catalog.effective_tasks(preset).iter().copied().collect();
            for tag in tags {
                by_task.entry(tag).or_default().push(position);
            }
        }

        debug!(
            unit_type = %catalog.unit_type,
            presets = catalog.payloads.len(),
            tasks = by_task.len(),
            "built loadout index"
        );

        Ok(Self {
            catalog,
            by_name,
            by_task,
        })
    }

    /// Load, validate, and index a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let catalog = load_catalog_from_path(path)?;
        Self::build(catalog).with_context(|| format!("validating {}", path.display()))
    }

    pub fn unit_type(&self) -> &UnitType {
        &self.catalog.unit_type
    }

    /// Access the underlying catalog.
    pub fn catalog(&self) -> &UnitPayloadSet {
        &self.catalog
    }

    /// Presets in authored order.
    pub fn presets(&self) -> &[LoadoutPreset] {
        &self.catalog.payloads
    }

    /// Exact-match lookup by preset name.
    ///
    /// Absence is an ordinary answer here, not an error.
    pub fn find_by_name(&self, name: &str) -> Option<&LoadoutPreset> {
        self.by_name
            .get(name)
            .map(|&position| &self.catalog.payloads[position])
    }

    /// Human-readable label for a preset, if the preset exists.
    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.find_by_name(name)
            .map(|preset| preset.display_name.as_str())
    }

    /// Presets flying `task`, in catalog order. Presets without their own tasks
    /// match on the catalog-level defaults.
    pub fn find_by_task(&self, task: TaskTag) -> Vec<&LoadoutPreset> {
        self.by_task
            .get(&task)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &self.catalog.payloads[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mount positions used by a preset, sentinel mounts included.
    pub fn occupied_positions(&self, name: &str) -> Result<BTreeSet<i64>, QueryError> {
        let preset = self.require(name)?;
        Ok(preset.positions().collect())
    }

    /// Real stores carried by a preset, in mount order.
    pub fn stores(&self, name: &str) -> Result<Vec<&StoreId>, QueryError> {
        let preset = self.require(name)?;
        Ok(preset.stores().collect())
    }

    /// Presets carrying `clsid` on any mount. The empty-mount sentinel is not a
    /// store and never matches.
    pub fn find_by_store(&self, clsid: &str) -> Vec<&LoadoutPreset> {
        self.catalog
            .payloads
            .iter()
            .filter(|preset| preset.stores().any(|store| store.as_str() == clsid))
            .collect()
    }

    fn require(&self, name: &str) -> Result<&LoadoutPreset, QueryError> {
        self.find_by_name(name)
            .ok_or_else(|| QueryError::UnknownPreset(name.to_string()))
    }
}
