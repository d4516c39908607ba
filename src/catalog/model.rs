//! Typed representation of a unit payload catalog.
//!
//! Records are immutable once built by `CatalogLoader`. Serialization uses the
//! same field names the loader accepts, so a serialized catalog can be fed back
//! through the loader unchanged. Use `LoadoutIndex` for lookups; use these
//! structs when the full catalog surface is required.

use crate::catalog::identity::{StoreId, TaskTag, UnitType};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// All payload presets authored for one aircraft variant.
pub struct UnitPayloadSet {
    #[serde(rename = "unitType")]
    pub unit_type: UnitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub payloads: Vec<LoadoutPreset>,
    /// Catalog-level default tasks for presets that declare none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskTag>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Named loadout: which store sits on which mount, plus its mission roles.
pub struct LoadoutPreset {
    pub name: String,
    /// Resolved at load time; equals `name` when the source omitted it.
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub pylons: Vec<PylonAssignment>,
    pub tasks: Vec<TaskTag>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One store (or the empty-mount sentinel) on one mount position.
pub struct PylonAssignment {
    #[serde(rename = "CLSID")]
    pub clsid: StoreId,
    pub num: i64,
}

impl UnitPayloadSet {
    /// Catalog label used in reports: the declared name, else the unit type.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.unit_type.as_str())
    }

    /// Tasks a preset is considered to fly: its own, else the catalog defaults.
    pub fn effective_tasks<'a>(&'a self, preset: &'a LoadoutPreset) -> &'a [TaskTag] {
        if preset.tasks.is_empty() {
            &self.tasks
        } else {
            &preset.tasks
        }
    }
}

impl LoadoutPreset {
    /// Mount positions in authored order.
    pub fn positions(&self) -> impl Iterator<Item = i64> + '_ {
        self.pylons.iter().map(|pylon| pylon.num)
    }

    /// Real stores carried by this preset; empty-mount sentinels are skipped.
    pub fn stores(&self) -> impl Iterator<Item = &StoreId> + '_ {
        self.pylons
            .iter()
            .map(|pylon| &pylon.clsid)
            .filter(|clsid| !clsid.is_empty_mount())
    }
}

impl PylonAssignment {
    pub fn is_empty_mount(&self) -> bool {
        self.clsid.is_empty_mount()
    }
}
