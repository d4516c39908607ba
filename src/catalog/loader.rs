//! Catalog loader: raw nested mapping to typed records.
//!
//! The loader only checks shape and types. Invariants that span entries
//! (unique mounts, unique names, tag ranges) belong to the validator so they
//! can be reported as one batch. Any structural failure aborts the load; no
//! partial catalog is returned.
//!
//! Sequences may arrive either as JSON arrays or as objects keyed by 1-based
//! integer strings (the shape of exported indexed tables). Both become an
//! ordered `Vec` whose order follows the array position or the numeric key.

use crate::catalog::identity::{StoreId, TaskTag, UnitType};
use crate::catalog::model::{LoadoutPreset, PylonAssignment, UnitPayloadSet};
use crate::error::LoadError;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Build a `UnitPayloadSet` from already-deserialized input.
pub fn load_catalog(raw: &Value) -> Result<UnitPayloadSet, LoadError> {
    let root = raw
        .as_object()
        .ok_or_else(|| LoadError::catalog("expected a mapping at the top level"))?;

    let unit_type = match root.get("unitType") {
        Some(Value::String(unit_type)) if !unit_type.trim().is_empty() => unit_type.clone(),
        Some(Value::String(_)) => return Err(LoadError::catalog("'unitType' must not be empty")),
        Some(_) => return Err(LoadError::catalog("'unitType' must be a string")),
        None => return Err(LoadError::catalog("missing 'unitType'")),
    };

    let name = optional_string(root, "name").map_err(LoadError::catalog)?;

    let payload_values = match root.get("payloads") {
        Some(value) => {
            sequence_items(value).map_err(|reason| LoadError::catalog(format!("'payloads' {reason}")))?
        }
        None => return Err(LoadError::catalog("missing 'payloads'")),
    };

    let tasks = match root.get("tasks") {
        Some(value) => {
            parse_tasks(value).map_err(|reason| LoadError::catalog(format!("'tasks' {reason}")))?
        }
        None => Vec::new(),
    };

    let payloads = payload_values
        .into_iter()
        .enumerate()
        .map(|(index, value)| load_preset(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        unit_type = %unit_type,
        presets = payloads.len(),
        "loaded payload catalog"
    );

    Ok(UnitPayloadSet {
        unit_type: UnitType(unit_type),
        name,
        payloads,
        tasks,
    })
}

/// Parse catalog JSON text and load it.
pub fn load_catalog_from_str(input: &str) -> Result<UnitPayloadSet> {
    let value: Value = serde_json::from_str(input).context("Unable to parse catalog JSON")?;
    Ok(load_catalog(&value)?)
}

/// Read a catalog JSON file from disk and load it without validation.
pub fn load_catalog_from_path(path: &Path) -> Result<UnitPayloadSet> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    load_catalog(&value).with_context(|| format!("loading {}", path.display()))
}

fn load_preset(index: usize, value: &Value) -> Result<LoadoutPreset, LoadError> {
    let entry = value
        .as_object()
        .ok_or_else(|| LoadError::preset(index, None, "expected a mapping"))?;

    let name = match entry.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(LoadError::preset(index, None, "'name' must be a string")),
        None => return Err(LoadError::preset(index, None, "missing 'name'")),
    };

    let display_name = optional_string(entry, "displayName")
        .map_err(|reason| LoadError::preset(index, Some(name.as_str()), reason))?
        .unwrap_or_else(|| name.clone());

    let pylon_values = match entry.get("pylons") {
        Some(value) => sequence_items(value).map_err(|reason| {
            LoadError::preset(index, Some(name.as_str()), format!("'pylons' {reason}"))
        })?,
        None => return Err(LoadError::preset(index, Some(name.as_str()), "missing 'pylons'")),
    };

    let tasks = match entry.get("tasks") {
        Some(value) => parse_tasks(value).map_err(|reason| {
            LoadError::preset(index, Some(name.as_str()), format!("'tasks' {reason}"))
        })?,
        None => Vec::new(),
    };

    let pylons = pylon_values
        .into_iter()
        .enumerate()
        .map(|(pylon_index, value)| load_pylon(&name, pylon_index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LoadoutPreset {
        name,
        display_name,
        pylons,
        tasks,
    })
}

fn load_pylon(preset: &str, index: usize, value: &Value) -> Result<PylonAssignment, LoadError> {
    let entry = value
        .as_object()
        .ok_or_else(|| LoadError::pylon(preset, index, "expected a mapping"))?;

    let clsid = match entry.get("CLSID") {
        Some(Value::String(clsid)) => clsid.clone(),
        Some(_) => return Err(LoadError::pylon(preset, index, "'CLSID' must be a string")),
        None => return Err(LoadError::pylon(preset, index, "missing 'CLSID'")),
    };

    let num = match entry.get("num") {
        Some(value) => integer(value)
            .ok_or_else(|| LoadError::pylon(preset, index, "'num' must be an integer"))?,
        None => return Err(LoadError::pylon(preset, index, "missing 'num'")),
    };

    Ok(PylonAssignment {
        clsid: StoreId(clsid),
        num,
    })
}

fn optional_string(entry: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match entry.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(format!("'{key}' must be a string")),
    }
}

fn parse_tasks(value: &Value) -> Result<Vec<TaskTag>, String> {
    sequence_items(value)?
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            integer(item)
                .map(TaskTag)
                .ok_or_else(|| format!("entry #{idx} must be an integer"))
        })
        .collect()
}

/// Flatten an array, or an object keyed by integer strings, into ordered items.
fn sequence_items(value: &Value) -> Result<Vec<&Value>, String> {
    match value {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(entries) => {
            let mut keyed = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                let position = table_index(key)
                    .ok_or_else(|| format!("has invalid index '{key}'; expected 1, 2, ..."))?;
                keyed.push((position, item));
            }
            // Canonical keys are distinct strings, so their positions are distinct too.
            keyed.sort_by_key(|(position, _)| *position);
            Ok(keyed.into_iter().map(|(_, item)| item).collect())
        }
        _ => Err("must be a sequence".to_string()),
    }
}

/// Parse a 1-based table key. Only the canonical spelling is accepted (no
/// whitespace, sign, or leading zero), the same set the bundled schema allows.
fn table_index(key: &str) -> Option<u64> {
    if key.is_empty() || key.starts_with('0') || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Integer value, also accepting floats with no fractional part (`8.0`), which
/// catalogs exported from scripting languages often contain.
fn integer(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    let float = value.as_f64()?;
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}
