//! Shared library for the payload catalog helpers.
//!
//! The crate loads aircraft payload catalogs (named loadout presets mapping
//! stores to mount positions) into typed records, validates their structural
//! invariants, and serves read-only queries over them. Public functions here
//! form the contract the `payload-lint` and `payload-query` binaries depend
//! on: catalog discovery, loading, validation, and indexing.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub mod catalog;
pub mod error;
pub mod logging;
pub mod schema_loader;
pub mod validation;

pub use catalog::{
    EMPTY_MOUNT_CLSID, LoadoutIndex, LoadoutPreset, PayloadRepository, PylonAssignment,
    SharedIndex, StoreId, TaskTag, UnitPayloadSet, UnitType, load_catalog,
    load_catalog_from_path, load_catalog_from_str,
};
pub use error::{LoadError, QueryError, ValidationErrors, Violation};
pub use schema_loader::{CATALOG_SCHEMA_VERSION, CatalogSchema, check_against_schema};
pub use validation::{collect_violations, validate_catalog};

const CATALOG_DIR_ENV: &str = "LOADOUT_CATALOG_DIR";
const CATALOG_EXTENSION: &str = "json";

/// Verifies that a directory hint points at an existing catalog directory.
fn catalog_dir_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

/// Locate the directory holding catalog files.
///
/// Honors `LOADOUT_CATALOG_DIR` when it names a real directory, then falls
/// back to the `catalogs/` directory recorded at build time.
pub fn find_catalog_dir() -> Result<PathBuf> {
    if let Ok(env_dir) = env::var(CATALOG_DIR_ENV) {
        if let Some(dir) = catalog_dir_from_hint(&env_dir) {
            return Ok(dir);
        }
    }

    if let Some(hint) = option_env!("LOADOUT_CATALOG_DIR_HINT") {
        if let Some(dir) = catalog_dir_from_hint(hint) {
            return Ok(dir);
        }
    }

    bail!("Unable to locate a payload catalog directory. Set {CATALOG_DIR_ENV} to one.");
}

/// List catalog files (`*.json`) directly under `dir`, sorted by path.
///
/// An empty directory is an error because callers always expect at least one
/// catalog to work on.
pub fn list_catalog_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some(CATALOG_EXTENSION) {
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        bail!("No catalog files found under {}", dir.display());
    }

    files.sort();
    Ok(files)
}

/// Load every catalog under `dir` into a repository keyed by unit type.
///
/// Fails on the first file that cannot be loaded or validated, and when two
/// files declare the same unit type.
pub fn load_repository(dir: &Path) -> Result<PayloadRepository> {
    let mut repository = PayloadRepository::default();
    let mut sources: BTreeMap<UnitType, PathBuf> = BTreeMap::new();
    for path in list_catalog_files(dir)? {
        let index = LoadoutIndex::load(&path)?;
        if let Some(previous) = sources.get(index.unit_type()) {
            bail!(
                "{} and {} both declare unit type '{}'",
                previous.display(),
                path.display(),
                index.unit_type()
            );
        }
        sources.insert(index.unit_type().clone(), path);
        repository.register(index);
    }
    Ok(repository)
}

/// Load and index the one catalog under `dir` whose `unitType` matches.
///
/// Files that cannot be loaded are skipped with a warning so an unrelated
/// broken catalog does not block the lookup. The matching catalog must still
/// validate, and two matching files are an error.
pub fn load_unit_catalog(dir: &Path, unit_type: &UnitType) -> Result<LoadoutIndex> {
    let mut found: Option<(PathBuf, UnitPayloadSet)> = None;
    for path in list_catalog_files(dir)? {
        let catalog = match load_catalog_from_path(&path) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(
                    file = %path.display(),
                    error = %format!("{err:#}"),
                    "skipping unreadable catalog"
                );
                continue;
            }
        };
        if &catalog.unit_type != unit_type {
            continue;
        }
        if let Some((previous, _)) = &found {
            bail!(
                "{} and {} both declare unit type '{}'",
                previous.display(),
                path.display(),
                unit_type
            );
        }
        found = Some((path, catalog));
    }

    let Some((path, catalog)) = found else {
        bail!("no catalog for unit type '{unit_type}' under {}", dir.display());
    };
    LoadoutIndex::build(catalog).with_context(|| format!("validating {}", path.display()))
}
