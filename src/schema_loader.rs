//! JSON Schema lint for on-disk payload catalogs.
//!
//! The loader stops at the first structural problem. The schema check instead
//! reports every shape error in a file at once, which is what a catalog author
//! wants from a lint run. The crate bundles `schema/payload_catalog.schema.json`;
//! callers may point at another copy, whose `schema_version` must be one the
//! crate understands.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const CATALOG_SCHEMA_VERSION: &str = "payload_catalog_v1";

const BUNDLED_SCHEMA: &str = include_str!("../schema/payload_catalog.schema.json");

/// Compiled catalog schema plus the version it declared.
pub struct CatalogSchema {
    pub schema_version: String,
    compiled: JSONSchema,
}

impl CatalogSchema {
    /// Compile the schema shipped with the crate.
    pub fn bundled() -> Result<Self> {
        let value: Value =
            serde_json::from_str(BUNDLED_SCHEMA).context("parsing bundled catalog schema")?;
        Self::compile(value).context("compiling bundled catalog schema")
    }

    /// Load and compile a schema file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::compile(value).with_context(|| format!("compiling schema {}", path.display()))
    }

    fn compile(value: Value) -> Result<Self> {
        let schema_version = extract_schema_version(&value)
            .ok_or_else(|| anyhow!("schema missing schema_version"))?;
        let allowed = allowed_schema_versions();
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
        // Compile errors borrow the schema value; flatten them to text so the
        // error can outlive it.
        let compiled = JSONSchema::compile(&value).map_err(|err| anyhow!("{err}"))?;
        Ok(Self {
            schema_version,
            compiled,
        })
    }

    /// Every schema error for `instance`, each prefixed with its JSON pointer.
    pub fn check(&self, instance: &Value) -> Vec<String> {
        match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| {
                    let pointer = err.instance_path.to_string();
                    if pointer.is_empty() {
                        err.to_string()
                    } else {
                        format!("{pointer}: {err}")
                    }
                })
                .collect(),
        }
    }
}

/// Check raw catalog data against the bundled schema.
pub fn check_against_schema(instance: &Value) -> Result<Vec<String>> {
    Ok(CatalogSchema::bundled()?.check(instance))
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CATALOG_SCHEMA_VERSION.to_string()])
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema.get("schema_version").and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn bundled_schema_accepts_array_and_indexed_shapes() {
        let schema = CatalogSchema::bundled().unwrap();
        assert_eq!(schema.schema_version, CATALOG_SCHEMA_VERSION);

        let arrays = json!({
            "unitType": "F-16C_50",
            "payloads": [{
                "name": "Liberation TARCAP",
                "pylons": [{"CLSID": "<CLEAN>", "num": 8}],
                "tasks": [11]
            }]
        });
        assert!(schema.check(&arrays).is_empty());

        let indexed = json!({
            "unitType": "F-16C_50",
            "name": "F-16C_50",
            "payloads": {"1": {
                "name": "Liberation TARCAP",
                "pylons": {"1": {"CLSID": "{AIM-9X}", "num": 1}},
                "tasks": {"1": 11}
            }},
            "tasks": {}
        });
        assert!(schema.check(&indexed).is_empty());
    }

    #[test]
    fn indexed_keys_match_loader_rules() {
        let schema = CatalogSchema::bundled().unwrap();
        for key in ["0", " 1", "01"] {
            let raw = json!({
                "unitType": "F-16C_50",
                "payloads": {key: {"name": "p", "pylons": []}}
            });
            assert!(!schema.check(&raw).is_empty(), "key {key:?} should be rejected");
            assert!(crate::load_catalog(&raw).is_err());
        }
    }

    #[test]
    fn reports_every_shape_error() {
        let raw = json!({
            "unitType": "",
            "payloads": [{
                "name": "Liberation CAS",
                "pylons": [{"CLSID": "", "num": 0}]
            }]
        });
        let errors = check_against_schema(&raw).unwrap();
        assert!(errors.len() >= 2, "expected several errors, got {errors:?}");
        assert!(errors.iter().any(|err| err.starts_with("/unitType")));
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({"schema_version": "payload_catalog_v9", "type": "object"})
        )
        .unwrap();
        let err = CatalogSchema::load(file.path()).err().unwrap();
        assert!(format!("{err:#}").contains("not in allowed set"));
    }
}
