//! Loadout validator: structural invariants over a loaded catalog.
//!
//! Every check runs to completion and the violations are returned together so a
//! catalog author can fix all of them in one pass. Validation only reads the
//! catalog; it is safe to call repeatedly or from several threads at once.

use crate::catalog::UnitPayloadSet;
use crate::error::{ValidationErrors, Violation};
use std::collections::BTreeSet;
use tracing::warn;

/// Validate a catalog, returning every violation when any is found.
pub fn validate_catalog(set: &UnitPayloadSet) -> Result<(), ValidationErrors> {
    let violations = collect_violations(set);
    if violations.is_empty() {
        Ok(())
    } else {
        warn!(
            unit_type = %set.unit_type,
            violations = violations.len(),
            "payload catalog failed validation"
        );
        Err(ValidationErrors(violations))
    }
}

/// Run all checks and return violations in catalog order.
pub fn collect_violations(set: &UnitPayloadSet) -> Vec<Violation> {
    let mut violations = Vec::new();

    for value in set.tasks.iter().filter(|tag| tag.0 < 0) {
        violations.push(Violation::InvalidTaskTag {
            preset: set.label().to_string(),
            value: value.0,
        });
    }

    let mut seen_names: BTreeSet<&str> = BTreeSet::new();
    for (index, preset) in set.payloads.iter().enumerate() {
        if preset.name.trim().is_empty() {
            violations.push(Violation::EmptyPresetName { index });
        } else if !seen_names.insert(preset.name.as_str()) {
            violations.push(Violation::DuplicatePresetName {
                name: preset.name.clone(),
            });
        }

        // A repeated mount is reported once per extra claim, not once per pair
        // permutation.
        let mut seen_positions: BTreeSet<i64> = BTreeSet::new();
        for pylon in &preset.pylons {
            if pylon.num < 1 {
                violations.push(Violation::InvalidMountPosition {
                    preset: preset.name.clone(),
                    num: pylon.num,
                });
            }
            if !seen_positions.insert(pylon.num) {
                violations.push(Violation::DuplicateMountPosition {
                    preset: preset.name.clone(),
                    num: pylon.num,
                });
            }
            if pylon.clsid.is_blank() {
                violations.push(Violation::EmptyStoreIdentifier {
                    preset: preset.name.clone(),
                    num: pylon.num,
                });
            }
        }

        for value in preset.tasks.iter().filter(|tag| tag.0 < 0) {
            violations.push(Violation::InvalidTaskTag {
                preset: preset.name.clone(),
                value: value.0,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::load_catalog;
    use serde_json::{Value, json};

    fn catalog(payloads: Value) -> UnitPayloadSet {
        load_catalog(&json!({"unitType": "F-16C_50", "payloads": payloads})).unwrap()
    }

    #[test]
    fn clean_catalog_has_no_violations() {
        let set = catalog(json!([
            {
                "name": "Liberation TARCAP",
                "pylons": [
                    {"CLSID": "{AIM-120C}", "num": 1},
                    {"CLSID": "<CLEAN>", "num": 8}
                ],
                "tasks": [11]
            },
            {"name": "Liberation Ferry", "pylons": []}
        ]));
        assert!(collect_violations(&set).is_empty());
        assert!(validate_catalog(&set).is_ok());
    }

    #[test]
    fn sentinel_mount_is_not_an_empty_identifier() {
        let set = catalog(json!([
            {"name": "Liberation TARCAP", "pylons": [{"CLSID": "<CLEAN>", "num": 8}]}
        ]));
        assert!(validate_catalog(&set).is_ok());
    }

    #[test]
    fn duplicate_mount_reported_once_per_pair() {
        let set = catalog(json!([
            {
                "name": "Liberation CAS",
                "pylons": [
                    {"CLSID": "{GBU-12}", "num": 8},
                    {"CLSID": "{GBU-38}", "num": 8},
                    {"CLSID": "{AIM-9X}", "num": 1}
                ]
            }
        ]));
        assert_eq!(
            collect_violations(&set),
            vec![Violation::DuplicateMountPosition {
                preset: "Liberation CAS".into(),
                num: 8,
            }]
        );
    }

    #[test]
    fn three_claims_on_one_mount_give_two_violations() {
        let set = catalog(json!([
            {
                "name": "Liberation CAS",
                "pylons": [
                    {"CLSID": "{GBU-12}", "num": 8},
                    {"CLSID": "{GBU-38}", "num": 8},
                    {"CLSID": "{MK-82}", "num": 8}
                ]
            }
        ]));
        let duplicate = Violation::DuplicateMountPosition {
            preset: "Liberation CAS".into(),
            num: 8,
        };
        assert_eq!(collect_violations(&set), vec![duplicate.clone(), duplicate]);
    }

    #[test]
    fn duplicate_preset_name_is_reported() {
        let set = catalog(json!([
            {"name": "Liberation BARCAP", "pylons": []},
            {"name": "Liberation BARCAP", "pylons": []}
        ]));
        let err = validate_catalog(&set).unwrap_err();
        assert_eq!(
            err.violations(),
            &[Violation::DuplicatePresetName {
                name: "Liberation BARCAP".into()
            }]
        );
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let raw = json!({
            "unitType": "F-16C_50",
            "payloads": [
                {
                    "name": "Liberation SEAD",
                    "pylons": [
                        {"CLSID": " ", "num": 3},
                        {"CLSID": "{AGM-88}", "num": 0}
                    ],
                    "tasks": [-4, 32]
                },
                {"name": "", "pylons": []},
                {"name": "Liberation SEAD", "pylons": []}
            ],
            "tasks": [-1]
        });
        let set = load_catalog(&raw).unwrap();
        let violations = collect_violations(&set);
        assert_eq!(
            violations,
            vec![
                Violation::InvalidTaskTag {
                    preset: "F-16C_50".into(),
                    value: -1,
                },
                Violation::EmptyStoreIdentifier {
                    preset: "Liberation SEAD".into(),
                    num: 3,
                },
                Violation::InvalidMountPosition {
                    preset: "Liberation SEAD".into(),
                    num: 0,
                },
                Violation::InvalidTaskTag {
                    preset: "Liberation SEAD".into(),
                    value: -4,
                },
                Violation::EmptyPresetName { index: 1 },
                Violation::DuplicatePresetName {
                    name: "Liberation SEAD".into(),
                },
            ]
        );
    }

    #[test]
    fn validation_does_not_mutate_input() {
        let set = catalog(json!([
            {"name": "a", "pylons": [{"CLSID": "", "num": 2}]}
        ]));
        let before = set.clone();
        let first = collect_violations(&set);
        let second = collect_violations(&set);
        assert_eq!(first, second);
        assert_eq!(set, before);
    }
}
