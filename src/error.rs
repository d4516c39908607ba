//! Error taxonomy for catalog loading, validation, and queries.
//!
//! Loader failures abort the load and carry enough location detail (preset
//! index or name, pylon index) to find the offending entry. Validation
//! failures are collected into `ValidationErrors` so a single pass reports
//! every problem. Query failures are scoped to the one query.

use std::fmt;
use thiserror::Error;

/// Structural failure while turning raw input into typed records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("malformed catalog: {reason}")]
    MalformedCatalog { reason: String },

    #[error("malformed preset #{index}{}: {reason}", label_suffix(.name))]
    MalformedPreset {
        index: usize,
        name: Option<String>,
        reason: String,
    },

    #[error("malformed pylon #{index} in preset '{preset}': {reason}")]
    MalformedPylon {
        preset: String,
        index: usize,
        reason: String,
    },
}

fn label_suffix(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" ('{name}')"),
        None => String::new(),
    }
}

impl LoadError {
    pub(crate) fn catalog(reason: impl Into<String>) -> Self {
        LoadError::MalformedCatalog {
            reason: reason.into(),
        }
    }

    pub(crate) fn preset(index: usize, name: Option<&str>, reason: impl Into<String>) -> Self {
        LoadError::MalformedPreset {
            index,
            name: name.map(str::to_string),
            reason: reason.into(),
        }
    }

    pub(crate) fn pylon(preset: &str, index: usize, reason: impl Into<String>) -> Self {
        LoadError::MalformedPylon {
            preset: preset.to_string(),
            index,
            reason: reason.into(),
        }
    }
}

/// A single invariant violation found by the validator.
#[derive(Debug, Clone, Error, PartialEq, Eq, Hash)]
pub enum Violation {
    #[error("preset '{preset}' assigns mount position {num} more than once")]
    DuplicateMountPosition { preset: String, num: i64 },

    #[error("preset '{preset}' has a blank store identifier at mount position {num}")]
    EmptyStoreIdentifier { preset: String, num: i64 },

    #[error("preset name '{name}' is declared more than once")]
    DuplicatePresetName { name: String },

    #[error("'{preset}' lists invalid task tag {value}")]
    InvalidTaskTag { preset: String, value: i64 },

    #[error("preset '{preset}' uses mount position {num}; positions start at 1")]
    InvalidMountPosition { preset: String, num: i64 },

    #[error("preset #{index} has a blank name")]
    EmptyPresetName { index: usize },
}

/// Every violation found in one validation pass, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} catalog violation(s)", self.0.len())?;
        for violation in &self.0 {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure of a single index query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_preset_mentions_name_when_known() {
        let named = LoadError::preset(2, Some("Liberation CAS"), "missing 'pylons'");
        assert_eq!(
            named.to_string(),
            "malformed preset #2 ('Liberation CAS'): missing 'pylons'"
        );
        let anonymous = LoadError::preset(0, None, "missing 'name'");
        assert_eq!(anonymous.to_string(), "malformed preset #0: missing 'name'");
    }

    #[test]
    fn validation_errors_list_every_violation() {
        let errors = ValidationErrors(vec![
            Violation::DuplicatePresetName {
                name: "Liberation BARCAP".into(),
            },
            Violation::DuplicateMountPosition {
                preset: "Liberation BARCAP".into(),
                num: 8,
            },
        ]);
        let rendered = errors.to_string();
        assert!(rendered.starts_with("2 catalog violation(s)"));
        assert!(rendered.contains("'Liberation BARCAP' is declared more than once"));
        assert!(rendered.contains("mount position 8 more than once"));
    }
}
