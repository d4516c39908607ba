use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved store identifier marking a mount that is intentionally left bare.
pub const EMPTY_MOUNT_CLSID: &str = "<CLEAN>";

/// Aircraft variant a payload catalog is restricted to (e.g., `F-16C_50`).
///
/// Used as the repository key so presets are always resolved against the
/// catalog of the airframe that will carry them.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitType(pub String);

/// Opaque store identifier occupying a mount.
///
/// The value is kept verbatim; its meaning belongs to the host simulation.
/// The one value this crate interprets is `EMPTY_MOUNT_CLSID`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub String);

/// Mission-role classifier attached to a preset.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTag(pub i64);

impl UnitType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StoreId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the explicit empty-mount sentinel.
    pub fn is_empty_mount(&self) -> bool {
        self.0 == EMPTY_MOUNT_CLSID
    }

    /// True when the identifier carries no text at all. The sentinel is not blank.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TaskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
