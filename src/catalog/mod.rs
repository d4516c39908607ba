//! Payload catalog wiring.
//!
//! `loader` turns raw nested data into the typed records in `model`;
//! `LoadoutIndex` validates a loaded catalog and answers queries over it; and
//! `PayloadRepository` / `SharedIndex` hold indexes for several airframes or
//! across reloads.

pub mod identity;
pub mod index;
pub mod loader;
pub mod model;
pub mod repository;

pub use identity::{EMPTY_MOUNT_CLSID, StoreId, TaskTag, UnitType};
pub use index::LoadoutIndex;
pub use loader::{load_catalog, load_catalog_from_path, load_catalog_from_str};
pub use model::{LoadoutPreset, PylonAssignment, UnitPayloadSet};
pub use repository::{PayloadRepository, SharedIndex};
