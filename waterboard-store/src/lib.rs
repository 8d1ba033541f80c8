//! Local record cache for the waterboard portal.
//!
//! Durable client-side store keyed by the deterministic cache key scheme
//! (`"{appns}:{kind}:{region}:{location}"`). Records are full JSON
//! snapshots; corrupt entries are treated as absent rather than fatal, and
//! writes never fail the caller.

pub mod error;
pub mod local_store;
pub mod registry;

pub use error::{StorageError, StorageResult};
pub use local_store::LocalStore;
pub use registry::RegionRegistry;
