//! Shared types for the waterboard data portal.
//!
//! Defines record identity (dataset + region + location), the dataset
//! payload shapes, timestamp normalization, and attachment helpers used by
//! both the local cache and the cloud store.

pub mod attachment;
pub mod key;
pub mod payload;
pub mod timestamp;
pub mod validation;

pub use attachment::{estimate_data_url_bytes, guess_image_ext, PhotoAttachment};
pub use key::{Dataset, RecordKey};
pub use payload::{ConnectionEntry, ExpenditureItem, LabsPayload, PlantPayload, SchemePayload};
pub use timestamp::{now_iso, record_millis, to_millis};
