//! Cloud side of the waterboard portal.
//!
//! Provides the remote document store, attachment uploads with a
//! client-side size ceiling, and the offline-first sync coordinator:
//! - Conditional push (last writer wins by normalized timestamp)
//! - Unconditional pull (remote is authoritative once fetched)
//! - Best-effort commit barrier and per-record failure isolation
//! - Reconnect-triggered sync with a settling delay

pub mod attachments;
pub mod config;
pub mod engine;
pub mod error;
pub mod remote_store;
pub mod status;
pub mod sync;

pub use attachments::AttachmentStore;
pub use config::CloudConfig;
pub use engine::{create_sync_engine, ConnectivityEvent, SyncCommand, SyncEngine, SyncHandle};
pub use error::{CloudError, CloudResult};
pub use remote_store::RemoteStore;
pub use status::{StatusLevel, StatusSink, TracingStatusSink};
pub use sync::{SaveOutcome, SyncCoordinator, SyncReport};
