//! User-visible status reporting.
//!
//! The surrounding UI injects a sink at construction instead of the core
//! probing for a toast function at call time. Every save and sync outcome
//! is classified as success / degraded-but-saved / blocked.

use tracing::{info, warn};

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// Capability contract for surfacing status to the user.
pub trait StatusSink: Send + Sync {
    fn notify(&self, level: StatusLevel, message: &str);
}

/// Default sink: routes messages to the log.
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn notify(&self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Success | StatusLevel::Info => info!("{message}"),
            StatusLevel::Warning | StatusLevel::Danger => warn!("{message}"),
        }
    }
}
