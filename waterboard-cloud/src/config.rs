//! Cloud sync configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the remote store and sync coordinator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Base URL of the board's document API.
    pub api_base_url: String,

    /// Application namespace used as the local cache key prefix.
    pub app_namespace: String,

    /// Timeout for document reads and writes (seconds).
    pub request_timeout_secs: u64,

    /// Timeout for the connectivity probe (seconds).
    pub health_timeout_secs: u64,

    /// Bound on waiting for the server durability ack (milliseconds).
    /// Elapsing only forgoes the confirmation, never fails the save.
    pub commit_barrier_timeout_ms: u64,

    /// Per-photo size ceiling, enforced before any upload is attempted.
    pub attachment_max_bytes: u64,

    /// Timeout for one attachment upload (seconds).
    pub attachment_timeout_secs: u64,

    /// Delay between a reconnect signal and the first sync attempt
    /// (milliseconds), so a flaky link can settle first.
    pub reconnect_settle_delay_ms: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://data.waterboard.example".to_string(),
            app_namespace: "nwsdb".to_string(),
            request_timeout_secs: 15,
            health_timeout_secs: 5,
            commit_barrier_timeout_ms: 5_000,
            attachment_max_bytes: 5 * 1024 * 1024,
            attachment_timeout_secs: 15,
            reconnect_settle_delay_ms: 2_000,
        }
    }
}

impl CloudConfig {
    /// Config pointed at a local mock server with short timeouts.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            health_timeout_secs: 2,
            commit_barrier_timeout_ms: 500,
            attachment_timeout_secs: 5,
            reconnect_settle_delay_ms: 50,
            ..Self::default()
        }
    }
}
