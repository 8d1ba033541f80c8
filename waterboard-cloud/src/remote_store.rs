//! Remote document store client.
//!
//! Documents live in per-dataset collections and are addressed by the same
//! deterministic id both stores derive from `(region, location)`. Writes
//! are merge-writes of full snapshots, so repeating a write leaves the same
//! logical state.

use crate::config::CloudConfig;
use crate::error::{CloudError, CloudResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use waterboard_types::{now_iso, Dataset, RecordKey};

/// HTTP client for the board's document API.
pub struct RemoteStore {
    client: Client,
    config: CloudConfig,
}

#[derive(Deserialize)]
struct DocumentList {
    documents: Vec<Value>,
}

impl RemoteStore {
    pub fn new(config: CloudConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self { client, config }
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    fn doc_url(&self, key: &RecordKey) -> String {
        format!(
            "{}/api/collections/{}/documents/{}",
            self.config.api_base_url,
            key.dataset.collection(),
            key.doc_id()
        )
    }

    /// Short-timeout connectivity probe. Any failure reads as offline.
    pub async fn is_online(&self) -> bool {
        let url = format!("{}/api/health", self.config.api_base_url);
        let probe = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.config.health_timeout_secs))
            .send();
        match probe.await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("connectivity probe failed: {e}");
                false
            }
        }
    }

    /// Reads one document. `Ok(None)` means the document does not exist;
    /// `Err(RemoteUnavailable)` means the read itself could not be made.
    pub async fn fetch(&self, key: &RecordKey) -> CloudResult<Option<Value>> {
        let resp = self
            .client
            .get(self.doc_url(key))
            .send()
            .await
            .map_err(|e| CloudError::RemoteUnavailable(format!("fetch {key}: {e}")))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let doc = resp
                    .json::<Value>()
                    .await
                    .map_err(|e| CloudError::RemoteUnavailable(format!("fetch {key}: {e}")))?;
                Ok(Some(doc))
            }
            status => Err(CloudError::RemoteUnavailable(format!(
                "fetch {key}: HTTP {status}"
            ))),
        }
    }

    /// Merge-writes a full snapshot and returns the stored document.
    ///
    /// `updatedAt` is stamped client-side before the write; when the server
    /// responds with the stored document its own stamp takes precedence.
    pub async fn upsert(&self, key: &RecordKey, payload: &Value) -> CloudResult<Value> {
        let mut doc = payload.clone();
        if let Value::Object(map) = &mut doc {
            map.insert("updatedAt".to_string(), Value::String(now_iso()));
        }

        let resp = self
            .client
            .put(self.doc_url(key))
            .json(&doc)
            .send()
            .await
            .map_err(|e| CloudError::RemoteUnavailable(format!("upsert {key}: {e}")))?;

        if !resp.status().is_success() {
            return Err(CloudError::RemoteUnavailable(format!(
                "upsert {key}: HTTP {}",
                resp.status()
            )));
        }

        // Servers that echo the stored document give us the authoritative
        // stamp; otherwise the client-stamped snapshot stands.
        match resp.json::<Value>().await {
            Ok(stored) if stored.is_object() => Ok(stored),
            _ => Ok(doc),
        }
    }

    /// Enumerates all documents of a collection, for the pull path.
    pub async fn list_documents(&self, dataset: Dataset) -> CloudResult<Vec<Value>> {
        let url = format!(
            "{}/api/collections/{}/documents",
            self.config.api_base_url,
            dataset.collection()
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CloudError::RemoteUnavailable(format!("list {dataset}: {e}")))?;

        if !resp.status().is_success() {
            return Err(CloudError::RemoteUnavailable(format!(
                "list {dataset}: HTTP {}",
                resp.status()
            )));
        }

        let list: DocumentList = resp
            .json()
            .await
            .map_err(|e| CloudError::RemoteUnavailable(format!("list {dataset}: {e}")))?;
        Ok(list.documents)
    }

    /// Waits for the server to acknowledge that previously issued writes
    /// are durable, bounded by `timeout`. Elapsing yields `CommitTimeout`,
    /// which callers treat as non-fatal: the write was issued, only the
    /// confirmation is missing.
    pub async fn commit_barrier(&self, timeout: Duration) -> CloudResult<()> {
        let url = format!("{}/api/commit", self.config.api_base_url);
        let wait = self.client.post(&url).send();
        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(resp)) if resp.status().is_success() => Ok(()),
            Ok(Ok(resp)) => {
                warn!("commit barrier answered HTTP {}", resp.status());
                Err(CloudError::CommitTimeout)
            }
            Ok(Err(e)) => {
                warn!("commit barrier failed: {e}");
                Err(CloudError::CommitTimeout)
            }
            Err(_) => Err(CloudError::CommitTimeout),
        }
    }
}
