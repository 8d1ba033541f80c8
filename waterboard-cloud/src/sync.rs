//! Sync coordinator — reconciles the local cache and the remote store.
//!
//! Push is conditional: a record is written to the remote only when the
//! remote copy is absent or strictly older by normalized timestamp, so a
//! newer local edit is never clobbered mid-flight. Pull is unconditional:
//! it runs on request and the remote is treated as authoritative once
//! fetched. Both directions are idempotent and safe to invoke repeatedly.

use crate::attachments::AttachmentStore;
use crate::config::CloudConfig;
use crate::error::{CloudError, CloudResult};
use crate::remote_store::RemoteStore;
use crate::status::{StatusLevel, StatusSink};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use waterboard_types::{
    record_millis, validation::validate_plant_with_limit, Dataset, PlantPayload, RecordKey,
};
use waterboard_store::LocalStore;

/// Counters for one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub pushed: usize,
    pub pulled: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// How a submission ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the remote store and mirrored locally.
    Synced,
    /// Remote unreachable or the write failed; the record is safe in the
    /// local cache and will be pushed on the next sync.
    SavedLocally,
}

/// Reconciles divergence between the local cache and the remote store.
pub struct SyncCoordinator {
    local: LocalStore,
    remote: Arc<RemoteStore>,
    attachments: Arc<AttachmentStore>,
    status: Arc<dyn StatusSink>,
    config: CloudConfig,
}

impl SyncCoordinator {
    pub fn new(
        local: LocalStore,
        remote: Arc<RemoteStore>,
        attachments: Arc<AttachmentStore>,
        status: Arc<dyn StatusSink>,
        config: CloudConfig,
    ) -> Self {
        Self {
            local,
            remote,
            attachments,
            status,
            config,
        }
    }

    /// Push decision: remote absent, or local strictly newer.
    pub fn should_push(local: &Value, remote: Option<&Value>) -> bool {
        match remote {
            None => true,
            Some(remote) => record_millis(local) > record_millis(remote),
        }
    }

    /// Pushes every newer-or-missing local record to the remote store.
    ///
    /// Failures for one record are logged and counted; the remaining
    /// records are still processed.
    pub async fn push_local_to_remote(&self) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.remote.is_online().await {
            debug!("offline, skipping local-to-remote sync");
            return report;
        }

        for dataset in Dataset::ALL {
            for local_doc in self.local.list_all(dataset) {
                let Some(key) = record_key_of(dataset, &local_doc) else {
                    continue;
                };
                match self.push_one(&key, &local_doc).await {
                    Ok(true) => report.pushed += 1,
                    Ok(false) => report.skipped += 1,
                    Err(e) => {
                        warn!("push failed for {key}: {e}");
                        report.failed += 1;
                    }
                }
            }
        }

        if report.pushed > 0 {
            self.status.notify(
                StatusLevel::Success,
                &format!("Synced {} item(s) to cloud", report.pushed),
            );
        } else {
            debug!("no local changes to push");
        }
        report
    }

    async fn push_one(&self, key: &RecordKey, local_doc: &Value) -> CloudResult<bool> {
        let remote_doc = self.remote.fetch(key).await?;
        if !Self::should_push(local_doc, remote_doc.as_ref()) {
            return Ok(false);
        }

        debug!("pushing {key}");
        let stored = self.write_record(key, local_doc).await?;
        self.local.put(key, &stored);
        Ok(true)
    }

    /// Writes one full snapshot to the remote store: pending photos are
    /// uploaded first, the inline copies are stripped from the wire
    /// document, and the durability ack is awaited best-effort.
    ///
    /// Returns the snapshot the local cache should converge to. Photos
    /// that failed to upload keep their inline copies locally so the next
    /// sync retries them.
    async fn write_record(&self, key: &RecordKey, local_doc: &Value) -> CloudResult<Value> {
        let mut wire_doc = local_doc.clone();
        let mut retained_inline: Option<Value> = None;

        if key.dataset == Dataset::Plant {
            retained_inline = self.resolve_plant_photos(key, &mut wire_doc).await;
        }

        let mut stored = self.remote.upsert(key, &wire_doc).await?;

        if let Err(e) = self
            .remote
            .commit_barrier(Duration::from_millis(self.config.commit_barrier_timeout_ms))
            .await
        {
            warn!("proceeding without durability confirmation for {key}: {e}");
        }

        if let (Value::Object(map), Some(inline)) = (&mut stored, retained_inline) {
            map.insert("photosInline".to_string(), inline);
        }
        Ok(stored)
    }

    /// Uploads pending inline photos and rewrites `photoUrls` on the wire
    /// document. Inline photos never travel to the remote store; the
    /// returned value holds the inline copies that still need a retry.
    async fn resolve_plant_photos(&self, key: &RecordKey, doc: &mut Value) -> Option<Value> {
        let plant: PlantPayload = match serde_json::from_value(doc.clone()) {
            Ok(plant) => plant,
            Err(e) => {
                warn!("plant record {key} has an unexpected shape, sending as-is: {e}");
                return None;
            }
        };

        let mut retained = None;
        if plant.has_pending_photos() {
            let urls = self
                .attachments
                .upload_all(&key.region, &key.location, &plant.photos_inline)
                .await;
            let uploaded = urls.len();
            if let Value::Object(map) = doc {
                map.insert(
                    "photoUrls".to_string(),
                    serde_json::to_value(urls).unwrap_or_else(|_| Value::Array(Vec::new())),
                );
            }
            if uploaded < plant.photos_inline.len() {
                retained = serde_json::to_value(&plant.photos_inline).ok();
            }
        }

        if let Value::Object(map) = doc {
            map.remove("photosInline");
        }
        retained
    }

    /// Overwrites the local cache from every remote collection.
    ///
    /// No timestamp comparison on pull: it runs when explicitly requested
    /// and the remote reflects the latest authoritative state. One
    /// collection's failure never prevents the others from syncing.
    pub async fn pull_remote_to_local(&self) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.remote.is_online().await {
            debug!("offline, skipping remote-to-local sync");
            return report;
        }

        for dataset in Dataset::ALL {
            match self.remote.list_documents(dataset).await {
                Ok(docs) => {
                    for doc in docs {
                        let Some(key) = record_key_of(dataset, &doc) else {
                            continue;
                        };
                        self.local.put(&key, &doc);
                        report.pulled += 1;
                    }
                }
                Err(e) => {
                    warn!("pull of {dataset} failed: {e}");
                    report.failed += 1;
                }
            }
        }

        if report.pulled > 0 {
            self.status.notify(
                StatusLevel::Success,
                &format!("Synced {} item(s) from cloud", report.pulled),
            );
        }
        report
    }

    /// The submit path: validate, save locally first, then attempt the
    /// cloud write. A remote failure degrades to [`SaveOutcome::SavedLocally`]
    /// with a warning; only validation blocks the submission.
    pub async fn save_record(
        &self,
        dataset: Dataset,
        payload: &Value,
    ) -> CloudResult<SaveOutcome> {
        let Some(key) = record_key_of(dataset, payload) else {
            self.status
                .notify(StatusLevel::Danger, "Select region & location first.");
            return Err(CloudError::Validation(vec![
                "Region and location are required".to_string(),
            ]));
        };

        if dataset == Dataset::Plant {
            let plant: PlantPayload = serde_json::from_value(payload.clone())?;
            let errors = validate_plant_with_limit(&plant, self.config.attachment_max_bytes);
            if !errors.is_empty() {
                self.status.notify(
                    StatusLevel::Danger,
                    &format!("Validation errors: {}", errors.join(", ")),
                );
                return Err(CloudError::Validation(errors));
            }
        }

        // Local first, so the record survives whatever the network does.
        let mut local_doc = payload.clone();
        if let Value::Object(map) = &mut local_doc {
            map.insert(
                "updatedAt".to_string(),
                Value::String(waterboard_types::now_iso()),
            );
        }
        if !self.local.put(&key, &local_doc) {
            self.status
                .notify(StatusLevel::Warning, "Failed to save data locally");
        }

        if !self.remote.is_online().await {
            self.status.notify(
                StatusLevel::Warning,
                "Saved locally. No internet connection - will sync when online.",
            );
            return Ok(SaveOutcome::SavedLocally);
        }

        match self.write_record(&key, &local_doc).await {
            Ok(stored) => {
                self.local.put(&key, &stored);
                info!("saved {key} to cloud");
                self.status
                    .notify(StatusLevel::Success, "Data saved to cloud successfully!");
                Ok(SaveOutcome::Synced)
            }
            Err(e) => {
                warn!("cloud save failed for {key}: {e}");
                self.status.notify(
                    StatusLevel::Warning,
                    &format!("Saved locally. Cloud sync failed: {e}"),
                );
                Ok(SaveOutcome::SavedLocally)
            }
        }
    }
}

/// Extracts the composite identity from a record payload. Records without
/// a region/location pair have no stable identity and are skipped.
fn record_key_of(dataset: Dataset, doc: &Value) -> Option<RecordKey> {
    let region = doc.get("region")?.as_str()?.trim();
    let location = doc.get("location")?.as_str()?.trim();
    if region.is_empty() || location.is_empty() {
        return None;
    }
    Some(RecordKey::new(dataset, region, location))
}
