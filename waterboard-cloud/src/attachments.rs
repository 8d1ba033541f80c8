//! Photo attachment uploads.
//!
//! Inline photos (data URLs captured offline) are uploaded individually:
//! the size ceiling is enforced before any network call, already-hosted
//! URLs pass through untouched, and one photo's failure never aborts the
//! owning record's sync.

use crate::config::CloudConfig;
use crate::error::{CloudError, CloudResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};
use waterboard_types::{estimate_data_url_bytes, guess_image_ext, PhotoAttachment};

/// Uploads plant photos to the hosted attachment store.
pub struct AttachmentStore {
    client: Client,
    config: CloudConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

impl AttachmentStore {
    pub fn new(config: CloudConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.attachment_timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self { client, config }
    }

    /// Uploads one photo and returns its hosted URL.
    ///
    /// Already-hosted photos return their URL without a network call.
    /// Oversized photos are rejected before upload is attempted.
    pub async fn upload_photo(
        &self,
        region: &str,
        location: &str,
        index: usize,
        photo: &PhotoAttachment,
    ) -> CloudResult<String> {
        if photo.is_hosted() {
            return Ok(photo.data_url.clone());
        }

        let size_bytes = estimate_data_url_bytes(&photo.data_url);
        if size_bytes > self.config.attachment_max_bytes {
            return Err(CloudError::AttachmentTooLarge {
                name: photo.name.clone(),
                size_bytes,
                limit_bytes: self.config.attachment_max_bytes,
            });
        }

        let ext = guess_image_ext(photo);
        let safe_region = urlencoding::encode(region).replace('.', "%2E");
        let safe_location = urlencoding::encode(location).replace('.', "%2E");
        let stamp = chrono::Utc::now().timestamp_millis();
        let path = format!("plant_photos/{safe_region}/{safe_location}/{stamp}_{index}.{ext}");
        let content_hash = hex::encode(Sha256::digest(photo.data_url.as_bytes()));

        let url = format!("{}/api/attachments/{path}", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "dataUrl": photo.data_url,
                "contentHash": content_hash,
            }))
            .send()
            .await
            .map_err(|e| CloudError::AttachmentUpload(format!("{}: {e}", photo.name)))?;

        if !resp.status().is_success() {
            return Err(CloudError::AttachmentUpload(format!(
                "{}: HTTP {}",
                photo.name,
                resp.status()
            )));
        }

        let uploaded: UploadResponse = resp
            .json()
            .await
            .map_err(|e| CloudError::AttachmentUpload(format!("{}: {e}", photo.name)))?;

        debug!("uploaded photo {} ({size_bytes} bytes)", photo.name);
        Ok(uploaded.url)
    }

    /// Uploads a batch of photos, skipping individual failures.
    /// Returns hosted URLs for the successes only.
    pub async fn upload_all(
        &self,
        region: &str,
        location: &str,
        photos: &[PhotoAttachment],
    ) -> Vec<String> {
        let mut urls = Vec::with_capacity(photos.len());
        for (index, photo) in photos.iter().enumerate() {
            match self.upload_photo(region, location, index, photo).await {
                Ok(url) => urls.push(url),
                Err(e) => warn!("skipping photo {}: {e}", photo.name),
            }
        }
        if urls.len() < photos.len() {
            warn!("uploaded {}/{} photos", urls.len(), photos.len());
        }
        urls
    }
}
