//! Photo attachment helpers.
//!
//! Plant submissions carry photos either inline (data URLs, captured
//! offline) or as hosted URLs once uploaded. Size is estimated from the
//! base64 body so the ceiling can be enforced before any network call.

use serde::{Deserialize, Serialize};

/// One photo attached to a plant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub name: String,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub size: u64,
    /// Either a `data:` URL (not yet uploaded) or an `http(s)` URL.
    #[serde(rename = "dataUrl")]
    pub data_url: String,
}

impl PhotoAttachment {
    /// True once the photo has a hosted URL and needs no upload.
    pub fn is_hosted(&self) -> bool {
        self.data_url.starts_with("http://") || self.data_url.starts_with("https://")
    }
}

/// Byte estimate for a base64 data URL (4 base64 chars carry 3 bytes,
/// minus padding). Non-data-URL inputs estimate to 0.
pub fn estimate_data_url_bytes(data_url: &str) -> u64 {
    let Some(comma) = data_url.find(',') else {
        return 0;
    };
    let body = &data_url[comma + 1..];
    let padding = body.chars().rev().take_while(|&c| c == '=').count();
    (body.len() * 3 / 4).saturating_sub(padding) as u64
}

/// Picks a file extension: by name, then MIME type, then data-URL header,
/// defaulting to `jpg`.
pub fn guess_image_ext(photo: &PhotoAttachment) -> String {
    let name = photo.name.to_lowercase();
    for ext in ["jpg", "jpeg", "png", "webp", "gif"] {
        if name.ends_with(&format!(".{ext}")) {
            return normalize_ext(ext);
        }
    }

    let mime = photo.mime.to_lowercase();
    if let Some(sub) = mime.strip_prefix("image/") {
        if !sub.is_empty() && sub != "*" {
            return normalize_ext(sub);
        }
    }

    if let Some(rest) = photo.data_url.strip_prefix("data:image/") {
        if let Some(end) = rest.find(|c| c == ';' || c == ',') {
            return normalize_ext(&rest[..end]);
        }
    }

    "jpg".to_string()
}

fn normalize_ext(ext: &str) -> String {
    if ext.eq_ignore_ascii_case("jpeg") {
        "jpg".to_string()
    } else {
        ext.to_lowercase()
    }
}
