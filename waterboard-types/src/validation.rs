//! Submission validation.
//!
//! Validation failures are the only error class that blocks a submission
//! outright; everything else degrades to a locally-saved record. Each
//! check appends a user-facing message, and the caller surfaces the whole
//! list at once.

use crate::attachment::estimate_data_url_bytes;
use crate::payload::PlantPayload;

/// Default per-photo size ceiling (5 MiB), enforced before any upload.
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Validates a plant submission. Empty result means the payload may be saved.
pub fn validate_plant(payload: &PlantPayload) -> Vec<String> {
    validate_plant_with_limit(payload, MAX_PHOTO_BYTES)
}

pub fn validate_plant_with_limit(payload: &PlantPayload, max_photo_bytes: u64) -> Vec<String> {
    let mut errors = Vec::new();

    if payload.region.trim().is_empty() || payload.location.trim().is_empty() {
        errors.push("Region and location are required".to_string());
    }

    if payload.designed_capacity.is_some_and(|v| v < 0.0) {
        errors.push("Designed capacity cannot be negative".to_string());
    }
    if payload.operational_capacity.is_some_and(|v| v < 0.0) {
        errors.push("Operational capacity cannot be negative".to_string());
    }
    if payload.approved_extraction.is_some_and(|v| v < 0.0) {
        errors.push("Approved extraction cannot be negative".to_string());
    }

    for (index, photo) in payload.photos_inline.iter().enumerate() {
        if !photo.is_hosted() && estimate_data_url_bytes(&photo.data_url) > max_photo_bytes {
            errors.push(format!(
                "Photo {} is too large (max {}MB)",
                index + 1,
                max_photo_bytes / (1024 * 1024)
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::PhotoAttachment;

    fn valid_plant() -> PlantPayload {
        PlantPayload {
            region: "WESTERN".into(),
            location: "Kalutara".into(),
            designed_capacity: Some(1000.0),
            operational_capacity: Some(800.0),
            ..Default::default()
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(validate_plant(&valid_plant()).is_empty());
    }

    #[test]
    fn missing_identity_is_reported() {
        let mut plant = valid_plant();
        plant.location.clear();
        let errors = validate_plant(&plant);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("required"));
    }

    #[test]
    fn negative_capacities_are_reported_individually() {
        let mut plant = valid_plant();
        plant.designed_capacity = Some(-1.0);
        plant.operational_capacity = Some(-2.0);
        assert_eq!(validate_plant(&plant).len(), 2);
    }

    #[test]
    fn oversized_photo_is_reported() {
        let mut plant = valid_plant();
        plant.photos_inline.push(PhotoAttachment {
            name: "big.jpg".into(),
            mime: "image/jpeg".into(),
            size: 0,
            data_url: format!("data:image/jpeg;base64,{}", "A".repeat(8 * 1024 * 1024)),
        });
        let errors = validate_plant(&plant);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("too large"));
    }

    #[test]
    fn hosted_photo_skips_size_check() {
        let mut plant = valid_plant();
        plant.photos_inline.push(PhotoAttachment {
            name: "hosted.jpg".into(),
            mime: String::new(),
            size: 0,
            data_url: "https://cdn.example/hosted.jpg".into(),
        });
        assert!(validate_plant(&plant).is_empty());
    }
}
