//! Dataset payload shapes.
//!
//! Every record is a full snapshot; stores exchange them as
//! `serde_json::Value` documents, and these structs give the typed view the
//! entry forms and validation work with. Field names match the wire format
//! (camelCase) so a struct serializes to exactly the stored document.

use crate::attachment::PhotoAttachment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One connection category line on the scheme form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub category: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

/// One expenditure line on the scheme form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureItem {
    pub item: String,
    pub value: Option<f64>,
}

/// Scheme data-entry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SchemePayload {
    pub region: String,
    pub location: String,
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
    /// Yearly connection growth, keyed by year.
    #[serde(default)]
    pub growth: BTreeMap<String, Option<f64>>,
    /// Monthly metrics, keyed by month then field name.
    #[serde(default)]
    pub monthly: BTreeMap<String, BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub expenditures: Vec<ExpenditureItem>,
    /// Per-capita consumption, quarters q1..q4.
    #[serde(default)]
    pub per_cum: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub wsp_status: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub updated_at: Value,
}

/// Treatment plant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlantPayload {
    pub region: String,
    pub location: String,
    #[serde(default)]
    pub scheme_brief: String,
    pub designed_capacity: Option<f64>,
    pub operational_capacity: Option<f64>,
    #[serde(default)]
    pub water_source: String,
    pub approved_extraction: Option<f64>,
    #[serde(default)]
    pub treatment_type: String,
    #[serde(default)]
    pub coverage: String,
    /// Photos captured offline, awaiting upload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos_inline: Vec<PhotoAttachment>,
    /// Hosted URLs of uploaded photos.
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub updated_at: Value,
}

impl PlantPayload {
    /// True while photos are captured but none has a hosted URL yet.
    pub fn has_pending_photos(&self) -> bool {
        !self.photos_inline.is_empty() && self.photo_urls.is_empty()
    }
}

/// Laboratory submission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LabsPayload {
    pub region: String,
    pub location: String,
    #[serde(default)]
    pub raw_water: String,
    #[serde(default)]
    pub treated_tp: String,
    #[serde(default)]
    pub treated_distribution: String,
    #[serde(default)]
    pub issues: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub updated_at: Value,
}
