//! Admin region/location registry.
//!
//! Operators can extend the compiled-in region and location lists per
//! dataset. The registry persists as a single document in the local cache
//! under `"{appns}:adminConfig"` and merges with the defaults on read.

use crate::local_store::LocalStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use waterboard_types::Dataset;

const ADMIN_KEY_SUFFIX: &str = "adminConfig";

/// Admin-added region: optional display label plus extra locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct DatasetConfig {
    #[serde(default)]
    regions: BTreeMap<String, RegionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct AdminConfig {
    #[serde(default)]
    datasets: BTreeMap<String, DatasetConfig>,
}

/// Region/location registry merging compiled-in defaults with admin config.
pub struct RegionRegistry {
    store: LocalStore,
    defaults: BTreeMap<Dataset, BTreeMap<String, Vec<String>>>,
    config: AdminConfig,
}

impl RegionRegistry {
    /// Loads the registry, falling back to an empty config when the stored
    /// document is missing or corrupt.
    pub fn load(
        store: LocalStore,
        defaults: BTreeMap<Dataset, BTreeMap<String, Vec<String>>>,
    ) -> Self {
        let key = format!("{}:{ADMIN_KEY_SUFFIX}", store.appns());
        let config = store
            .raw_get(&key)
            .and_then(|value| match serde_json::from_value(value) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("admin config unreadable, starting empty: {e}");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            store,
            defaults,
            config,
        }
    }

    fn save(&self) {
        let key = format!("{}:{ADMIN_KEY_SUFFIX}", self.store.appns());
        match serde_json::to_value(&self.config) {
            Ok(value) => {
                self.store.raw_put(&key, &value);
            }
            Err(e) => warn!("failed to serialize admin config: {e}"),
        }
    }

    /// Default regions plus admin-added ones, in stable order.
    pub fn regions(&self, dataset: Dataset) -> Vec<String> {
        let mut out: Vec<String> = self
            .defaults
            .get(&dataset)
            .map(|regions| regions.keys().cloned().collect())
            .unwrap_or_default();
        if let Some(cfg) = self.config.datasets.get(dataset.cache_kind()) {
            for region in cfg.regions.keys() {
                if !out.contains(region) {
                    out.push(region.clone());
                }
            }
        }
        out
    }

    /// Default locations plus admin-added ones for a region.
    pub fn locations(&self, dataset: Dataset, region: &str) -> Vec<String> {
        let mut out: Vec<String> = self
            .defaults
            .get(&dataset)
            .and_then(|regions| regions.get(region))
            .cloned()
            .unwrap_or_default();
        if let Some(entry) = self
            .config
            .datasets
            .get(dataset.cache_kind())
            .and_then(|cfg| cfg.regions.get(region))
        {
            for loc in &entry.locations {
                if !out.contains(loc) {
                    out.push(loc.clone());
                }
            }
        }
        out
    }

    /// Display label for a region, when an admin has set one.
    pub fn label(&self, dataset: Dataset, region: &str) -> Option<String> {
        self.config
            .datasets
            .get(dataset.cache_kind())
            .and_then(|cfg| cfg.regions.get(region))
            .map(|entry| entry.label.trim())
            .filter(|label| !label.is_empty())
            .map(str::to_string)
    }

    /// Adds (or relabels) a region. Keys are normalized to uppercase
    /// alphanumerics, matching the compiled-in key style.
    pub fn add_region(&mut self, dataset: Dataset, region: &str, label: Option<&str>) -> String {
        let key = normalize_region_key(region);
        let entry = self
            .config
            .datasets
            .entry(dataset.cache_kind().to_string())
            .or_default()
            .regions
            .entry(key.clone())
            .or_default();
        if let Some(label) = label {
            entry.label = label.trim().to_string();
        }
        self.save();
        key
    }

    /// Adds a location under a region, creating the region entry if needed.
    pub fn add_location(&mut self, dataset: Dataset, region: &str, location: &str) {
        let location = location.trim();
        if location.is_empty() {
            return;
        }
        let entry = self
            .config
            .datasets
            .entry(dataset.cache_kind().to_string())
            .or_default()
            .regions
            .entry(normalize_region_key(region))
            .or_default();
        if !entry.locations.iter().any(|l| l == location) {
            entry.locations.push(location.to_string());
        }
        self.save();
    }

    /// Removes an admin-added location. Empty unlabelled regions are pruned.
    pub fn delete_location(&mut self, dataset: Dataset, region: &str, location: &str) {
        let key = normalize_region_key(region);
        if let Some(cfg) = self.config.datasets.get_mut(dataset.cache_kind()) {
            if let Some(entry) = cfg.regions.get_mut(&key) {
                entry.locations.retain(|l| l != location);
                if entry.locations.is_empty() && entry.label.is_empty() {
                    cfg.regions.remove(&key);
                }
            }
        }
        self.save();
    }

    /// Removes an admin-added region entirely.
    pub fn delete_region(&mut self, dataset: Dataset, region: &str) {
        let key = normalize_region_key(region);
        if let Some(cfg) = self.config.datasets.get_mut(dataset.cache_kind()) {
            cfg.regions.remove(&key);
        }
        self.save();
    }
}

fn normalize_region_key(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
