//! Record identity — composite keys shared by the local and remote stores.
//!
//! Both stores must agree on identity without a central ID allocator, so
//! the cache key and the remote document id are derived deterministically
//! from the same `(dataset, region, location)` triple.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three record collections the portal synchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Scheme data entry: connections, growth, monthly metrics, expenditures.
    Scheme,
    /// Treatment plant data: capacities, treatment type, photos.
    Plant,
    /// Laboratory submissions: four free-text fields.
    Labs,
}

impl Dataset {
    /// All datasets, in sync order.
    pub const ALL: [Dataset; 3] = [Dataset::Scheme, Dataset::Plant, Dataset::Labs];

    /// Remote collection name for this dataset.
    pub fn collection(&self) -> &'static str {
        match self {
            Dataset::Scheme => "schemeExtended",
            Dataset::Plant => "plantSubmissions",
            Dataset::Labs => "labsSubmissions",
        }
    }

    /// Local cache key segment for this dataset.
    pub fn cache_kind(&self) -> &'static str {
        match self {
            Dataset::Scheme => "extended",
            Dataset::Plant => "plant",
            Dataset::Labs => "labs",
        }
    }

    /// Enumerable local-cache prefix for dataset-wide scans.
    pub fn cache_prefix(&self, appns: &str) -> String {
        format!("{appns}:{}:", self.cache_kind())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_kind())
    }
}

/// Composite identity of one logical record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub dataset: Dataset,
    pub region: String,
    pub location: String,
}

impl RecordKey {
    pub fn new(
        dataset: Dataset,
        region: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            dataset,
            region: region.into(),
            location: location.into(),
        }
    }

    /// Local cache key: `"{appns}:{kind}:{region}:{location}"`.
    pub fn cache_key(&self, appns: &str) -> String {
        format!(
            "{appns}:{}:{}:{}",
            self.dataset.cache_kind(),
            self.region,
            self.location
        )
    }

    /// Remote document id: region + URL-encoded location with dots escaped.
    ///
    /// Stable across runs so push and pull always address the same logical
    /// document.
    pub fn doc_id(&self) -> String {
        format!(
            "{}__{}",
            self.region,
            urlencoding::encode(&self.location).replace('.', "%2E")
        )
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.dataset, self.region, self.location)
    }
}
