use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{load_json, ConfigError};
use crate::core::feature::FeatureKind;

/// One secondary dataset available for enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub id: String,

    pub name: String,

    /// Kind of feature records this dataset contributes
    pub kind: FeatureKind,

    /// Gene datasets may point at a sibling annotation file
    #[serde(default)]
    pub has_annotations: bool,
}

/// All configured datasets, keyed by id
#[derive(Debug, Clone)]
pub struct DatasetsConfig {
    datasets: Vec<DatasetConfig>,
}

impl DatasetsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let datasets = load_json(path)?;
        Ok(Self { datasets })
    }

    pub fn get(&self, id: &str) -> Result<&DatasetConfig, ConfigError> {
        self.datasets
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| ConfigError::UnknownDataset(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetConfig> {
        self.datasets.iter()
    }
}
