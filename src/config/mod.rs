//! Configuration loading.
//!
//! All configuration lives in JSON files under a single config directory and
//! deserializes into immutable value types passed by reference through the
//! pipeline. Validation failures are fatal [`ConfigError`]s; nothing here is
//! retried or defaulted away.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod database;
pub mod dataset;
pub mod map;
pub mod paths;

pub use database::{DatabaseConfig, DatabasesConfig};
pub use dataset::{DatasetConfig, DatasetsConfig};
pub use map::{MapConfig, MapsConfig};
pub use paths::PathsConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown map '{0}'")]
    UnknownMap(String),

    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),

    #[error("map '{0}' declares neither cM nor bp positions")]
    NoPositionUnits(String),

    #[error("duplicated chromosome name '{name}' in {path}")]
    DuplicateChromosome { name: String, path: PathBuf },

    #[error("invalid record at {path}:{line}: {message}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Read and deserialize one JSON config file
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
