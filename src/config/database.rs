use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{load_json, ConfigError};
use crate::core::types::RefType;

/// One reference database an aligner can be pointed at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub id: String,

    pub name: String,

    /// Size class, selects the tool variant for size-sensitive aligners
    pub ref_type: RefType,
}

/// All configured databases, keyed by id
#[derive(Debug, Clone)]
pub struct DatabasesConfig {
    databases: Vec<DatabaseConfig>,
}

impl DatabasesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let databases = load_json(path)?;
        Ok(Self { databases })
    }

    /// Reference type of a database. Databases used as subjects without an
    /// entry in the configuration fall back to the caller-supplied type.
    pub fn ref_type(&self, db_id: &str, fallback: RefType) -> RefType {
        self.databases
            .iter()
            .find(|d| d.id == db_id)
            .map_or(fallback, |d| d.ref_type)
    }
}
