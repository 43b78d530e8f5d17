use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{load_json, ConfigError};

/// On-disk locations of the external tools and the data directories.
///
/// Loaded once from `paths.json` and passed by reference; nothing mutates it
/// after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// blastn executable
    pub blastn_app: PathBuf,

    /// Directory holding blastn databases
    pub blastn_dbs: PathBuf,

    /// hs-blastn executable
    pub hsblastn_app: PathBuf,

    /// Directory holding hs-blastn databases
    pub hsblastn_dbs: PathBuf,

    /// gmap executable (standard references)
    pub gmap_app: PathBuf,

    /// gmapl executable (large references)
    pub gmapl_app: PathBuf,

    /// Directory holding gmap databases
    pub gmap_dbs: PathBuf,

    /// Directory holding per-map chromosome and anchor files
    pub maps_dir: PathBuf,

    /// Directory holding per-dataset feature files
    pub datasets_dir: PathBuf,

    /// Scratch directory for reduced query files
    pub tmp_dir: PathBuf,
}

impl PathsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    /// Directory of one map's flat files
    pub fn map_dir(&self, map_dir: &str) -> PathBuf {
        self.maps_dir.join(map_dir)
    }
}
