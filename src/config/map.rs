use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{load_json, ConfigError};
use crate::core::types::{MapId, MapKind, SearchPolicy, SortField};

/// Configuration of one coordinate map.
///
/// Loaded from `maps.json`, read-only afterwards. The database list is
/// ordered: hierarchical search depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub id: MapId,

    pub name: String,

    /// Map carries genetic (cM) positions
    pub has_cm: bool,

    /// Map carries physical (bp) positions
    pub has_bp: bool,

    /// Sort field used when the caller does not request one
    pub default_sort: SortField,

    /// Physical (subjects are chromosomes) or anchored (subjects are contigs)
    pub kind: MapKind,

    /// Search policy for this map's database list
    pub search: SearchPolicy,

    /// Ordered list of database identifiers
    pub db_list: Vec<String>,

    /// Directory under the maps path holding chromosome and anchor files
    pub map_dir: String,
}

impl MapConfig {
    /// Pick the effective sort field for a run.
    ///
    /// A requested field wins only if the map actually carries that unit;
    /// otherwise the map's default applies.
    pub fn resolve_sort(&self, requested: Option<SortField>) -> SortField {
        match requested {
            Some(SortField::Cm) if self.has_cm => SortField::Cm,
            Some(SortField::Bp) if self.has_bp => SortField::Bp,
            _ => self.default_sort,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_cm && !self.has_bp {
            return Err(ConfigError::NoPositionUnits(self.id.to_string()));
        }
        Ok(())
    }
}

/// All configured maps, keyed by id
#[derive(Debug, Clone)]
pub struct MapsConfig {
    maps: Vec<MapConfig>,
}

impl MapsConfig {
    /// Load `maps.json` and validate every entry
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let maps: Vec<MapConfig> = load_json(path)?;

        for map in &maps {
            map.validate()?;
        }

        Ok(Self { maps })
    }

    pub fn get(&self, id: &str) -> Result<&MapConfig, ConfigError> {
        self.maps
            .iter()
            .find(|m| m.id.0 == id)
            .ok_or_else(|| ConfigError::UnknownMap(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapConfig> {
        self.maps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_json(has_cm: bool, has_bp: bool) -> String {
        format!(
            r#"[{{
                "id": "morex",
                "name": "Morex Assembly",
                "has_cm": {has_cm},
                "has_bp": {has_bp},
                "default_sort": "bp",
                "kind": "physical",
                "search": "greedy",
                "db_list": ["morex_genome"],
                "map_dir": "morex"
            }}]"#
        )
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        std::fs::write(&path, map_json(false, true)).unwrap();

        let maps = MapsConfig::load(&path).unwrap();
        let map = maps.get("morex").unwrap();
        assert_eq!(map.kind, MapKind::Physical);
        assert!(maps.get("missing").is_err());
    }

    #[test]
    fn test_no_units_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        std::fs::write(&path, map_json(false, false)).unwrap();

        let err = MapsConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NoPositionUnits(_)));
    }

    #[test]
    fn test_resolve_sort_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        std::fs::write(&path, map_json(false, true)).unwrap();

        let maps = MapsConfig::load(&path).unwrap();
        let map = maps.get("morex").unwrap();
        assert_eq!(map.resolve_sort(Some(SortField::Cm)), SortField::Bp);
        assert_eq!(map.resolve_sort(Some(SortField::Bp)), SortField::Bp);
        assert_eq!(map.resolve_sort(None), SortField::Bp);
    }
}
