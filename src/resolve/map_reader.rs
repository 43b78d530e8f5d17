//! Per-map flat-file providers: chromosome order and contig anchors.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::config::{ConfigError, MapConfig, PathsConfig};

/// Map position of one anchored contig
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPosition {
    pub chrom: String,
    pub cm: Option<f64>,
    pub bp: Option<u64>,
}

/// Reads one map's flat files.
///
/// The chromosome-order table is loaded eagerly at construction; anchor
/// positions are loaded on demand for the contig set a run actually touched.
/// Both are read-only for the reader's lifetime.
#[derive(Debug)]
pub struct MapReader<'a> {
    paths: &'a PathsConfig,
    map: &'a MapConfig,
    chrom_order: HashMap<String, u32>,
}

impl<'a> MapReader<'a> {
    /// Load `<map_dir>/<map_dir>.chrom`. A duplicated chromosome name is a
    /// fatal configuration error.
    pub fn new(paths: &'a PathsConfig, map: &'a MapConfig) -> Result<Self, ConfigError> {
        let path = paths
            .map_dir(&map.map_dir)
            .join(format!("{}.chrom", map.map_dir));

        debug!(map = %map.id, path = %path.display(), "reading chromosome order");

        let mut chrom_order = HashMap::new();
        for (line_num, line) in read_lines(&path)? {
            let mut fields = line.split('\t');
            let name = fields
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| invalid(&path, line_num, "missing chromosome name"))?;
            let order: u32 = fields
                .next()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| invalid(&path, line_num, "missing or invalid order"))?;

            if chrom_order.insert(name.to_string(), order).is_some() {
                return Err(ConfigError::DuplicateChromosome {
                    name: name.to_string(),
                    path,
                });
            }
        }

        Ok(Self {
            paths,
            map,
            chrom_order,
        })
    }

    pub fn map_config(&self) -> &MapConfig {
        self.map
    }

    /// Numeric order of a chromosome, `None` for names the map does not know
    pub fn chrom_order(&self, name: &str) -> Option<u32> {
        self.chrom_order.get(name).copied()
    }

    /// Resolve a contig set through the map's indirection tables, one
    /// `<map_dir>/<map_dir>.<db>` file per configured database. Contigs
    /// absent from every table are simply absent from the result.
    pub fn anchor_positions(
        &self,
        contigs: &HashSet<String>,
    ) -> Result<HashMap<String, AnchorPosition>, ConfigError> {
        let mut positions = HashMap::new();
        let mut remaining: HashSet<&str> = contigs.iter().map(String::as_str).collect();

        for db in &self.map.db_list {
            if remaining.is_empty() {
                break;
            }

            let path = self
                .paths
                .map_dir(&self.map.map_dir)
                .join(format!("{}.{db}", self.map.map_dir));

            debug!(map = %self.map.id, path = %path.display(), "reading anchor table");

            for (line_num, line) in read_lines(&path)? {
                let fields: Vec<&str> = line.split('\t').collect();

                let contig = *fields
                    .first()
                    .ok_or_else(|| invalid(&path, line_num, "missing contig id"))?;
                if !remaining.contains(contig) {
                    continue;
                }

                let position = self.parse_anchor(&path, line_num, &fields)?;
                remaining.remove(contig);
                positions.insert(contig.to_string(), position);
            }
        }

        Ok(positions)
    }

    /// Columns after (contig, chromosome) follow the map's capability flags:
    /// cM when the map has cM, then bp when it has bp.
    fn parse_anchor(
        &self,
        path: &Path,
        line_num: usize,
        fields: &[&str],
    ) -> Result<AnchorPosition, ConfigError> {
        let chrom = fields
            .get(1)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(path, line_num, "missing chromosome"))?
            .to_string();

        let mut next = 2;
        let cm = if self.map.has_cm {
            let raw = fields
                .get(next)
                .ok_or_else(|| invalid(path, line_num, "missing cM position"))?;
            next += 1;
            Some(
                raw.trim()
                    .parse()
                    .map_err(|_| invalid(path, line_num, "invalid cM position"))?,
            )
        } else {
            None
        };

        let bp = if self.map.has_bp {
            let raw = fields
                .get(next)
                .ok_or_else(|| invalid(path, line_num, "missing bp position"))?;
            Some(
                raw.trim()
                    .parse()
                    .map_err(|_| invalid(path, line_num, "invalid bp position"))?,
            )
        } else {
            None
        };

        Ok(AnchorPosition { chrom, cm, bp })
    }
}

pub(crate) fn invalid(path: &Path, line: usize, message: &str) -> ConfigError {
    ConfigError::InvalidRecord {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    }
}

/// Non-empty lines of a tab file with 1-based line numbers
pub(crate) fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l.to_string()))
        .collect())
}
