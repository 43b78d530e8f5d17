//! Secondary dataset lookup: features near the placements, and direct
//! identifier search.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::config::{ConfigError, DatasetConfig, PathsConfig};
use crate::core::feature::{AnnotationEntry, FeatureRecord};
use crate::core::interval::MapInterval;
use crate::core::position::{MapPosition, MappingResults};
use crate::core::types::SortField;
use crate::resolve::map_reader::{invalid, read_lines, MapReader};

/// Gather all dataset features falling inside the run's intervals.
///
/// Each dataset keeps one positional file per map it was aligned to, at
/// `<datasets_dir>/<id>/<id>.<map_id>`; a dataset with no file for this map
/// contributes nothing. The returned records are globally sorted so the
/// merge stage can walk them alongside the position stream.
pub fn collect_features(
    paths: &PathsConfig,
    datasets: &[&DatasetConfig],
    reader: &MapReader<'_>,
    intervals: &[MapInterval],
    sort_by: SortField,
) -> Result<Vec<FeatureRecord>, ConfigError> {
    let mut features = Vec::new();

    for dataset in datasets {
        let Some(path) = dataset_positions_path(paths, dataset, reader) else {
            continue;
        };

        let mut dataset_features = Vec::new();
        for (line_num, line) in read_lines(&path)? {
            let Some(row) = parse_position_row(&path, line_num, &line, reader)? else {
                continue;
            };

            let point = MapInterval::new(
                row.chrom_order,
                row.sort_pos(sort_by),
                row.sort_end_pos(sort_by),
            );
            if !intervals.iter().any(|i| i.overlaps(&point)) {
                continue;
            }

            dataset_features.push(FeatureRecord {
                feature_id: row.marker_id.clone(),
                dataset_id: dataset.id.clone(),
                dataset_name: dataset.name.clone(),
                kind: dataset.kind,
                annotations: Vec::new(),
                position: row,
            });
        }

        if dataset.has_annotations && !dataset_features.is_empty() {
            let dir = paths.datasets_dir.join(&dataset.id);
            let annotations = read_annotations(&dir.join(format!("{}.annot", dataset.id)))?;
            for feature in &mut dataset_features {
                if let Some(entries) = annotations.get(&feature.feature_id) {
                    feature.annotations = entries.clone();
                }
            }
        }

        debug!(
            dataset = dataset.id,
            features = dataset_features.len(),
            "collected dataset features"
        );
        features.append(&mut dataset_features);
    }

    features.sort_by(|a, b| {
        a.position
            .chrom_order
            .cmp(&b.position.chrom_order)
            .then_with(|| {
                a.position
                    .sort_pos(sort_by)
                    .total_cmp(&b.position.sort_pos(sort_by))
            })
            .then_with(|| {
                a.position
                    .sort_end_pos(sort_by)
                    .total_cmp(&b.position.sort_end_pos(sort_by))
            })
            .then_with(|| a.dataset_name.cmp(&b.dataset_name))
            .then_with(|| a.feature_id.cmp(&b.feature_id))
    });

    Ok(features)
}

/// Place identifiers directly from the datasets' precomputed positions.
///
/// No aligner runs here: an identifier found in a dataset's positional file
/// for this map yields that position verbatim. Identifiers resolving to more
/// than one distinct position are hidden unless `show_multiple` is set, same
/// as alignment-based placement; identifiers found nowhere come back in the
/// unaligned stream.
pub fn locate_ids(
    paths: &PathsConfig,
    datasets: &[&DatasetConfig],
    reader: &MapReader<'_>,
    ids: &[String],
    sort_by: SortField,
    show_multiple: bool,
) -> Result<MappingResults, ConfigError> {
    let map = reader.map_config();
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();

    let mut by_id: BTreeMap<String, Vec<MapPosition>> = BTreeMap::new();
    for dataset in datasets {
        let Some(path) = dataset_positions_path(paths, dataset, reader) else {
            continue;
        };

        for (line_num, line) in read_lines(&path)? {
            let id = line.split('\t').next().unwrap_or("");
            if !wanted.contains(id) {
                continue;
            }
            let Some(position) = parse_position_row(&path, line_num, &line, reader)? else {
                continue;
            };

            let candidates = by_id.entry(position.marker_id.clone()).or_default();
            if !candidates.contains(&position) {
                candidates.push(position);
            }
        }
    }

    let mut mapped = Vec::new();
    for candidates in by_id.values() {
        let multiple = candidates.len() > 1;
        if multiple && !show_multiple {
            debug!(
                id = candidates[0].marker_id,
                positions = candidates.len(),
                "skipping identifier with multiple positions"
            );
            continue;
        }
        for candidate in candidates {
            let mut position = candidate.clone();
            position.multiple = multiple;
            mapped.push(position);
        }
    }
    mapped.sort_by(|a, b| a.map_order(b, sort_by));

    let mut seen = HashSet::new();
    let unaligned: Vec<String> = ids
        .iter()
        .filter(|id| !by_id.contains_key(*id) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    Ok(MappingResults::new(
        mapped,
        Vec::new(),
        unaligned,
        sort_by,
        map.name.clone(),
    ))
}

/// Path of one dataset's positional file for the reader's map, `None` (with
/// a warning) when the dataset was never aligned to this map
fn dataset_positions_path(
    paths: &PathsConfig,
    dataset: &DatasetConfig,
    reader: &MapReader<'_>,
) -> Option<std::path::PathBuf> {
    let path = paths
        .datasets_dir
        .join(&dataset.id)
        .join(format!("{}.{}", dataset.id, reader.map_config().id));

    if !path.exists() {
        warn!(
            dataset = dataset.id,
            map = %reader.map_config().id,
            "dataset has no positions for this map, skipping"
        );
        return None;
    }
    Some(path)
}

/// Parse one positional line into a [`MapPosition`].
///
/// Columns are feature id, chromosome, then the map's position units in
/// cM-before-bp order, same layout as the anchor tables. Rows on a
/// chromosome the map does not list yield `None`.
fn parse_position_row(
    path: &Path,
    line_num: usize,
    line: &str,
    reader: &MapReader<'_>,
) -> Result<Option<MapPosition>, ConfigError> {
    let map = reader.map_config();
    let fields: Vec<&str> = line.split('\t').collect();

    let feature_id = fields
        .first()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(path, line_num, "missing feature id"))?;
    let chrom = fields
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(path, line_num, "missing chromosome"))?;

    let Some(chrom_order) = reader.chrom_order(chrom) else {
        debug!(feature = feature_id, chrom, "feature on unknown chromosome");
        return Ok(None);
    };

    let mut next = 2;
    let cm = if map.has_cm {
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
    let bp = if map.has_bp {
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

    Ok(Some(MapPosition {
        marker_id: feature_id.to_string(),
        chrom_name: chrom.to_string(),
        chrom_order,
        cm_pos: cm,
        cm_end_pos: cm,
        bp_pos: bp,
        bp_end_pos: bp,
        strand: None,
        multiple: false,
        other_alignments: false,
        map_name: map.name.clone(),
    }))
}

/// Annotation files carry feature id, class and value, one entry per line
fn read_annotations(path: &Path) -> Result<HashMap<String, Vec<AnnotationEntry>>, ConfigError> {
    let mut annotations: HashMap<String, Vec<AnnotationEntry>> = HashMap::new();

    for (line_num, line) in read_lines(path)? {
        let mut fields = line.split('\t');
        let feature = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(path, line_num, "missing feature id"))?;
        let kind = fields
            .next()
            .ok_or_else(|| invalid(path, line_num, "missing annotation class"))?;
        let value = fields
            .next()
            .ok_or_else(|| invalid(path, line_num, "missing annotation value"))?;

        annotations
            .entry(feature.to_string())
            .or_default()
            .push(AnnotationEntry {
                kind: kind.to_string(),
                value: value.to_string(),
            });
    }

    Ok(annotations)
}
