//! Turning alignment hits into map positions.
//!
//! Physical maps place a hit directly: the subject sequence is a chromosome
//! and the subject range is the position. Anchored maps go through one level
//! of indirection: the subject is a contig, and the contig's anchor entry
//! supplies the position. Contigs missing from every anchor table become
//! unmapped hits rather than positions.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::config::ConfigError;
use crate::core::hit::AlignmentHit;
use crate::core::position::{MapPosition, MappingResults, UnmappedHit};
use crate::core::types::{MapKind, SortField};
use crate::resolve::map_reader::MapReader;

/// Resolve a run's hits against one map.
///
/// `unaligned` is carried through untouched; it belongs to the alignment
/// stage, not the map. Markers resolving to more than one distinct position
/// are skipped entirely unless `show_multiple` is set.
pub fn resolve_hits(
    reader: &MapReader<'_>,
    hits: &[AlignmentHit],
    unaligned: Vec<String>,
    sort_by: SortField,
    show_multiple: bool,
) -> Result<MappingResults, ConfigError> {
    let map = reader.map_config();

    let (mut mapped, unmapped) = match map.kind {
        MapKind::Physical => (resolve_physical(reader, hits, show_multiple), Vec::new()),
        MapKind::Anchored => resolve_anchored(reader, hits, show_multiple)?,
    };

    mapped.sort_by(|a, b| a.map_order(b, sort_by));

    Ok(MappingResults::new(
        mapped,
        unmapped,
        unaligned,
        sort_by,
        map.name.clone(),
    ))
}

fn resolve_physical(
    reader: &MapReader<'_>,
    hits: &[AlignmentHit],
    show_multiple: bool,
) -> Vec<MapPosition> {
    let map = reader.map_config();

    let mut by_marker: BTreeMap<&str, Vec<&AlignmentHit>> = BTreeMap::new();
    for hit in hits {
        by_marker.entry(&hit.query_id).or_default().push(hit);
    }

    let mut mapped = Vec::new();
    for (marker, marker_hits) in by_marker {
        let mut candidates: Vec<MapPosition> = Vec::new();
        for hit in marker_hits {
            let candidate = MapPosition {
                marker_id: marker.to_string(),
                chrom_name: hit.subject_id.clone(),
                chrom_order: 0,
                cm_pos: None,
                cm_end_pos: None,
                bp_pos: Some(hit.subject_start),
                bp_end_pos: Some(hit.subject_end),
                strand: Some(hit.strand),
                multiple: false,
                other_alignments: false,
                map_name: map.name.clone(),
            };
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        emit_marker(reader, &mut mapped, candidates, 0, show_multiple);
    }

    mapped
}

type AnchoredStreams = (Vec<MapPosition>, Vec<UnmappedHit>);

fn resolve_anchored(
    reader: &MapReader<'_>,
    hits: &[AlignmentHit],
    show_multiple: bool,
) -> Result<AnchoredStreams, ConfigError> {
    let map = reader.map_config();

    // One pass to collect the contig set, then a single read of the anchor
    // tables for exactly those contigs.
    let mut by_marker: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut contigs: HashSet<String> = HashSet::new();
    for hit in hits {
        let marker_contigs = by_marker.entry(&hit.query_id).or_default();
        if !marker_contigs.contains(&hit.subject_id.as_str()) {
            marker_contigs.push(&hit.subject_id);
        }
        contigs.insert(hit.subject_id.clone());
    }

    let anchors = reader.anchor_positions(&contigs)?;

    let mut mapped = Vec::new();
    let mut unmapped = Vec::new();
    for (marker, marker_contigs) in by_marker {
        let mut candidates: Vec<MapPosition> = Vec::new();
        let mut unresolved: Vec<&str> = Vec::new();

        for contig in marker_contigs {
            let Some(anchor) = anchors.get(contig) else {
                unresolved.push(contig);
                continue;
            };
            let candidate = MapPosition {
                marker_id: marker.to_string(),
                chrom_name: anchor.chrom.clone(),
                chrom_order: 0,
                cm_pos: anchor.cm,
                cm_end_pos: anchor.cm,
                bp_pos: anchor.bp,
                bp_end_pos: anchor.bp,
                strand: None,
                multiple: false,
                other_alignments: false,
                map_name: map.name.clone(),
            };
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        let has_mapped_contigs = !candidates.is_empty();
        for contig in &unresolved {
            unmapped.push(UnmappedHit {
                marker_id: marker.to_string(),
                contig_id: contig.to_string(),
                has_mapped_contigs,
            });
        }

        emit_marker(reader, &mut mapped, candidates, unresolved.len(), show_multiple);
    }

    unmapped.sort_by(|a, b| {
        (&a.marker_id, &a.contig_id, a.has_mapped_contigs)
            .cmp(&(&b.marker_id, &b.contig_id, b.has_mapped_contigs))
    });
    unmapped.dedup();

    Ok((mapped, unmapped))
}

/// Finish one marker's candidate list.
///
/// Multiplicity is decided over all distinct candidates, including those on
/// chromosomes the map's order file does not list; such candidates are then
/// dropped at emission rather than failing the run.
fn emit_marker(
    reader: &MapReader<'_>,
    mapped: &mut Vec<MapPosition>,
    candidates: Vec<MapPosition>,
    no_pos_count: usize,
    show_multiple: bool,
) {
    let multiple = candidates.len() > 1;
    if multiple && !show_multiple {
        debug!(
            marker = candidates[0].marker_id,
            positions = candidates.len(),
            "skipping marker with multiple positions"
        );
        return;
    }

    let other_alignments = no_pos_count > 0;
    for mut candidate in candidates {
        let Some(order) = reader.chrom_order(&candidate.chrom_name) else {
            debug!(
                marker = candidate.marker_id,
                chrom = candidate.chrom_name,
                "dropping position on unknown chromosome"
            );
            continue;
        };
        candidate.chrom_order = order;
        candidate.multiple = multiple;
        candidate.other_alignments = other_alignments;
        mapped.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfig, PathsConfig};
    use crate::core::types::{MapId, MapKind, SearchPolicy, SortField, Strand};
    use crate::resolve::map_reader::tests::{anchored_map_config, paths_config};
    use std::path::Path;

    fn hit(query: &str, subject: &str, start: u64, end: u64) -> AlignmentHit {
        AlignmentHit {
            query_id: query.to_string(),
            subject_id: subject.to_string(),
            identity: 98.0,
            query_coverage: 95.0,
            score: 100.0,
            strand: Strand::Forward,
            query_start: 1,
            query_end: 50,
            subject_start: start,
            subject_end: end,
            db_id: "db1".to_string(),
            algorithm: "blastn".to_string(),
        }
    }

    fn physical_map_config() -> MapConfig {
        MapConfig {
            id: MapId::new("genome"),
            name: "Reference Genome".to_string(),
            has_cm: false,
            has_bp: true,
            default_sort: SortField::Bp,
            kind: MapKind::Physical,
            search: SearchPolicy::Greedy,
            db_list: vec!["genome_v1".to_string()],
            map_dir: "genome".to_string(),
        }
    }

    fn write_physical_files(root: &Path) {
        let dir = root.join("maps").join("genome");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("genome.chrom"), "chr1\t1\nchr2\t2\n").unwrap();
    }

    fn write_anchored_files(root: &Path) {
        let dir = root.join("maps").join("pop_map");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("pop_map.chrom"), "1H\t1\n2H\t2\n").unwrap();
        std::fs::write(
            dir.join("pop_map.contigs_v1"),
            "ctg_001\t1H\t10.5\nctg_002\t2H\t42.0\n",
        )
        .unwrap();
    }

    fn physical_reader<'a>(paths: &'a PathsConfig, map: &'a MapConfig) -> MapReader<'a> {
        MapReader::new(paths, map).unwrap()
    }

    #[test]
    fn test_physical_single_placement() {
        let dir = tempfile::tempdir().unwrap();
        write_physical_files(dir.path());
        let paths = paths_config(dir.path());
        let map = physical_map_config();
        let reader = physical_reader(&paths, &map);

        let hits = vec![hit("m1", "chr2", 1000, 1200)];
        let results =
            resolve_hits(&reader, &hits, vec!["m9".to_string()], SortField::Bp, false).unwrap();

        assert_eq!(results.mapped.len(), 1);
        let pos = &results.mapped[0];
        assert_eq!(pos.chrom_name, "chr2");
        assert_eq!(pos.chrom_order, 2);
        assert_eq!(pos.bp_pos, Some(1000));
        assert_eq!(pos.bp_end_pos, Some(1200));
        assert_eq!(pos.strand, Some(Strand::Forward));
        assert!(!pos.multiple);
        assert_eq!(results.unaligned, vec!["m9".to_string()]);
        assert!(results.single_chromosome);
    }

    #[test]
    fn test_physical_duplicate_hits_collapse() {
        let dir = tempfile::tempdir().unwrap();
        write_physical_files(dir.path());
        let paths = paths_config(dir.path());
        let map = physical_map_config();
        let reader = physical_reader(&paths, &map);

        let hits = vec![hit("m1", "chr1", 100, 200), hit("m1", "chr1", 100, 200)];
        let results = resolve_hits(&reader, &hits, Vec::new(), SortField::Bp, false).unwrap();

        assert_eq!(results.mapped.len(), 1);
        assert!(!results.mapped[0].multiple);
    }

    #[test]
    fn test_multi_position_marker_hidden_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write_physical_files(dir.path());
        let paths = paths_config(dir.path());
        let map = physical_map_config();
        let reader = physical_reader(&paths, &map);

        let hits = vec![hit("m1", "chr1", 100, 200), hit("m1", "chr2", 300, 400)];

        let hidden = resolve_hits(&reader, &hits, Vec::new(), SortField::Bp, false).unwrap();
        assert!(hidden.mapped.is_empty());

        let shown = resolve_hits(&reader, &hits, Vec::new(), SortField::Bp, true).unwrap();
        assert_eq!(shown.mapped.len(), 2);
        assert!(shown.mapped.iter().all(|p| p.multiple));
        assert!(!shown.single_chromosome);
    }

    #[test]
    fn test_unknown_chromosome_dropped_but_counts_toward_multiplicity() {
        let dir = tempfile::tempdir().unwrap();
        write_physical_files(dir.path());
        let paths = paths_config(dir.path());
        let map = physical_map_config();
        let reader = physical_reader(&paths, &map);

        let hits = vec![hit("m1", "chr1", 100, 200), hit("m1", "chrUn", 300, 400)];
        let results = resolve_hits(&reader, &hits, Vec::new(), SortField::Bp, true).unwrap();

        assert_eq!(results.mapped.len(), 1);
        assert_eq!(results.mapped[0].chrom_name, "chr1");
        assert!(results.mapped[0].multiple);
        // on a physical map the dropped hit never raises other_alignments
        assert!(!results.mapped[0].other_alignments);
    }

    #[test]
    fn test_anchored_resolution_and_unmapped_stream() {
        let dir = tempfile::tempdir().unwrap();
        write_anchored_files(dir.path());
        let paths = paths_config(dir.path());
        let map = anchored_map_config();
        let reader = MapReader::new(&paths, &map).unwrap();

        let hits = vec![
            hit("m1", "ctg_001", 10, 60),
            hit("m1", "ctg_404", 10, 60),
            hit("m2", "ctg_405", 10, 60),
        ];
        let results = resolve_hits(&reader, &hits, Vec::new(), SortField::Cm, false).unwrap();

        assert_eq!(results.mapped.len(), 1);
        let pos = &results.mapped[0];
        assert_eq!(pos.marker_id, "m1");
        assert_eq!(pos.chrom_name, "1H");
        assert_eq!(pos.cm_pos, Some(10.5));
        assert_eq!(pos.bp_pos, None);
        assert_eq!(pos.strand, None);
        assert!(pos.other_alignments);

        assert_eq!(results.unmapped.len(), 2);
        assert_eq!(results.unmapped[0].marker_id, "m1");
        assert!(results.unmapped[0].has_mapped_contigs);
        assert_eq!(results.unmapped[1].marker_id, "m2");
        assert!(!results.unmapped[1].has_mapped_contigs);
    }

    #[test]
    fn test_final_sort_is_map_order() {
        let dir = tempfile::tempdir().unwrap();
        write_physical_files(dir.path());
        let paths = paths_config(dir.path());
        let map = physical_map_config();
        let reader = physical_reader(&paths, &map);

        let hits = vec![
            hit("m3", "chr2", 50, 60),
            hit("m1", "chr1", 900, 950),
            hit("m2", "chr1", 100, 150),
        ];
        let results = resolve_hits(&reader, &hits, Vec::new(), SortField::Bp, false).unwrap();

        let order: Vec<&str> = results.mapped.iter().map(|p| p.marker_id.as_str()).collect();
        assert_eq!(order, vec!["m2", "m1", "m3"]);
    }
}
