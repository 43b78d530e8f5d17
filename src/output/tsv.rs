//! Tab-separated rendering of mapping results.
//!
//! The layout follows the flat-file conventions of the map directories:
//! `>` for the map title, `#` for header lines, `##` for secondary sections
//! and `-` for absent values. Position columns track the map's declared
//! units, so a cM-only map never prints a bp column.

use std::io::{self, Write};

use crate::config::MapConfig;
use crate::core::feature::{EnrichedRow, FeatureRecord};
use crate::core::position::{MapPosition, MappingResults};

const NA: &str = "-";

/// Render one map's results: mapped positions, then the unmapped and
/// unaligned leftovers.
pub fn write_results<W: Write>(
    out: &mut W,
    map: &MapConfig,
    results: &MappingResults,
) -> io::Result<()> {
    writeln!(out, ">{}", results.map_name)?;
    write_row(out, "#marker", &position_header(map))?;
    for position in &results.mapped {
        write_row(out, &position.marker_id, &position_cells(map, Some(position)))?;
    }

    write_leftovers(out, results)
}

/// The `##Unmapped` and `##Unaligned` sections, emitted only when non-empty
pub fn write_leftovers<W: Write>(out: &mut W, results: &MappingResults) -> io::Result<()> {
    if !results.unmapped.is_empty() {
        writeln!(out, "##Unmapped")?;
        writeln!(out, "#marker\tcontig\thas_positions")?;
        for hit in &results.unmapped {
            writeln!(
                out,
                "{}\t{}\t{}",
                hit.marker_id,
                hit.contig_id,
                yes_no(hit.has_mapped_contigs)
            )?;
        }
    }

    if !results.unaligned.is_empty() {
        writeln!(out, "##Unaligned")?;
        writeln!(out, "#marker")?;
        for marker in &results.unaligned {
            writeln!(out, "{marker}")?;
        }
    }

    Ok(())
}

/// Render one map's enriched rows.
///
/// Every row carries the marker columns followed by the feature columns;
/// whichever side a row does not have prints as absent values. Feature
/// coordinates repeat the position columns so feature-only rows still show
/// where on the map they fall.
pub fn write_enriched<W: Write>(
    out: &mut W,
    map: &MapConfig,
    map_name: &str,
    rows: &[EnrichedRow],
) -> io::Result<()> {
    writeln!(out, ">{map_name}")?;

    let mut header = position_header(map);
    header.extend(["feature", "dataset", "kind", "annotations"].map(String::from));
    header.extend(feature_position_header(map));
    write_row(out, "#marker", &header)?;

    for row in rows {
        let marker = row
            .position
            .as_ref()
            .map_or(NA, |p| p.marker_id.as_str())
            .to_string();
        let mut cells = position_cells(map, row.position.as_ref());
        cells.extend(feature_cells(map, row.feature.as_ref()));
        write_row(out, &marker, &cells)?;
    }

    Ok(())
}

fn write_row<W: Write>(out: &mut W, first: &str, cells: &[String]) -> io::Result<()> {
    write!(out, "{first}")?;
    for cell in cells {
        write!(out, "\t{cell}")?;
    }
    writeln!(out)
}

fn position_header(map: &MapConfig) -> Vec<String> {
    let mut header = vec!["chr".to_string()];
    if map.has_cm {
        header.push("cm_pos".to_string());
    }
    if map.has_bp {
        header.push("bp_pos".to_string());
    }
    header.extend(["strand", "multiple", "other_alignments"].map(String::from));
    header
}

fn feature_position_header(map: &MapConfig) -> Vec<String> {
    let mut header = vec!["feature_chr".to_string()];
    if map.has_cm {
        header.push("feature_cm_pos".to_string());
    }
    if map.has_bp {
        header.push("feature_bp_pos".to_string());
    }
    header
}

/// Cells after the marker id column, absent position rendered as `-` runs
fn position_cells(map: &MapConfig, position: Option<&MapPosition>) -> Vec<String> {
    let mut cells = Vec::new();
    match position {
        Some(p) => {
            cells.push(p.chrom_name.clone());
            if map.has_cm {
                cells.push(opt_f64(p.cm_pos));
            }
            if map.has_bp {
                cells.push(opt_u64(p.bp_pos));
            }
            cells.push(p.strand.map_or_else(|| NA.to_string(), |s| s.to_string()));
            cells.push(yes_no(p.multiple).to_string());
            cells.push(yes_no(p.other_alignments).to_string());
        }
        None => cells.resize(4 + usize::from(map.has_cm) + usize::from(map.has_bp), NA.to_string()),
    }
    cells
}

fn feature_cells(map: &MapConfig, feature: Option<&FeatureRecord>) -> Vec<String> {
    let mut cells = Vec::new();
    match feature {
        Some(f) => {
            cells.push(f.feature_id.clone());
            cells.push(f.dataset_name.clone());
            cells.push(f.kind.to_string());
            cells.push(render_annotations(f));
            cells.push(f.position.chrom_name.clone());
            if map.has_cm {
                cells.push(opt_f64(f.position.cm_pos));
            }
            if map.has_bp {
                cells.push(opt_u64(f.position.bp_pos));
            }
        }
        None => cells.resize(5 + usize::from(map.has_cm) + usize::from(map.has_bp), NA.to_string()),
    }
    cells
}

fn render_annotations(feature: &FeatureRecord) -> String {
    if feature.annotations.is_empty() {
        return NA.to_string();
    }
    feature
        .annotations
        .iter()
        .map(|a| format!("{}:{}", a.kind, a.value))
        .collect::<Vec<_>>()
        .join(";")
}

fn opt_f64(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v}"))
}

fn opt_u64(value: Option<u64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feature::FeatureKind;
    use crate::core::position::UnmappedHit;
    use crate::core::types::{MapId, MapKind, SearchPolicy, SortField, Strand};

    fn bp_map() -> MapConfig {
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

    fn pos(marker: &str, bp: u64) -> MapPosition {
        MapPosition {
            marker_id: marker.to_string(),
            chrom_name: "chr1".to_string(),
            chrom_order: 1,
            cm_pos: None,
            cm_end_pos: None,
            bp_pos: Some(bp),
            bp_end_pos: Some(bp),
            strand: Some(Strand::Forward),
            multiple: false,
            other_alignments: false,
            map_name: "Reference Genome".to_string(),
        }
    }

    #[test]
    fn test_results_sections() {
        let map = bp_map();
        let results = MappingResults::new(
            vec![pos("m1", 100)],
            vec![UnmappedHit {
                marker_id: "m2".to_string(),
                contig_id: "ctg_9".to_string(),
                has_mapped_contigs: false,
            }],
            vec!["m3".to_string()],
            SortField::Bp,
            "Reference Genome".to_string(),
        );

        let mut out = Vec::new();
        write_results(&mut out, &map, &results).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(">Reference Genome\n"));
        assert!(text.contains("#marker\tchr\tbp_pos\tstrand\tmultiple\tother_alignments\n"));
        assert!(text.contains("m1\tchr1\t100\t+\tno\tno\n"));
        assert!(text.contains("##Unmapped\n"));
        assert!(text.contains("m2\tctg_9\tno\n"));
        assert!(text.contains("##Unaligned\n#marker\nm3\n"));
    }

    #[test]
    fn test_enriched_row_widths_are_uniform() {
        let map = bp_map();
        let feature = FeatureRecord {
            feature_id: "g1".to_string(),
            dataset_id: "ds".to_string(),
            dataset_name: "Genes".to_string(),
            kind: FeatureKind::Gene,
            annotations: Vec::new(),
            position: pos("g1", 105),
        };
        let rows = vec![
            EnrichedRow::position(pos("m1", 100)),
            EnrichedRow::feature(feature.clone()),
            EnrichedRow::combined(pos("m1", 100), feature),
        ];

        let mut out = Vec::new();
        write_enriched(&mut out, &map, "Reference Genome", &rows).unwrap();
        let text = String::from_utf8(out).unwrap();

        let widths: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|l| l.split('\t').count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));

        // feature-only rows keep their own coordinates visible
        assert!(text.contains("-\t-\t-\t-\t-\t-\tg1\tGenes\tgene\t-\tchr1\t105\n"));
    }
}
