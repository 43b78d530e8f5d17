use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::types::{SortField, Strand};

/// One resolved placement of a marker on a map.
///
/// A position carries cM and/or bp coordinates per the owning map's declared
/// capability; a missing unit sorts as -1, matching the flat-file convention
/// of the map directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPosition {
    /// Marker (query) identifier
    pub marker_id: String,

    /// Chromosome name on the map
    pub chrom_name: String,

    /// Numeric order of the chromosome, for sorting
    pub chrom_order: u32,

    /// Genetic position in centimorgans, if the map has cM
    pub cm_pos: Option<f64>,

    /// Genetic end position in centimorgans
    pub cm_end_pos: Option<f64>,

    /// Physical position in base pairs, if the map has bp
    pub bp_pos: Option<u64>,

    /// Physical end position in base pairs
    pub bp_end_pos: Option<u64>,

    /// Orientation, when the placement comes from a stranded alignment.
    /// Anchored placements take the contig's position and carry no strand.
    pub strand: Option<Strand>,

    /// The marker resolved to more than one distinct position on this map
    pub multiple: bool,

    /// The marker has other alignments that did not resolve to a map position
    pub other_alignments: bool,

    /// Name of the owning map
    pub map_name: String,
}

impl MapPosition {
    /// Primary sort coordinate for the requested sort field
    pub fn sort_pos(&self, sort_by: SortField) -> f64 {
        match sort_by {
            SortField::Cm => self.cm_pos.unwrap_or(-1.0),
            SortField::Bp => self.bp_pos.map_or(-1.0, |v| v as f64),
        }
    }

    /// End coordinate for the requested sort field
    pub fn sort_end_pos(&self, sort_by: SortField) -> f64 {
        match sort_by {
            SortField::Cm => self.cm_end_pos.unwrap_or(-1.0),
            SortField::Bp => self.bp_end_pos.map_or(-1.0, |v| v as f64),
        }
    }

    /// Secondary sort coordinate: the unit not chosen as primary
    pub fn sort_sec_pos(&self, sort_by: SortField) -> f64 {
        match sort_by {
            SortField::Cm => self.bp_pos.map_or(-1.0, |v| v as f64),
            SortField::Bp => self.cm_pos.unwrap_or(-1.0),
        }
    }

    /// Total order used for the finished map:
    /// (chromosome order, primary position, secondary position, marker id)
    pub fn map_order(&self, other: &Self, sort_by: SortField) -> Ordering {
        self.chrom_order
            .cmp(&other.chrom_order)
            .then_with(|| self.sort_pos(sort_by).total_cmp(&other.sort_pos(sort_by)))
            .then_with(|| {
                self.sort_sec_pos(sort_by)
                    .total_cmp(&other.sort_sec_pos(sort_by))
            })
            .then_with(|| self.marker_id.cmp(&other.marker_id))
    }
}

/// A hit whose contig had no entry in the map's indirection table.
///
/// Only anchored maps produce these; physical maps place every surviving hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedHit {
    /// Marker identifier
    pub marker_id: String,

    /// Contig that failed to resolve
    pub contig_id: String,

    /// The marker has at least one other contig that did resolve
    pub has_mapped_contigs: bool,
}

/// The finished map for one run: sorted positions plus the leftover streams
#[derive(Debug, Clone)]
pub struct MappingResults {
    /// Resolved positions in final map order
    pub mapped: Vec<MapPosition>,

    /// Markers with hits but no map position (anchored maps only)
    pub unmapped: Vec<UnmappedHit>,

    /// Markers with zero hits in any database
    pub unaligned: Vec<String>,

    /// Sort field the `mapped` stream is ordered by
    pub sort_by: SortField,

    /// All mapped positions fall on a single chromosome
    pub single_chromosome: bool,

    /// Name of the map these results belong to
    pub map_name: String,
}

impl MappingResults {
    pub fn new(
        mapped: Vec<MapPosition>,
        unmapped: Vec<UnmappedHit>,
        unaligned: Vec<String>,
        sort_by: SortField,
        map_name: String,
    ) -> Self {
        let single_chromosome = mapped
            .windows(2)
            .all(|w| w[0].chrom_name == w[1].chrom_name);

        Self {
            mapped,
            unmapped,
            unaligned,
            sort_by,
            single_chromosome,
            map_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(marker: &str, chrom_order: u32, cm: f64, bp: u64) -> MapPosition {
        MapPosition {
            marker_id: marker.to_string(),
            chrom_name: format!("chr{chrom_order}"),
            chrom_order,
            cm_pos: Some(cm),
            cm_end_pos: Some(cm),
            bp_pos: Some(bp),
            bp_end_pos: Some(bp),
            strand: None,
            multiple: false,
            other_alignments: false,
            map_name: "test_map".to_string(),
        }
    }

    #[test]
    fn test_map_order_primary_then_secondary() {
        let a = pos("m1", 1, 10.0, 500);
        let b = pos("m2", 1, 10.0, 100);

        // same cM, bp breaks the tie
        assert_eq!(a.map_order(&b, SortField::Cm), Ordering::Greater);
        // by bp the order flips
        assert_eq!(a.map_order(&b, SortField::Bp), Ordering::Greater.reverse());
    }

    #[test]
    fn test_map_order_marker_id_last() {
        let a = pos("m1", 1, 10.0, 100);
        let b = pos("m2", 1, 10.0, 100);
        assert_eq!(a.map_order(&b, SortField::Cm), Ordering::Less);
    }

    #[test]
    fn test_missing_unit_sorts_first() {
        let mut a = pos("m1", 1, 10.0, 100);
        a.bp_pos = None;
        assert_eq!(a.sort_pos(SortField::Bp), -1.0);
    }

    #[test]
    fn test_single_chromosome_flag() {
        let results = MappingResults::new(
            vec![pos("m1", 1, 1.0, 10), pos("m2", 1, 2.0, 20)],
            Vec::new(),
            Vec::new(),
            SortField::Bp,
            "test_map".to_string(),
        );
        assert!(results.single_chromosome);

        let results = MappingResults::new(
            vec![pos("m1", 1, 1.0, 10), pos("m2", 2, 2.0, 20)],
            Vec::new(),
            Vec::new(),
            SortField::Bp,
            "test_map".to_string(),
        );
        assert!(!results.single_chromosome);
    }
}
