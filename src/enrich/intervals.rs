//! Interval construction over a sorted position list.

use tracing::debug;

use crate::core::interval::MapInterval;
use crate::core::position::MapPosition;
use crate::core::types::SortField;

/// Collapse a sorted position list into padded intervals.
///
/// Each position opens a candidate range `[pos - window, end + window]` with
/// the start clamped at zero. Consecutive candidates on the same chromosome
/// that overlap are merged into the pending interval; the merged end only
/// ever grows, the start is never retracted. The input must already be in
/// final map order.
pub fn build_intervals(
    positions: &[MapPosition],
    sort_by: SortField,
    window: f64,
) -> Vec<MapInterval> {
    let mut intervals = Vec::new();
    let mut pending: Option<MapInterval> = None;

    for position in positions {
        let ini = (position.sort_pos(sort_by) - window).max(0.0);
        let end = position.sort_end_pos(sort_by) + window;
        let mut candidate = MapInterval::new(position.chrom_order, ini, end);
        candidate.positions.push(position.clone());

        match pending.take() {
            Some(mut open) if open.overlaps(&candidate) => {
                open.end_pos = open.end_pos.max(candidate.end_pos);
                open.positions.push(position.clone());
                pending = Some(open);
            }
            Some(open) => {
                intervals.push(open);
                pending = Some(candidate);
            }
            None => pending = Some(candidate),
        }
    }

    if let Some(open) = pending {
        intervals.push(open);
    }

    debug!(
        positions = positions.len(),
        intervals = intervals.len(),
        "built enrichment intervals"
    );

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(marker: &str, chrom_order: u32, bp: u64, bp_end: u64) -> MapPosition {
        MapPosition {
            marker_id: marker.to_string(),
            chrom_name: format!("chr{chrom_order}"),
            chrom_order,
            cm_pos: None,
            cm_end_pos: None,
            bp_pos: Some(bp),
            bp_end_pos: Some(bp_end),
            strand: None,
            multiple: false,
            other_alignments: false,
            map_name: "test_map".to_string(),
        }
    }

    #[test]
    fn test_distant_positions_open_separate_intervals() {
        let positions = vec![pos("m1", 1, 100, 110), pos("m2", 1, 500, 510)];
        let intervals = build_intervals(&positions, SortField::Bp, 50.0);

        assert_eq!(intervals.len(), 2);
        assert_eq!((intervals[0].ini_pos, intervals[0].end_pos), (50.0, 160.0));
        assert_eq!((intervals[1].ini_pos, intervals[1].end_pos), (450.0, 560.0));
        assert_eq!(intervals[0].positions.len(), 1);
    }

    #[test]
    fn test_overlapping_candidates_merge_and_end_grows() {
        let positions = vec![pos("m1", 1, 100, 110), pos("m2", 1, 150, 220)];
        let intervals = build_intervals(&positions, SortField::Bp, 50.0);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].ini_pos, 50.0);
        assert_eq!(intervals[0].end_pos, 270.0);
        assert_eq!(intervals[0].positions.len(), 2);
    }

    #[test]
    fn test_contained_candidate_never_shrinks_pending_end() {
        let positions = vec![pos("m1", 1, 100, 400), pos("m2", 1, 150, 160)];
        let intervals = build_intervals(&positions, SortField::Bp, 10.0);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].end_pos, 410.0);
    }

    #[test]
    fn test_start_clamped_at_zero() {
        let positions = vec![pos("m1", 1, 5, 10)];
        let intervals = build_intervals(&positions, SortField::Bp, 50.0);

        assert_eq!(intervals[0].ini_pos, 0.0);
        assert_eq!(intervals[0].end_pos, 60.0);
    }

    #[test]
    fn test_chromosome_change_flushes() {
        let positions = vec![pos("m1", 1, 100, 110), pos("m2", 2, 100, 110)];
        let intervals = build_intervals(&positions, SortField::Bp, 50.0);

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].chrom, 1);
        assert_eq!(intervals[1].chrom, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_intervals(&[], SortField::Bp, 50.0).is_empty());
    }

    #[test]
    fn test_every_position_in_exactly_one_interval() {
        let positions = vec![
            pos("m1", 1, 100, 110),
            pos("m2", 1, 130, 140),
            pos("m3", 1, 500, 510),
            pos("m4", 2, 50, 60),
        ];
        let intervals = build_intervals(&positions, SortField::Bp, 25.0);

        let total: usize = intervals.iter().map(|i| i.positions.len()).sum();
        assert_eq!(total, positions.len());

        // adjacent emitted intervals never overlap
        for pair in intervals.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]));
        }
    }
}
