//! Merge-join of the resolved position stream with the feature stream.

use crate::core::feature::{EnrichedRow, FeatureRecord};
use crate::core::interval::MapInterval;
use crate::core::position::MapPosition;
use crate::core::types::SortField;

/// Interleave positions and features into one sorted row stream.
///
/// Both inputs must already be sorted by (chromosome order, primary
/// position). The overlap test pads each position's range by `window` on
/// both sides (start clamped at 0), the same extension the interval builder
/// used to retrieve the features, so a feature found near a marker also gets
/// attached to it. In the collapsed view overlapping records stay on
/// separate rows, the earlier one first; in the expanded view they fuse into
/// a single combined row.
pub fn merge(
    positions: Vec<MapPosition>,
    features: Vec<FeatureRecord>,
    sort_by: SortField,
    window: f64,
    collapsed: bool,
) -> Vec<EnrichedRow> {
    let mut rows = Vec::with_capacity(positions.len() + features.len());

    let mut positions = positions.into_iter().peekable();
    let mut features = features.into_iter().peekable();

    while let (Some(position), Some(feature)) = (positions.peek(), features.peek()) {
        let pos_range = padded_range(position, sort_by, window);
        let feat_range = padded_range(&feature.position, sort_by, 0.0);

        // raw coordinates decide who comes first; the padding only widens
        // the overlap test
        let pos_at = position.sort_pos(sort_by);
        let feat_at = feature.position.sort_pos(sort_by);

        if pos_range.overlaps(&feat_range) {
            if collapsed {
                if pos_at <= feat_at {
                    rows.push(EnrichedRow::position(take(&mut positions)));
                } else {
                    rows.push(EnrichedRow::feature(take(&mut features)));
                }
            } else {
                rows.push(EnrichedRow::combined(
                    take(&mut positions),
                    take(&mut features),
                ));
            }
        } else if position.chrom_order < feature.position.chrom_order
            || (position.chrom_order == feature.position.chrom_order && pos_at < feat_at)
        {
            rows.push(EnrichedRow::position(take(&mut positions)));
        } else if feature.position.chrom_order < position.chrom_order || feat_at < pos_at {
            rows.push(EnrichedRow::feature(take(&mut features)));
        } else {
            // same chromosome order and same position always overlap
            panic!(
                "non-overlapping records at identical position {pos_at} on chromosome order {}",
                position.chrom_order
            );
        }
    }

    rows.extend(positions.map(EnrichedRow::position));
    rows.extend(features.map(EnrichedRow::feature));

    rows
}

fn padded_range(position: &MapPosition, sort_by: SortField, window: f64) -> MapInterval {
    MapInterval::new(
        position.chrom_order,
        (position.sort_pos(sort_by) - window).max(0.0),
        position.sort_end_pos(sort_by) + window,
    )
}

fn take<T, I: Iterator<Item = T>>(iter: &mut std::iter::Peekable<I>) -> T {
    iter.next().unwrap_or_else(|| unreachable!("peeked item vanished"))
}
