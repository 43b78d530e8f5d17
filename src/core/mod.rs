//! Core data types for map placement.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`AlignmentHit`]: one raw hit produced by an aligner adapter
//! - [`MapPosition`], [`MappingResults`]: resolved placements and the finished map
//! - [`FeatureRecord`], [`EnrichedRow`]: secondary dataset records and merge output
//! - [`MapInterval`]: window-padded ranges used by the enrichment stages
//! - [`Strand`], [`SortField`], [`SearchPolicy`], [`MapKind`]: closed tag types
//!
//! String tags for policies and kinds live only at the configuration boundary;
//! internally everything dispatches on these enums.
//!
//! [`AlignmentHit`]: hit::AlignmentHit
//! [`MapPosition`]: position::MapPosition
//! [`MappingResults`]: position::MappingResults
//! [`FeatureRecord`]: feature::FeatureRecord
//! [`EnrichedRow`]: feature::EnrichedRow
//! [`MapInterval`]: interval::MapInterval
//! [`Strand`]: types::Strand
//! [`SortField`]: types::SortField
//! [`SearchPolicy`]: types::SearchPolicy
//! [`MapKind`]: types::MapKind

pub mod feature;
pub mod hit;
pub mod interval;
pub mod position;
pub mod types;
