//! Enrichment: intervals around mapped positions, dataset lookup, and the
//! merge of both streams into the final row list.

pub mod datasets;
pub mod intervals;
pub mod merger;

pub use datasets::{collect_features, locate_ids};
pub use intervals::build_intervals;
pub use merger::merge;
