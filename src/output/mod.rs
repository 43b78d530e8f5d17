//! Result rendering.

pub mod tsv;

pub use tsv::{write_enriched, write_leftovers, write_results};
