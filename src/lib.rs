//! # seqplace
//!
//! A library for placing query sequences on genetic and physical chromosome
//! maps.
//!
//! Given a FASTA file of markers or gene sequences, seqplace aligns them
//! against the reference databases behind each configured map and resolves
//! the hits into ordered map positions. Physical maps place a hit directly
//! from its subject coordinates; anchored maps resolve the hit's contig
//! through the map's indirection tables first.
//!
//! ## Features
//!
//! - **Aligner chaining**: Tools run in sequence, each seeing only the
//!   queries its predecessors failed to align
//! - **Search policies**: Databases searched greedily, hierarchically with
//!   early stop, or globally by best score
//! - **Hit filtering**: Per-query best-score selection and Pareto selection
//!   on (identity, coverage)
//! - **Enrichment**: Markers and genes from secondary datasets reported
//!   around each placement, with optional functional annotations
//!
//! ## Example
//!
//! ```rust,no_run
//! use seqplace::align::{AlignerChain, AlignerKind, SearchEngine};
//! use seqplace::config::{DatabasesConfig, MapsConfig, PathsConfig};
//! use seqplace::core::types::{RefType, Thresholds};
//! use seqplace::resolve::{resolve_hits, MapReader};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let paths = PathsConfig::load(Path::new("config/paths.json"))?;
//! let maps = MapsConfig::load(Path::new("config/maps.json"))?;
//! let databases = DatabasesConfig::load(Path::new("config/databases.json"))?;
//! let map = maps.get("morex_genome")?;
//!
//! let chain = AlignerChain::new(
//!     vec![AlignerKind::Blastn.build(&paths, 4, false)],
//!     paths.tmp_dir.clone(),
//! );
//! let mut engine = SearchEngine::new(chain, map.search, RefType::Std);
//! let alignment = engine.perform(
//!     Path::new("markers.fasta"),
//!     &map.db_list,
//!     &databases,
//!     Thresholds::new(98.0, 95.0),
//! )?;
//!
//! let reader = MapReader::new(&paths, map)?;
//! let results = resolve_hits(
//!     &reader,
//!     &alignment.aligned,
//!     alignment.unaligned,
//!     map.default_sort,
//!     false,
//! )?;
//! for position in &results.mapped {
//!     println!("{} -> {}", position.marker_id, position.chrom_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for hits, positions, intervals and features
//! - [`config`]: JSON configuration for paths, maps, databases and datasets
//! - [`align`]: Aligner adapters, the chain, filters and the search engine
//! - [`resolve`]: Map flat files and hit-to-position resolution
//! - [`enrich`]: Intervals, dataset lookup and the position/feature merge
//! - [`output`]: Tab-separated result rendering
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod cli;
pub mod config;
pub mod core;
pub mod enrich;
pub mod output;
pub mod resolve;

// Re-export commonly used types for convenience
pub use align::{AlignerChain, AlignerKind, SearchEngine};
pub use config::{DatabasesConfig, DatasetsConfig, MapsConfig, PathsConfig};
pub use core::hit::{AlignmentHit, AlignmentResults};
pub use core::position::{MapPosition, MappingResults};
pub use core::types::*;
pub use resolve::{resolve_hits, MapReader};
