//! Command-line interface for seqplace.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **place**: Align FASTA queries and place them on one or more maps
//! - **find**: Place known identifiers from the datasets' precomputed positions
//! - **maps**: List the configured maps and their properties
//!
//! ## Usage
//!
//! ```text
//! # Place markers on a physical map with blastn
//! seqplace place markers.fasta --maps morex_genome
//!
//! # Try blastn first, then gmap on whatever is still unaligned
//! seqplace place markers.fasta --maps morex_genome --aligners blastn,gmap
//!
//! # Enrich the placements with nearby genes, 0.5 cM around each hit
//! seqplace place markers.fasta --maps pop_seq --datasets genes_hc --window 0.5
//!
//! # Look up marker identifiers without running an aligner
//! seqplace find marker_ids.txt --maps pop_seq
//!
//! # Show what maps this installation knows about
//! seqplace maps
//! ```

use clap::{Parser, Subcommand};

pub mod find;
pub mod maps;
pub mod place;

#[derive(Parser)]
#[command(name = "seqplace")]
#[command(version)]
#[command(about = "Place FASTA sequences on genetic and physical chromosome maps")]
#[command(
    long_about = "seqplace aligns query sequences against the reference databases behind a set of chromosome maps and reports where each query falls.\n\nMaps come in two flavors: physical maps, where alignment subjects are the chromosomes themselves, and anchored maps, where subjects are contigs resolved to map positions through an indirection table. Results can be enriched with markers and genes from secondary datasets found near the placements."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align queries and place them on the configured maps
    Place(place::PlaceArgs),

    /// Place identifiers using the datasets' precomputed positions
    Find(find::FindArgs),

    /// List the configured maps
    Maps(maps::MapsArgs),
}
