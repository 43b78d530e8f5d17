//! Alignment orchestration: adapters, per-query filtering, the aligner
//! chain, and the per-map search policies.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub mod aligners;
pub mod chain;
pub mod engine;
pub mod fasta;
pub mod filter;

pub use aligners::{Aligner, AlignerKind};
pub use chain::AlignerChain;
pub use engine::SearchEngine;

/// Failures around one external aligner invocation.
///
/// These are expected, recoverable conditions: the chain and the search
/// policies branch on them (warn, contribute zero hits, continue) instead of
/// aborting the run. Only [`AlignerError::InvalidOutput`] indicates something
/// that should reach the operator loudly, since it means the installed tool
/// no longer speaks the grammar this crate parses.
#[derive(Error, Debug)]
pub enum AlignerError {
    #[error("database '{db}' for {tool} not found at {path}")]
    DatabaseNotFound {
        tool: &'static str,
        db: String,
        path: PathBuf,
    },

    #[error("{tool} failed with {status}: {detail}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
        detail: String,
    },

    #[error("invalid {tool} output: {message}")]
    InvalidOutput {
        tool: &'static str,
        message: String,
    },

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
