use serde::{Deserialize, Serialize};

use crate::core::types::Strand;

/// One raw alignment between a query and a database subject.
///
/// Built once by an aligner adapter from a line of tool output and immutable
/// afterwards. `subject_start <= subject_end` always holds; the strand carries
/// the orientation. The score is in tool-native units and is not comparable
/// across different algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentHit {
    /// Query (marker) identifier
    pub query_id: String,

    /// Subject identifier: a chromosome for physical maps, a contig for anchored ones
    pub subject_id: String,

    /// Alignment identity, percent (0-100)
    pub identity: f64,

    /// Query coverage of the alignment, percent (0-100)
    pub query_coverage: f64,

    /// Tool-native score (bitscore for blast-like tools)
    pub score: f64,

    /// Orientation on the subject
    pub strand: Strand,

    /// Start of the alignment on the query
    pub query_start: u64,

    /// End of the alignment on the query
    pub query_end: u64,

    /// Start of the alignment on the subject (always <= `subject_end`)
    pub subject_start: u64,

    /// End of the alignment on the subject
    pub subject_end: u64,

    /// Database the subject belongs to
    pub db_id: String,

    /// Algorithm tag of the tool that produced the hit
    pub algorithm: String,
}

impl AlignmentHit {
    /// Sort key shared by all search policies: deterministic and independent
    /// of the database iteration order.
    pub fn sort_key(&self) -> (&str, &str, u64, u64) {
        (
            &self.query_id,
            &self.subject_id,
            self.subject_start,
            self.subject_end,
        )
    }
}

impl std::fmt::Display for AlignmentHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - {} - {} - {} - {} - {} - {} - {} - {} - {} - {}",
            self.query_id,
            self.subject_id,
            self.identity,
            self.query_coverage,
            self.score,
            self.strand,
            self.subject_start,
            self.subject_end,
            self.query_start,
            self.query_end,
            self.db_id,
            self.algorithm
        )
    }
}

/// Hits retained after a search, together with the queries that had none
#[derive(Debug, Clone, Default)]
pub struct AlignmentResults {
    /// Retained hits, sorted by (query, subject, subject start, subject end)
    pub aligned: Vec<AlignmentHit>,

    /// Query identifiers with zero hits across every searched database
    pub unaligned: Vec<String>,
}

impl AlignmentResults {
    pub fn new(aligned: Vec<AlignmentHit>, unaligned: Vec<String>) -> Self {
        Self { aligned, unaligned }
    }
}
