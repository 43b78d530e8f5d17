//! Ordered fallback across aligner adapters.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::align::fasta;
use crate::align::{Aligner, AlignerError};
use crate::core::hit::AlignmentHit;
use crate::core::types::{RefType, Thresholds};

/// Runs adapters in priority order against one database.
///
/// Each adapter only sees the queries still unaligned after the previous one,
/// via a reduced query file; the chain stops early once nothing remains
/// unaligned. Adapter failures are logged and contribute zero hits. Reduced
/// files are owned by the call frame, so they are deleted on success, on a
/// recovered failure, and on a propagating error alike.
pub struct AlignerChain {
    aligners: Vec<Box<dyn Aligner>>,
    tmp_dir: PathBuf,
    unaligned: Vec<String>,
}

impl AlignerChain {
    pub fn new(aligners: Vec<Box<dyn Aligner>>, tmp_dir: PathBuf) -> Self {
        Self {
            aligners,
            tmp_dir,
            unaligned: Vec::new(),
        }
    }

    /// Queries left without a hit by the most recent [`align`](Self::align) call
    pub fn unaligned(&self) -> &[String] {
        &self.unaligned
    }

    /// Scratch directory reduced query files are created under
    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Align the query file against `db`, accumulating hits across adapters.
    ///
    /// Errors only when the query file itself cannot be read or a reduced
    /// file cannot be written; per-adapter failures are recovered here.
    pub fn align(
        &mut self,
        query: &Path,
        db: &str,
        ref_type: RefType,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        self.unaligned = fasta::read_query_ids(query)?;

        let mut hits: Vec<AlignmentHit> = Vec::new();
        // holds the current reduced file; replaced (and thus deleted) as the
        // chain advances, dropped with the frame on any exit
        let mut reduced: Option<NamedTempFile> = None;

        for aligner in &self.aligners {
            let input = reduced.as_ref().map_or(query, NamedTempFile::path);

            let adapter_hits = match aligner.align(input, db, ref_type, thresholds) {
                Ok(adapter_hits) => adapter_hits,
                Err(err) => {
                    warn!(tool = aligner.name(), db, %err, "aligner failed, continuing with next");
                    continue;
                }
            };

            info!(
                tool = aligner.name(),
                db,
                hits = adapter_hits.len(),
                "adapter finished"
            );

            let hit_queries: HashSet<&str> =
                adapter_hits.iter().map(|h| h.query_id.as_str()).collect();
            self.unaligned.retain(|q| !hit_queries.contains(q.as_str()));

            hits.extend(adapter_hits);

            if self.unaligned.is_empty() {
                break;
            }

            let keep: HashSet<String> = self.unaligned.iter().cloned().collect();
            reduced = Some(fasta::write_query_subset(query, &keep, &self.tmp_dir)?);
        }

        Ok(hits)
    }
}
