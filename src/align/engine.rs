//! Per-map search policies over an ordered database list.

use std::collections::HashSet;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::align::fasta;
use crate::align::{filter, AlignerChain, AlignerError};
use crate::config::DatabasesConfig;
use crate::core::hit::{AlignmentHit, AlignmentResults};
use crate::core::types::{RefType, SearchPolicy, Thresholds};

/// Coordinates the aligner chain across the databases of one map.
///
/// Per-database failures are never fatal: they are logged and skipped, and
/// the run degrades to an empty result only when every database fails.
pub struct SearchEngine {
    chain: AlignerChain,
    policy: SearchPolicy,
    /// Reference type assumed for databases absent from the configuration
    ref_type_fallback: RefType,
}

impl SearchEngine {
    pub fn new(chain: AlignerChain, policy: SearchPolicy, ref_type_fallback: RefType) -> Self {
        Self {
            chain,
            policy,
            ref_type_fallback,
        }
    }

    /// Run the policy over `dbs` and return sorted hits plus the globally
    /// unaligned queries.
    pub fn perform(
        &mut self,
        query: &Path,
        dbs: &[String],
        databases: &DatabasesConfig,
        thresholds: Thresholds,
    ) -> Result<AlignmentResults, AlignerError> {
        info!(policy = %self.policy, databases = dbs.len(), "performing alignment");

        let mut hits = match self.policy {
            SearchPolicy::Greedy => self.align_all(query, dbs, databases, thresholds)?,
            SearchPolicy::Hierarchical => self.align_first_match(query, dbs, databases, thresholds)?,
            SearchPolicy::BestScore => {
                let all = self.align_all(query, dbs, databases, thresholds)?;
                // cross-database pass: group by query only, best score wins
                filter::best_score(all)
            }
        };

        hits.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let unaligned = unaligned_queries(query, &hits)?;

        Ok(AlignmentResults::new(hits, unaligned))
    }

    /// Independent policy: every database sees the full query set
    fn align_all(
        &mut self,
        query: &Path,
        dbs: &[String],
        databases: &DatabasesConfig,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        let mut hits = Vec::new();

        for db in dbs {
            let ref_type = databases.ref_type(db, self.ref_type_fallback);

            match self.chain.align(query, db, ref_type, thresholds) {
                Ok(db_hits) => hits.extend(db_hits),
                Err(err) => {
                    warn!(db, %err, "database search failed, continuing with next");
                }
            }
        }

        Ok(hits)
    }

    /// First-match policy: one running still-to-align file, searched through
    /// the databases in order, stopping once everything has hit somewhere.
    fn align_first_match(
        &mut self,
        query: &Path,
        dbs: &[String],
        databases: &DatabasesConfig,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        let mut hits = Vec::new();
        // current reduced file; replaced per database, deleted with the frame
        let mut running: Option<NamedTempFile> = None;

        for db in dbs {
            let ref_type = databases.ref_type(db, self.ref_type_fallback);
            let input = running.as_ref().map_or(query, NamedTempFile::path);

            // a failed intermediate database is skipped, same as greedy
            match self.chain.align(input, db, ref_type, thresholds) {
                Ok(db_hits) => hits.extend(db_hits),
                Err(err) => {
                    warn!(db, %err, "database search failed, continuing with next");
                    continue;
                }
            }

            let remaining = self.chain.unaligned();
            if remaining.is_empty() {
                break;
            }

            let keep: HashSet<String> = remaining.iter().cloned().collect();
            running = Some(fasta::write_query_subset(query, &keep, self.chain.tmp_dir())?);
        }

        Ok(hits)
    }
}

/// Queries of `query` with zero hits in `hits`, in file order
fn unaligned_queries(query: &Path, hits: &[AlignmentHit]) -> Result<Vec<String>, AlignerError> {
    let hit_queries: HashSet<&str> = hits.iter().map(|h| h.query_id.as_str()).collect();

    Ok(fasta::read_query_ids(query)?
        .into_iter()
        .filter(|q| !hit_queries.contains(q.as_str()))
        .collect())
}
