//! Per-query hit reduction.
//!
//! Two policies exist, chosen by the aligner adapter that produced the hits:
//! a single-objective best-score rule for blast-like tools whose scores are
//! comparable within one database, and a two-objective (identity, coverage)
//! Pareto rule for tools where a single scalar would hide better placements.
//! Both are idempotent: re-filtering their own output is a no-op.

use std::collections::HashMap;

use crate::core::hit::AlignmentHit;

/// Keep, per query, only the hits whose score equals the per-query maximum.
/// All ties survive.
pub fn best_score(hits: Vec<AlignmentHit>) -> Vec<AlignmentHit> {
    let mut best: HashMap<String, (f64, Vec<AlignmentHit>)> = HashMap::new();

    for hit in hits {
        match best.get_mut(&hit.query_id) {
            Some((max_score, group)) => {
                if hit.score > *max_score {
                    *max_score = hit.score;
                    group.clear();
                    group.push(hit);
                } else if hit.score == *max_score {
                    group.push(hit);
                }
            }
            None => {
                best.insert(hit.query_id.clone(), (hit.score, vec![hit]));
            }
        }
    }

    best.into_values().flat_map(|(_, group)| group).collect()
}

/// Keep, per query, the Pareto frontier on (identity, coverage).
///
/// A candidate dominated by a frontier member (worse on one axis, no better
/// on the other) is discarded; a candidate dominating a member evicts it;
/// incomparable or exactly equal pairs coexist. O(n^2) per query, fine for
/// the small per-query hit counts the adapters emit.
///
/// # Panics
///
/// Panics on a dominance relation outside the four legal cases. That can only
/// happen with NaN identity or coverage, which indicates a parsing defect
/// upstream, never valid data.
pub fn pareto(hits: Vec<AlignmentHit>) -> Vec<AlignmentHit> {
    let mut frontiers: HashMap<String, Vec<AlignmentHit>> = HashMap::new();

    for hit in hits {
        let frontier = frontiers.entry(hit.query_id.clone()).or_default();

        let mut keep_candidate = true;
        let mut survivors = Vec::with_capacity(frontier.len() + 1);

        for member in frontier.drain(..) {
            let (ident, cov) = (hit.identity, hit.query_coverage);
            let (m_ident, m_cov) = (member.identity, member.query_coverage);

            if (ident <= m_ident && cov < m_cov) || (ident < m_ident && cov <= m_cov) {
                // candidate dominated: member stays, candidate is out
                keep_candidate = false;
                survivors.push(member);
            } else if ident == m_ident && cov == m_cov {
                survivors.push(member);
            } else if (ident > m_ident && cov < m_cov) || (ident < m_ident && cov > m_cov) {
                // incomparable
                survivors.push(member);
            } else if (ident >= m_ident && cov > m_cov) || (ident > m_ident && cov >= m_cov) {
                // candidate dominates: member evicted
            } else {
                panic!(
                    "impossible dominance relation between hits of query '{}': \
                     ({ident}, {cov}) vs ({m_ident}, {m_cov})",
                    hit.query_id
                );
            }
        }

        *frontier = survivors;
        if keep_candidate {
            frontier.push(hit);
        }
    }

    frontiers.into_values().flatten().collect()
}
