use serde::{Deserialize, Serialize};

/// Unique identifier for a map in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub String);

impl MapId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orientation of an alignment on the subject sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

/// Coordinate units a map can carry and sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Genetic distance in centimorgans
    Cm,
    /// Physical position in base pairs
    Bp,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cm => write!(f, "cm"),
            Self::Bp => write!(f, "bp"),
        }
    }
}

/// How the orchestrator walks the ordered database list of a map.
///
/// The string tags exist only at the configuration boundary; everything
/// downstream dispatches on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Every database is searched independently with the full query set
    Greedy,
    /// Databases are searched in order; a query stops at its first hit
    Hierarchical,
    /// Greedy search followed by a cross-database best-score pass
    BestScore,
}

impl std::fmt::Display for SearchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Hierarchical => write!(f, "hierarchical"),
            Self::BestScore => write!(f, "best_score"),
        }
    }
}

/// Whether alignment subjects are chromosome sequences or anchored contigs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// Subjects are the chromosomes themselves; hit coordinates are map coordinates
    Physical,
    /// Subjects are contigs resolved to map positions via an indirection table
    Anchored,
}

/// Size class of a reference database, used to pick the tool variant
/// (e.g. `gmap` vs `gmapl`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Std,
    Big,
}

/// Identity and coverage cutoffs applied while parsing raw tool output
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Minimum alignment identity, percent (0-100)
    pub min_identity: f64,
    /// Minimum query coverage, percent (0-100)
    pub min_coverage: f64,
}

impl Thresholds {
    pub fn new(min_identity: f64, min_coverage: f64) -> Self {
        Self {
            min_identity,
            min_coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_policy_tags() {
        let p: SearchPolicy = serde_json::from_str("\"best_score\"").unwrap();
        assert_eq!(p, SearchPolicy::BestScore);
        assert_eq!(p.to_string(), "best_score");
    }

    #[test]
    fn test_strand_display() {
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
    }
}
