use serde::{Deserialize, Serialize};

use crate::core::position::MapPosition;

/// What kind of record a dataset contributes during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    GeneticMarker,
    Gene,
    Anchored,
    Map,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GeneticMarker => write!(f, "genetic_marker"),
            Self::Gene => write!(f, "gene"),
            Self::Anchored => write!(f, "anchored"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// One annotation attached to a gene feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    /// Annotation class (e.g. "GO", "PFAM", "description")
    pub kind: String,

    /// Annotation value
    pub value: String,
}

/// A dataset record with an already-resolved map position.
///
/// Decorates a [`MapPosition`] with dataset provenance; gene features
/// additionally carry zero-or-more annotation entries.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// Identifier of the feature within its dataset
    pub feature_id: String,

    /// Dataset identifier
    pub dataset_id: String,

    /// Human-readable dataset name
    pub dataset_name: String,

    /// Kind of record this dataset contributes
    pub kind: FeatureKind,

    /// Annotations, non-empty only for gene features
    pub annotations: Vec<AnnotationEntry>,

    /// Resolved position of the feature on the map
    pub position: MapPosition,
}

/// Tag of an [`EnrichedRow`]: which side(s) of the merge produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A resolved query position with no overlapping feature
    Position,
    /// A feature with no overlapping query position
    Feature,
    /// A query position combined with an overlapping feature (expanded view)
    Combined,
}

/// One row of the enriched map.
///
/// Absent counterparts are represented uniformly by `None`; the tag says which
/// combination is present so renderers switch once instead of probing options.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub kind: RowKind,
    pub position: Option<MapPosition>,
    pub feature: Option<FeatureRecord>,
}

impl EnrichedRow {
    pub fn position(position: MapPosition) -> Self {
        Self {
            kind: RowKind::Position,
            position: Some(position),
            feature: None,
        }
    }

    pub fn feature(feature: FeatureRecord) -> Self {
        Self {
            kind: RowKind::Feature,
            position: None,
            feature: Some(feature),
        }
    }

    pub fn combined(position: MapPosition, feature: FeatureRecord) -> Self {
        Self {
            kind: RowKind::Combined,
            position: Some(position),
            feature: Some(feature),
        }
    }
}
