use crate::core::position::MapPosition;

/// A contiguous range on one chromosome, plus the positions that produced it.
///
/// Intervals are mutable only while the builder is merging into them; once
/// emitted they are read-only. Chromosomes are compared by numeric order so
/// intervals from positions and from features use the same axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInterval {
    /// Numeric chromosome order
    pub chrom: u32,

    /// Start of the range (window-padded, clamped at 0)
    pub ini_pos: f64,

    /// End of the range (window-padded)
    pub end_pos: f64,

    /// Positions contributing to this interval, in input order
    pub positions: Vec<MapPosition>,
}

impl MapInterval {
    pub fn new(chrom: u32, ini_pos: f64, end_pos: f64) -> Self {
        Self {
            chrom,
            ini_pos,
            end_pos,
            positions: Vec::new(),
        }
    }

    /// Two intervals overlap iff they are on the same chromosome and one
    /// contains the other or their ranges intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.chrom == other.chrom
            && (Self::contains(self, other)
                || Self::contains(other, self)
                || Self::intersects(self, other)
                || Self::intersects(other, self))
    }

    fn contains(a: &Self, b: &Self) -> bool {
        a.ini_pos <= b.ini_pos && a.end_pos >= b.end_pos
    }

    fn intersects(a: &Self, b: &Self) -> bool {
        a.ini_pos >= b.ini_pos && a.ini_pos <= b.end_pos
    }
}

impl std::fmt::Display for MapInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} : {} - {} : num positions {}",
            self.chrom,
            self.ini_pos,
            self.end_pos,
            self.positions.len()
        )
    }
}
