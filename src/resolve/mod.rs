//! Map resolution: alignment hits to sorted map positions.

pub mod map_reader;
pub mod mapper;

pub use map_reader::{AnchorPosition, MapReader};
pub use mapper::resolve_hits;
