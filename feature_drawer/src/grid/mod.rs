//! Spatial grid module
//!
//! Quad partition of the map with per-cell texture buckets.

mod spatial_grid;

pub use spatial_grid::{QuadCell, SpatialGrid, TextureBins, TextureBucket};
