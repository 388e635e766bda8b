//! Spatial structures rebuilt every frame.
//!
//! - grid        - uniform cell grid, counting-sort reorder of particles
//! - density     - coarse water-density histogram
//! - brush_grid  - bucket grid over brush particles for collision lookup

pub mod brush_grid;
pub mod density;
pub mod grid;

pub use brush_grid::BrushGrid;
pub use density::DensityField;
pub use grid::SpatialGrid;
