//! Visibility module
//!
//! Fade computation, terrain collaborator and the per-pass classifier.

mod fade;
mod terrain;
mod classifier;

pub use fade::{FadeCalculator, FadeResult, FadeWindow};
pub use terrain::{
    object_visible_reflection, visit_frustum_cells, FlatTerrain, GridVisibilityQuery,
    HeightfieldTerrain, TerrainCollaborator,
};
pub use classifier::{
    ClassifyContext, ClassifyParams, ClassifyStats, DrawPass, VisibilityClassifier,
};
