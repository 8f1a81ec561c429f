//! Feature module
//!
//! Simulation-side feature data, the registry that stores it, and the
//! render-state side table owned by the drawer.

mod feature;
mod registry;
mod render_state;

pub use feature::{
    Feature, FeatureDesc, FeatureFlags, FeatureKey, DrawType, ModelType,
    TextureKey, ViewerContext,
};
pub use registry::FeatureRegistry;
pub use render_state::{
    BinKey, DrawCategory, FeatureRenderState, QuadSlot, RenderStateTable,
};
