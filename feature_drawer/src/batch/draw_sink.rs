/// Draw submission backend.
///
/// The batcher never talks to a graphics API. Everything it wants drawn
/// or any state it wants changed goes through a `FeatureDrawSink`.

use crate::error::Result;
use crate::feature::{Feature, FeatureKey, FeatureRenderState, ModelType, TextureKey};
use super::pass_table::EmitPass;

/// Receives batched draw submissions.
pub trait FeatureDrawSink {
    /// Set up global state for a pass.
    fn begin_pass(&mut self, pass: EmitPass) -> Result<()>;

    /// Restore global state after a pass.
    fn end_pass(&mut self, pass: EmitPass) -> Result<()>;

    /// Enter the render state shared by all models of one format.
    fn push_model_state(&mut self, model_type: ModelType) -> Result<()>;

    fn pop_model_state(&mut self, model_type: ModelType) -> Result<()>;

    /// Bind the texture set of a bucket.
    fn bind_texture(&mut self, model_type: ModelType, texture: TextureKey) -> Result<()>;

    /// Team colour for the next draws; `alpha` is the blend factor.
    fn set_team_colour(&mut self, team: u32, alpha: f32) -> Result<()>;

    /// Per-feature alpha state for the fade pass.
    fn set_feature_alpha(&mut self, opacity: f32) -> Result<()>;

    fn set_face_culling(&mut self, enabled: bool) -> Result<()>;

    /// Submit one feature, transformed by its draw position.
    fn draw_feature(&mut self, key: FeatureKey, feature: &Feature, state: &FeatureRenderState) -> Result<()>;

    /// Queue a feature for the impostor (far texture) renderer.
    fn queue_impostor(&mut self, key: FeatureKey, feature: &Feature, state: &FeatureRenderState) -> Result<()>;

    /// Draw every queued impostor and clear the queue.
    fn flush_impostors(&mut self) -> Result<()>;
}
