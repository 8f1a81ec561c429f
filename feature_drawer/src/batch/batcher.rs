/// Batched submission of classified features.
///
/// A pass walks model types in their fixed order, then grid cells in
/// row-major order, then texture buckets. Cells not stamped in the
/// current frame are skipped without looking at their features. Each
/// texture is bound at most once per bucket, right before the first
/// feature that is actually submitted from it. No depth sorting is done;
/// alpha-blended features draw in bucket order.

use crate::camera::{Camera, CameraType};
use crate::config::FeatureDrawerConfig;
use crate::error::Result;
use crate::feature::{
    Feature, FeatureKey, FeatureRegistry, FeatureRenderState, ModelType,
    RenderStateTable, TextureKey, ViewerContext,
};
use crate::grid::SpatialGrid;
use crate::visibility::FadeCalculator;
use super::draw_sink::FeatureDrawSink;
use super::material_override::MaterialOverride;
use super::pass_table::{disposition, Disposition, EmitPass};

/// Counters for one emitted pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassStats {
    pub cells_visited: usize,
    pub cells_skipped: usize,
    pub texture_binds: usize,
    pub features_drawn: usize,
    pub impostors_queued: usize,
    pub override_claims: usize,
    /// Tagged for the pass but rejected by the draw-time re-check
    pub features_rejected: usize,
}

/// Read-only frame state a pass consumes.
#[derive(Clone, Copy)]
pub struct EmitContext<'a> {
    pub registry: &'a FeatureRegistry,
    pub states: &'a RenderStateTable,
    pub camera: &'a Camera,
    pub viewer: &'a ViewerContext,
    /// Only cells stamped with this frame are drawn
    pub frame: u64,
}

/// Mutable state of one pass in progress.
struct PassRun<'a, 'b> {
    pass: EmitPass,
    ctx: &'a EmitContext<'a>,
    sink: &'b mut dyn FeatureDrawSink,
    overrides: &'b mut dyn MaterialOverride,
    stats: PassStats,
}

pub struct DrawBatcher {
    fade: FadeCalculator,
    sq_draw_distance: f32,
}

impl DrawBatcher {
    pub fn new(config: &FeatureDrawerConfig) -> Self {
        Self {
            fade: FadeCalculator::new(config.far_plane_factor()),
            sq_draw_distance: config.sq_draw_distance(),
        }
    }

    /// Draw-time re-check of a feature already tagged for a pass.
    ///
    /// Simulation state can change between classification and drawing,
    /// and the classifier only tests whole cells against the frustum.
    pub fn can_draw_feature(
        &self,
        feature: &Feature,
        state: &FeatureRenderState,
        camera: &Camera,
        viewer: &ViewerContext,
    ) -> bool {
        if feature.is_no_draw() || feature.is_in_void() || !feature.is_visible_to(viewer) {
            return false;
        }

        if feature.supports_fade() && camera.camera_type() != CameraType::Shadow {
            let sq_dist = feature.position().distance_squared(camera.position());
            let limit = self.fade.far_sq(feature).min(self.sq_draw_distance);
            if sq_dist >= limit {
                return false;
            }
        }

        camera.in_view(state.draw_mid_position, feature.draw_radius())
    }

    /// Emit one batched pass, then let the override layer draw what it claimed.
    pub fn emit_pass(
        &self,
        pass: EmitPass,
        grid: &SpatialGrid,
        ctx: &EmitContext,
        sink: &mut dyn FeatureDrawSink,
        overrides: &mut dyn MaterialOverride,
    ) -> Result<PassStats> {
        let mut stats = PassStats::default();
        for cell in grid.cells() {
            if cell.visited_in(ctx.frame) {
                stats.cells_visited += 1;
            } else {
                stats.cells_skipped += 1;
            }
        }

        sink.begin_pass(pass)?;

        let mut run = PassRun { pass, ctx, sink: &mut *sink, overrides: &mut *overrides, stats };
        for model_type in ModelType::ALL {
            // Shadow generation uses one program for every model format
            let push_state = pass != EmitPass::Shadow;
            // 3DO faces are clockwise and often open
            let two_sided = pass == EmitPass::Shadow && model_type.needs_two_sided_shadows();

            if push_state {
                run.sink.push_model_state(model_type)?;
            }
            if two_sided {
                run.sink.set_face_culling(false)?;
            }

            self.emit_model_type(&mut run, model_type, grid)?;

            if two_sided {
                run.sink.set_face_culling(true)?;
            }
            if push_state {
                run.sink.pop_model_state(model_type)?;
            }
        }
        let stats = run.stats;

        sink.end_pass(pass)?;
        overrides.draw_claimed(pass, sink)?;

        Ok(stats)
    }

    fn emit_model_type(&self, run: &mut PassRun, model_type: ModelType, grid: &SpatialGrid) -> Result<()> {
        for cell in grid.cells() {
            if !cell.visited_in(run.ctx.frame) {
                continue;
            }

            for (&texture, bucket) in cell.bins(model_type) {
                let mut bound = false;
                for &key in bucket.keys() {
                    self.emit_feature(run, model_type, texture, key, &mut bound)?;
                }
            }
        }
        Ok(())
    }

    fn emit_feature(
        &self,
        run: &mut PassRun,
        model_type: ModelType,
        texture: TextureKey,
        key: FeatureKey,
        bound: &mut bool,
    ) -> Result<()> {
        let ctx = run.ctx;
        let (Some(feature), Some(state)) = (ctx.registry.feature(key), ctx.states.get(key)) else {
            return Ok(());
        };

        match disposition(run.pass, state.category) {
            Disposition::Skip => return Ok(()),
            Disposition::QueueImpostor => {
                run.sink.queue_impostor(key, feature, state)?;
                run.stats.impostors_queued += 1;
                return Ok(());
            }
            Disposition::Draw => {}
        }

        if !self.can_draw_feature(feature, state, ctx.camera, ctx.viewer) {
            run.stats.features_rejected += 1;
            return Ok(());
        }
        if run.overrides.claim(key, feature, run.pass) {
            run.stats.override_claims += 1;
            return Ok(());
        }

        if !*bound {
            run.sink.bind_texture(model_type, texture)?;
            run.stats.texture_binds += 1;
            *bound = true;
        }

        match run.pass {
            EmitPass::Opaque => run.sink.set_team_colour(feature.team(), 1.0)?,
            EmitPass::Alpha => {
                run.sink.set_team_colour(feature.team(), state.opacity)?;
                run.sink.set_feature_alpha(state.opacity)?;
            }
            EmitPass::Shadow => {}
        }

        run.sink.draw_feature(key, feature, state)?;
        run.stats.features_drawn += 1;
        Ok(())
    }

    /// Draw one feature outside the batched passes, with full default
    /// state, unless the override layer draws it.
    pub fn draw_individual(
        &self,
        key: FeatureKey,
        feature: &Feature,
        state: &FeatureRenderState,
        sink: &mut dyn FeatureDrawSink,
        overrides: &mut dyn MaterialOverride,
    ) -> Result<()> {
        if overrides.draw_single(key, feature, sink)? {
            return Ok(());
        }

        sink.push_model_state(feature.model_type())?;
        sink.bind_texture(feature.model_type(), feature.texture())?;
        sink.set_team_colour(feature.team(), 1.0)?;
        sink.draw_feature(key, feature, state)?;
        sink.pop_model_state(feature.model_type())
    }
}

#[cfg(test)]
#[path = "batcher_tests.rs"]
mod tests;
