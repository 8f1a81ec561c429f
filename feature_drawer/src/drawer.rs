/// FeatureDrawer: per-frame entry points of the pipeline.
///
/// The drawer is an ordinary value owned by the frame orchestrator.
/// Each frame: `begin_frame`, `sync` the registry, `update` draw
/// positions, then `draw` (opaque + impostors), `draw_alpha_pass` and
/// `draw_shadow_pass` as the renderer needs them.
///
/// Tags are shared by all passes, so a classification is only reused
/// when nothing it depends on has changed since the last one.

use glam::{Mat4, Vec3};
use crate::batch::{DrawBatcher, EmitContext, EmitPass, FeatureDrawSink, MaterialOverride, PassStats};
use crate::camera::{Camera, CameraType};
use crate::config::FeatureDrawerConfig;
use crate::error::{Error, Result};
use crate::feature::{FeatureKey, FeatureRegistry, RenderStateTable, ViewerContext};
use crate::grid::SpatialGrid;
use crate::lifecycle::{DecalCollaborator, LifecycleManager, SyncStats};
use crate::visibility::{
    ClassifyContext, ClassifyParams, ClassifyStats, DrawPass, FadeWindow,
    TerrainCollaborator, VisibilityClassifier,
};

/// Water rendering state of the current draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterPass {
    #[default]
    None,
    Reflection,
    Refraction,
}

impl WaterPass {
    pub fn draw_pass(self) -> DrawPass {
        match self {
            WaterPass::None => DrawPass::Opaque,
            WaterPass::Reflection => DrawPass::Reflection,
            WaterPass::Refraction => DrawPass::Refraction,
        }
    }
}

/// Collaborators borrowed for one draw call.
pub struct DrawContext<'a> {
    pub registry: &'a FeatureRegistry,
    pub viewer: &'a ViewerContext,
    pub terrain: &'a dyn TerrainCollaborator,
    pub sink: &'a mut dyn FeatureDrawSink,
    pub overrides: &'a mut dyn MaterialOverride,
}

/// Everything a classification result depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VisibilityKey {
    frame: u64,
    camera_type: CameraType,
    pass: DrawPass,
    draw_impostors: bool,
    generation: u64,
    registry_revision: u64,
    terrain_heights: (f32, f32),
    view_projection: Mat4,
    position: Vec3,
    viewer: ViewerContext,
}

pub struct FeatureDrawer {
    config: FeatureDrawerConfig,
    lifecycle: LifecycleManager,
    classifier: VisibilityClassifier,
    batcher: DrawBatcher,
    draw_frame: u64,
    last_visibility: Option<VisibilityKey>,
    /// Frame each camera type was last classified in
    camera_frames: [Option<u64>; CameraType::COUNT],
    /// Run the override layer's deferred pass before the forward pass
    draw_deferred: bool,
}

impl FeatureDrawer {
    /// Create a drawer for a `map_width` x `map_height` world.
    pub fn new(config: FeatureDrawerConfig, map_width: f32, map_height: f32) -> Result<Self> {
        let config = config.sanitized()?;
        let grid = SpatialGrid::for_map(map_width, map_height, config.quad_size)?;

        crate::fd_info!(
            "fdraw::FeatureDrawer",
            "Created: {}x{} quads, draw distance {}, fade distance {}, impostors {}",
            grid.cells_x(), grid.cells_y(), config.draw_distance, config.fade_distance,
            config.draw_impostors
        );

        Ok(Self {
            lifecycle: LifecycleManager::new(grid, &config),
            classifier: VisibilityClassifier::new(&config),
            batcher: DrawBatcher::new(&config),
            config,
            draw_frame: 0,
            last_visibility: None,
            camera_frames: [None; CameraType::COUNT],
            draw_deferred: false,
        })
    }

    pub fn with_deferred(mut self, enabled: bool) -> Self {
        self.draw_deferred = enabled;
        self
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &FeatureDrawerConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.draw_frame
    }

    pub fn grid(&self) -> &SpatialGrid {
        self.lifecycle.grid()
    }

    pub fn states(&self) -> &RenderStateTable {
        self.lifecycle.states()
    }

    /// Frame in which `camera_type` was last classified.
    pub fn last_classified_frame(&self, camera_type: CameraType) -> Option<u64> {
        self.camera_frames[camera_type.index()]
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut LifecycleManager {
        &mut self.lifecycle
    }

    // ===== FRAME =====

    /// Advance the draw frame counter. Cells stamped in earlier frames
    /// are skipped by every pass until classified again.
    pub fn begin_frame(&mut self) -> u64 {
        self.draw_frame += 1;
        self.draw_frame
    }

    /// Apply pending registry changes to the grid.
    pub fn sync(&mut self, registry: &mut FeatureRegistry, decals: &mut dyn DecalCollaborator) -> SyncStats {
        self.lifecycle.sync(registry, decals)
    }

    /// Interpolate draw positions `time_offset` into the current simulation step.
    pub fn update(&mut self, registry: &FeatureRegistry, time_offset: f32) {
        self.lifecycle.update_draw_positions(registry, time_offset);
    }

    /// Classify features for `camera`, unless the previous classification
    /// had exactly the same inputs. Returns None when it was reused.
    pub fn update_visibility(
        &mut self,
        registry: &FeatureRegistry,
        camera: &Camera,
        viewer: &ViewerContext,
        terrain: &dyn TerrainCollaborator,
        pass: DrawPass,
        draw_impostors: bool,
    ) -> Option<ClassifyStats> {
        let key = VisibilityKey {
            frame: self.draw_frame,
            camera_type: camera.camera_type(),
            pass,
            draw_impostors,
            generation: self.lifecycle.generation(),
            registry_revision: registry.revision(),
            terrain_heights: (terrain.min_height(), terrain.max_height()),
            view_projection: camera.view_projection_matrix(),
            position: camera.position(),
            viewer: *viewer,
        };
        if self.last_visibility == Some(key) {
            crate::fd_trace!(
                "fdraw::FeatureDrawer",
                "Reusing {:?} classification for frame {}", pass, self.draw_frame
            );
            return None;
        }

        let params = ClassifyParams {
            pass,
            draw_distance: self.config.draw_distance,
            fade: FadeWindow::from_distances(self.config.fade_distance, self.config.draw_distance),
            draw_impostors,
            frame: self.draw_frame,
        };
        let ctx = ClassifyContext { camera, viewer, terrain, params: &params };
        let (grid, states) = self.lifecycle.index_mut();
        let stats = self.classifier.classify(grid, states, registry, &ctx);

        self.last_visibility = Some(key);
        self.camera_frames[camera.camera_type().index()] = Some(self.draw_frame);
        Some(stats)
    }

    fn emit(&self, pass: EmitPass, ctx: &mut DrawContext, camera: &Camera) -> Result<PassStats> {
        let emit_ctx = EmitContext {
            registry: ctx.registry,
            states: self.lifecycle.states(),
            camera,
            viewer: ctx.viewer,
            frame: self.draw_frame,
        };
        self.batcher.emit_pass(pass, self.lifecycle.grid(), &emit_ctx, &mut *ctx.sink, &mut *ctx.overrides)
            .map_err(|err| {
                crate::fd_error!("fdraw::FeatureDrawer", "{:?} pass aborted: {}", pass, err);
                err
            })
    }

    // ===== PASSES =====

    /// Main pass: classify for the active camera, run the deferred
    /// override pass (not while rendering water), draw opaque features
    /// and flush queued impostors.
    pub fn draw(&mut self, ctx: &mut DrawContext, camera: &Camera, water: WaterPass) -> Result<PassStats> {
        self.update_visibility(ctx.registry, camera, ctx.viewer, ctx.terrain, water.draw_pass(), self.config.draw_impostors);

        if self.draw_deferred && water == WaterPass::None {
            ctx.overrides.draw_deferred(&mut *ctx.sink)?;
        }

        let stats = self.emit(EmitPass::Opaque, ctx, camera)?;
        ctx.sink.flush_impostors()?;
        Ok(stats)
    }

    /// Alpha-faded features tagged by the last `draw`.
    pub fn draw_alpha_pass(&self, ctx: &mut DrawContext, camera: &Camera) -> Result<PassStats> {
        self.emit(EmitPass::Alpha, ctx, camera)
    }

    /// Shadow casters for the shadow camera. Impostors are never used here.
    pub fn draw_shadow_pass(&mut self, ctx: &mut DrawContext, shadow_camera: &Camera) -> Result<PassStats> {
        if shadow_camera.camera_type() != CameraType::Shadow {
            crate::fd_bail!(
                "fdraw::FeatureDrawer",
                "Shadow pass needs a shadow camera, got {:?}", shadow_camera.camera_type()
            );
        }

        self.update_visibility(ctx.registry, shadow_camera, ctx.viewer, ctx.terrain, DrawPass::Shadow, false);
        self.emit(EmitPass::Shadow, ctx, shadow_camera)
    }

    /// Draw one feature with full default state (UI previews, selection).
    pub fn draw_individual(&self, ctx: &mut DrawContext, key: FeatureKey) -> Result<()> {
        let feature = ctx.registry.feature(key)
            .ok_or_else(|| Error::UnknownFeature(format!("{:?}", key)))?;
        let state = self.lifecycle.states().get(key)
            .ok_or_else(|| Error::UnknownFeature(format!("{:?} has no render state", key)))?;

        self.batcher.draw_individual(key, feature, state, &mut *ctx.sink, &mut *ctx.overrides)
    }

    // ===== LOAD / SHUTDOWN =====

    /// Resize for the loaded map and re-admit every tracked feature.
    pub fn restore(&mut self, map_width: f32, map_height: f32, registry: &FeatureRegistry) -> Result<()> {
        self.lifecycle.on_restore(map_width, map_height)?;
        let inserted = self.lifecycle.rebuild(registry);
        self.last_visibility = None;

        crate::fd_info!(
            "fdraw::FeatureDrawer",
            "Restored {}x{} map, re-admitted {} features",
            map_width, map_height, inserted
        );
        Ok(())
    }

    /// Detach all decals and drop render state.
    pub fn shutdown(&mut self, decals: &mut dyn DecalCollaborator) {
        self.lifecycle.shutdown(decals);
        self.last_visibility = None;
    }
}

#[cfg(test)]
#[path = "drawer_tests.rs"]
mod tests;
