/// Per-pass visibility classification.
///
/// Walks the grid cells the terrain reports visible for a camera, stamps
/// them with the current frame and gives every feature inside a draw
/// category for the pass. Features in cells that are not visited keep
/// their old tags; the batcher skips those cells by their stamp.

use crate::camera::Camera;
use crate::config::FeatureDrawerConfig;
use crate::feature::{
    DrawCategory, Feature, FeatureRegistry, FeatureRenderState, QuadSlot,
    RenderStateTable, ViewerContext,
};
use crate::grid::SpatialGrid;
use super::fade::{FadeCalculator, FadeResult, FadeWindow};
use super::terrain::{object_visible_reflection, GridVisibilityQuery, TerrainCollaborator};

/// Rendering purpose of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawPass {
    Opaque,
    Shadow,
    Reflection,
    Refraction,
}

impl DrawPass {
    pub const COUNT: usize = 4;

    pub const fn index(self) -> usize {
        match self {
            DrawPass::Opaque => 0,
            DrawPass::Shadow => 1,
            DrawPass::Reflection => 2,
            DrawPass::Refraction => 3,
        }
    }
}

/// Inputs of one classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyParams {
    pub pass: DrawPass,
    /// Horizontal bound of the grid walk
    pub draw_distance: f32,
    pub fade: FadeWindow,
    /// Allow out-of-range features to become impostors
    pub draw_impostors: bool,
    /// Stamp written to every visited cell
    pub frame: u64,
}

/// What one classification did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifyStats {
    pub cells_visited: usize,
    pub features_tested: usize,
    /// Features per resulting category, indexed by `DrawCategory::index()`
    pub categories: [usize; DrawCategory::COUNT],
}

impl ClassifyStats {
    pub fn count(&self, category: DrawCategory) -> usize {
        self.categories[category.index()]
    }

    fn record(&mut self, category: DrawCategory) {
        self.features_tested += 1;
        self.categories[category.index()] += 1;
    }
}

/// Everything a single feature decision looks at besides the feature.
#[derive(Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub camera: &'a Camera,
    pub viewer: &'a ViewerContext,
    pub terrain: &'a dyn TerrainCollaborator,
    pub params: &'a ClassifyParams,
}

/// Tags features with per-pass draw categories.
#[derive(Debug, Clone)]
pub struct VisibilityClassifier {
    fade: FadeCalculator,
    height_margin: f32,
    extra_cell_margin: u32,
}

impl VisibilityClassifier {
    pub fn new(config: &FeatureDrawerConfig) -> Self {
        Self {
            fade: FadeCalculator::new(config.far_plane_factor()),
            height_margin: config.frustum_height_margin,
            extra_cell_margin: config.extra_cell_margin,
        }
    }

    pub fn fade_calculator(&self) -> &FadeCalculator {
        &self.fade
    }

    /// Decide the category of one feature.
    ///
    /// Returns the category and, when the fade was evaluated, the new
    /// opacity.
    pub fn categorize(
        &self,
        feature: &Feature,
        state: &FeatureRenderState,
        ctx: &ClassifyContext,
    ) -> (DrawCategory, Option<f32>) {
        if feature.is_no_draw() || feature.is_in_void() || !feature.is_visible_to(ctx.viewer) {
            return (DrawCategory::None, None);
        }

        match ctx.params.pass {
            DrawPass::Shadow => return (DrawCategory::Shadow, None),
            DrawPass::Refraction if !feature.is_in_water() => return (DrawCategory::None, None),
            DrawPass::Reflection => {
                let visible = object_visible_reflection(
                    ctx.terrain,
                    state.draw_mid_position,
                    ctx.camera.position(),
                    feature.draw_radius(),
                );
                if !visible {
                    return (DrawCategory::None, None);
                }
            }
            _ => {}
        }

        let result = self.fade.compute_opacity(feature, Some(ctx.camera), ctx.params.fade);
        let category = match result {
            FadeResult::Visible(opacity) if opacity == 1.0 => DrawCategory::Opaque,
            FadeResult::Visible(_) => DrawCategory::AlphaFade,
            // Fading features never fall back to impostors
            FadeResult::OutOfRange | FadeResult::NotEvaluated => {
                if ctx.params.draw_impostors && !feature.supports_fade() {
                    DrawCategory::Impostor
                } else {
                    DrawCategory::None
                }
            }
        };
        (category, Some(result.opacity()))
    }

    /// Classify every feature in the cells visible to the context camera.
    pub fn classify(
        &self,
        grid: &mut SpatialGrid,
        states: &mut RenderStateTable,
        registry: &FeatureRegistry,
        ctx: &ClassifyContext,
    ) -> ClassifyStats {
        let params = ctx.params;
        let query = GridVisibilityQuery {
            camera: ctx.camera,
            min_y: ctx.terrain.min_height() - self.height_margin,
            max_y: ctx.terrain.max_height() + self.height_margin,
            max_distance: params.draw_distance,
            cell_size: grid.quad_size(),
            extra_margin: self.extra_cell_margin,
            cells_x: grid.cells_x(),
            cells_y: grid.cells_y(),
        };
        let (cells_x, cells_y) = (grid.cells_x(), grid.cells_y());
        let mut stats = ClassifyStats::default();

        ctx.terrain.grid_visibility(&query, &mut |x, y| {
            if x >= cells_x || y >= cells_y {
                return;
            }
            let index = grid.linear_index(x, y);
            grid.mark_visited(index, params.frame);
            stats.cells_visited += 1;

            let Some(cell) = grid.cell(index) else {
                return;
            };
            for key in cell.features() {
                let (Some(feature), Some(state)) = (registry.feature(key), states.get_mut(key)) else {
                    continue;
                };
                debug_assert_eq!(state.quad, QuadSlot::Cell(index));

                // Reset first; set at most once below
                state.category = DrawCategory::None;
                let (category, opacity) = self.categorize(feature, state, ctx);
                state.category = category;
                if let Some(opacity) = opacity {
                    state.opacity = opacity;
                }
                stats.record(category);
            }
        });

        crate::fd_trace!(
            "fdraw::VisibilityClassifier",
            "{:?} pass, frame {}: {} cells, {} features ({} opaque, {} alpha, {} shadow, {} impostor)",
            params.pass, params.frame, stats.cells_visited, stats.features_tested,
            stats.count(DrawCategory::Opaque), stats.count(DrawCategory::AlphaFade),
            stats.count(DrawCategory::Shadow), stats.count(DrawCategory::Impostor)
        );

        stats
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
