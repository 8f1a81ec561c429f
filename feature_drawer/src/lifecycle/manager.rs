/// Keeps grid membership and render state in step with the registry.
///
/// The manager owns the spatial grid and the render-state side table.
/// Every change that can alter a classification result bumps
/// `generation`, which the drawer folds into its visibility cache key.

use glam::Vec3;
use crate::config::FeatureDrawerConfig;
use crate::error::{Error, Result};
use crate::feature::{FeatureKey, FeatureRegistry, FeatureRenderState, QuadSlot, RenderStateTable};
use crate::grid::SpatialGrid;
use crate::visibility::{FadeCalculator, FadeWindow};
use super::decals::DecalCollaborator;

/// What one `sync` call processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub created: usize,
    pub destroyed: usize,
    pub moved: usize,
    /// Moves that changed cells
    pub relocated: usize,
}

pub struct LifecycleManager {
    grid: SpatialGrid,
    states: RenderStateTable,
    fade: FadeCalculator,
    generation: u64,
}

impl LifecycleManager {
    pub fn new(grid: SpatialGrid, config: &FeatureDrawerConfig) -> Self {
        Self {
            grid,
            states: RenderStateTable::new(),
            fade: FadeCalculator::new(config.far_plane_factor()),
            generation: 0,
        }
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn states(&self) -> &RenderStateTable {
        &self.states
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Grid and side table, borrowed together for classification.
    pub(crate) fn index_mut(&mut self) -> (&mut SpatialGrid, &mut RenderStateTable) {
        (&mut self.grid, &mut self.states)
    }

    /// Admit a new feature: bookkeeping opacity, then grid insertion.
    pub fn on_create(&mut self, key: FeatureKey, registry: &FeatureRegistry) -> Result<QuadSlot> {
        let feature = registry.feature(key)
            .ok_or_else(|| Error::UnknownFeature(format!("{:?}", key)))?;

        if let Some(state) = self.states.get(key) {
            crate::fd_warn!("fdraw::LifecycleManager", "Feature {:?} created twice, ignoring", key);
            return Ok(state.quad);
        }

        let mut state = FeatureRenderState::new(feature.position(), feature.mid_position());
        state.opacity = self.fade.compute_opacity(feature, None, FadeWindow::new(0.0, 0.0)).opacity();
        let slot = self.grid.insert(key, feature, &mut state);
        self.states.insert(key, state);
        self.generation += 1;
        Ok(slot)
    }

    /// Drop a feature from the grid and detach its decals.
    ///
    /// Returns false if the feature was never admitted.
    pub fn on_destroy(&mut self, key: FeatureKey, decals: &mut dyn DecalCollaborator) -> bool {
        let Some(mut state) = self.states.remove(key) else {
            crate::fd_warn!("fdraw::LifecycleManager", "Destroying unknown feature {:?}", key);
            return false;
        };
        self.grid.remove(key, &mut state);
        decals.detach(key);
        self.generation += 1;
        true
    }

    /// Refile a moved feature. Returns true if it changed cells.
    pub fn on_move(&mut self, key: FeatureKey, registry: &FeatureRegistry, old_position: Vec3) -> Result<bool> {
        let feature = registry.feature(key)
            .ok_or_else(|| Error::UnknownFeature(format!("{:?}", key)))?;
        let state = self.states.get_mut(key)
            .ok_or_else(|| Error::UnknownFeature(format!("{:?} has no render state", key)))?;

        let relocated = self.grid.relocate(key, feature, state);
        self.generation += 1;

        if relocated {
            crate::fd_trace!(
                "fdraw::LifecycleManager",
                "Feature {:?} moved {:?} -> {:?}, now in {:?}",
                key, old_position, feature.position(), state.quad
            );
        }
        Ok(relocated)
    }

    /// Resize the grid for new map dimensions after a load.
    ///
    /// Membership is not preserved: every indexed feature goes back to
    /// `Unassigned` and must be re-admitted (see `rebuild`).
    pub fn on_restore(&mut self, map_width: f32, map_height: f32) -> Result<()> {
        let (cells_x, cells_y) = SpatialGrid::dimensions_for(map_width, map_height, self.grid.quad_size())?;
        self.grid.resize(cells_x, cells_y);

        for (_, state) in self.states.iter_mut() {
            if !state.quad.is_excluded() {
                state.quad = QuadSlot::Unassigned;
                state.bin = None;
            }
        }
        self.generation += 1;
        Ok(())
    }

    /// Re-insert every tracked feature into the grid.
    pub fn rebuild(&mut self, registry: &FeatureRegistry) -> usize {
        let mut inserted = 0;
        for (key, state) in self.states.iter_mut() {
            let Some(feature) = registry.feature(key) else {
                continue;
            };
            if state.quad == QuadSlot::Unassigned {
                self.grid.insert(key, feature, state);
                inserted += 1;
            }
        }
        self.generation += 1;
        inserted
    }

    /// Drain the registry's pending sets: removals first, then creations,
    /// then moves.
    pub fn sync(&mut self, registry: &mut FeatureRegistry, decals: &mut dyn DecalCollaborator) -> SyncStats {
        let mut stats = SyncStats::default();

        let removed = registry.take_removed_features();
        for &key in &removed {
            if !self.states.contains(key) {
                crate::fd_debug!("fdraw::LifecycleManager", "Feature {:?} removed before it was admitted", key);
                continue;
            }
            if self.on_destroy(key, decals) {
                stats.destroyed += 1;
            }
        }
        registry.commit_removals(&removed);

        for key in registry.take_new_features() {
            match self.on_create(key, registry) {
                Ok(_) => stats.created += 1,
                Err(err) => crate::fd_warn!("fdraw::LifecycleManager", "Skipping creation: {}", err),
            }
        }

        for (key, old_position) in registry.take_moved_features() {
            match self.on_move(key, registry, old_position) {
                Ok(relocated) => {
                    stats.moved += 1;
                    stats.relocated += usize::from(relocated);
                }
                Err(err) => crate::fd_warn!("fdraw::LifecycleManager", "Skipping move: {}", err),
            }
        }

        stats
    }

    /// Interpolate draw positions `time_offset` into the current
    /// simulation step and reset opacity to its bookkeeping value.
    pub fn update_draw_positions(&mut self, registry: &FeatureRegistry, time_offset: f32) {
        for (key, state) in self.states.iter_mut() {
            if state.quad.is_excluded() {
                continue;
            }
            let Some(feature) = registry.feature(key) else {
                continue;
            };
            let offset = feature.speed() * time_offset;
            state.draw_position = feature.position() + offset;
            state.draw_mid_position = feature.mid_position() + offset;
            state.opacity = self.fade.compute_opacity(feature, None, FadeWindow::new(0.0, 0.0)).opacity();
        }
        self.generation += 1;
    }

    /// Detach every feature's decals and drop all render state.
    pub fn shutdown(&mut self, decals: &mut dyn DecalCollaborator) {
        for (key, _) in self.states.iter() {
            decals.detach(key);
        }
        self.states = RenderStateTable::new();
        self.grid.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
