/// Fixed-size quad partition of the map.
///
/// Each cell files its features per model type, then per texture key,
/// so the batcher binds every texture once per cell. Cells are stored
/// row-major (`index = y * cells_x + x`, with y taken from world z).
///
/// The grid is sized once from the map dimensions and only rebuilt
/// wholesale by `resize`, which drops all membership.

use std::collections::BTreeMap;
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::feature::{
    BinKey, Feature, FeatureKey, FeatureRenderState, DrawType, ModelType,
    QuadSlot, TextureKey,
};

/// Features sharing one texture in one cell.
///
/// `slots` maps each key to its index in `keys`, so removal is a
/// swap_remove plus one slot fix-up.
#[derive(Debug, Clone, Default)]
pub struct TextureBucket {
    keys: Vec<FeatureKey>,
    slots: FxHashMap<FeatureKey, usize>,
}

impl TextureBucket {
    pub fn keys(&self) -> &[FeatureKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.slots.contains_key(&key)
    }

    fn push(&mut self, key: FeatureKey) {
        if self.slots.contains_key(&key) {
            return;
        }
        self.slots.insert(key, self.keys.len());
        self.keys.push(key);
    }

    fn remove(&mut self, key: FeatureKey) -> bool {
        let Some(slot) = self.slots.remove(&key) else {
            return false;
        };
        self.keys.swap_remove(slot);
        if let Some(&moved) = self.keys.get(slot) {
            self.slots.insert(moved, slot);
        }
        true
    }
}

/// Features of one model type in one cell, bucketed by texture.
pub type TextureBins = BTreeMap<TextureKey, TextureBucket>;

/// One quad of the grid.
#[derive(Debug, Clone, Default)]
pub struct QuadCell {
    bins: [TextureBins; ModelType::COUNT],
    last_visited_frame: Option<u64>,
}

impl QuadCell {
    /// Texture bins for one model type.
    pub fn bins(&self, model_type: ModelType) -> &TextureBins {
        &self.bins[model_type.index()]
    }

    /// Frame in which the classifier last visited this cell.
    pub fn last_visited_frame(&self) -> Option<u64> {
        self.last_visited_frame
    }

    /// `true` if the cell was visited in `frame` (or later).
    pub fn visited_in(&self, frame: u64) -> bool {
        self.last_visited_frame.is_some_and(|f| f >= frame)
    }

    /// Number of features filed in this cell across all model types.
    pub fn feature_count(&self) -> usize {
        self.bins.iter()
            .flat_map(|bins| bins.values())
            .map(TextureBucket::len)
            .sum()
    }

    /// Iterate all features in this cell (model type order, then texture order).
    pub fn features(&self) -> impl Iterator<Item = FeatureKey> + '_ {
        self.bins.iter()
            .flat_map(|bins| bins.values())
            .flat_map(|bucket| bucket.keys().iter().copied())
    }

    fn contains(&self, key: FeatureKey, bin: BinKey) -> bool {
        self.bins[bin.model_type.index()]
            .get(&bin.texture)
            .is_some_and(|bucket| bucket.contains(key))
    }

    fn push(&mut self, key: FeatureKey, bin: BinKey) {
        self.bins[bin.model_type.index()]
            .entry(bin.texture)
            .or_default()
            .push(key);
    }

    fn erase(&mut self, key: FeatureKey, bin: BinKey) -> bool {
        let bins = &mut self.bins[bin.model_type.index()];
        let Some(bucket) = bins.get_mut(&bin.texture) else {
            return false;
        };
        if !bucket.remove(key) {
            return false;
        }
        if bucket.is_empty() {
            bins.remove(&bin.texture);
        }
        true
    }
}

/// Quad grid over the map.
pub struct SpatialGrid {
    cells: Vec<QuadCell>,
    cells_x: usize,
    cells_y: usize,
    quad_size: f32,
}

impl SpatialGrid {
    /// Create an empty grid with explicit dimensions.
    pub fn new(cells_x: usize, cells_y: usize, quad_size: f32) -> Self {
        let cells_x = cells_x.max(1);
        let cells_y = cells_y.max(1);
        Self {
            cells: vec![QuadCell::default(); cells_x * cells_y],
            cells_x,
            cells_y,
            quad_size,
        }
    }

    /// Create a grid covering a `map_width` x `map_height` world area.
    pub fn for_map(map_width: f32, map_height: f32, quad_size: f32) -> Result<Self> {
        let (cells_x, cells_y) = Self::dimensions_for(map_width, map_height, quad_size)?;
        Ok(Self::new(cells_x, cells_y, quad_size))
    }

    /// Grid dimensions for a map: `ceil(size / quad_size)` per axis.
    pub fn dimensions_for(map_width: f32, map_height: f32, quad_size: f32) -> Result<(usize, usize)> {
        if !(quad_size > 0.0) || !quad_size.is_finite() {
            return Err(Error::InvalidConfig(format!("quad size must be > 0 (got {})", quad_size)));
        }
        if !(map_width > 0.0 && map_height > 0.0) || !map_width.is_finite() || !map_height.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "map dimensions must be > 0 (got {}x{})", map_width, map_height
            )));
        }
        let cells_x = (map_width / quad_size).ceil() as usize;
        let cells_y = (map_height / quad_size).ceil() as usize;
        Ok((cells_x.max(1), cells_y.max(1)))
    }

    /// Rebuild the cell array. Existing membership is dropped; callers
    /// must reset their render states and re-insert.
    pub fn resize(&mut self, cells_x: usize, cells_y: usize) {
        self.cells_x = cells_x.max(1);
        self.cells_y = cells_y.max(1);
        self.cells = vec![QuadCell::default(); self.cells_x * self.cells_y];

        crate::fd_info!(
            "fdraw::SpatialGrid",
            "Grid resized to {}x{} quads ({} world units each)",
            self.cells_x, self.cells_y, self.quad_size
        );
    }

    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    pub fn cells_y(&self) -> usize {
        self.cells_y
    }

    pub fn quad_size(&self) -> f32 {
        self.quad_size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[QuadCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&QuadCell> {
        self.cells.get(index)
    }

    /// Clamped cell coordinates of a world position (x from world x, y from world z).
    pub fn cell_coords(&self, position: Vec3) -> (usize, usize) {
        let clamp_axis = |value: f32, count: usize| -> usize {
            let cell = (value / self.quad_size).floor();
            if cell <= 0.0 || cell.is_nan() {
                0
            } else {
                (cell as usize).min(count - 1)
            }
        };
        (clamp_axis(position.x, self.cells_x), clamp_axis(position.z, self.cells_y))
    }

    /// Linear cell index of a world position.
    pub fn cell_index(&self, position: Vec3) -> usize {
        let (x, y) = self.cell_coords(position);
        self.linear_index(x, y)
    }

    /// Linear index of cell coordinates.
    pub fn linear_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.cells_x && y < self.cells_y);
        y * self.cells_x + x
    }

    /// Stamp a cell as visited in `frame`.
    pub fn mark_visited(&mut self, index: usize, frame: u64) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.last_visited_frame = Some(frame);
        }
    }

    /// File a feature in the cell containing its position.
    ///
    /// Non-model features are marked `Excluded` and never indexed.
    /// A feature that is already in a cell is relocated instead.
    pub fn insert(&mut self, key: FeatureKey, feature: &Feature, state: &mut FeatureRenderState) -> QuadSlot {
        if state.quad.is_excluded() {
            return state.quad;
        }
        if feature.draw_type() != DrawType::Model {
            state.quad = QuadSlot::Excluded;
            return state.quad;
        }
        if state.quad.cell().is_some() {
            crate::fd_warn!("fdraw::SpatialGrid", "Feature {:?} inserted twice, relocating", key);
            self.relocate(key, feature, state);
            return state.quad;
        }

        let index = self.cell_index(feature.position());
        let bin = BinKey { model_type: feature.model_type(), texture: feature.texture() };
        self.cells[index].push(key, bin);
        state.quad = QuadSlot::Cell(index);
        state.bin = Some(bin);
        state.quad
    }

    /// Remove a feature from its cell and mark it unassigned.
    ///
    /// Returns false if the feature was not indexed.
    pub fn remove(&mut self, key: FeatureKey, state: &mut FeatureRenderState) -> bool {
        let (Some(index), Some(bin)) = (state.quad.cell(), state.bin) else {
            return false;
        };
        let erased = self.cells.get_mut(index).is_some_and(|cell| cell.erase(key, bin));
        debug_assert!(erased, "feature {:?} missing from its cell {}", key, index);

        state.quad = QuadSlot::Unassigned;
        state.bin = None;
        erased
    }

    /// Recompute a feature's cell from its current position.
    ///
    /// Returns true if the feature changed cells. Staying in the same
    /// cell touches no bucket.
    pub fn relocate(&mut self, key: FeatureKey, feature: &Feature, state: &mut FeatureRenderState) -> bool {
        if state.quad.is_excluded() {
            return false;
        }
        let new_index = self.cell_index(feature.position());
        if state.quad == QuadSlot::Cell(new_index) {
            return false;
        }

        self.remove(key, state);
        self.insert(key, feature, state);
        true
    }

    /// `true` if `key` is filed in cell `index` under `bin`.
    pub fn is_member(&self, key: FeatureKey, index: usize, bin: BinKey) -> bool {
        self.cells.get(index).is_some_and(|cell| cell.contains(key, bin))
    }

    /// Total number of indexed features.
    pub fn feature_count(&self) -> usize {
        self.cells.iter().map(QuadCell::feature_count).sum()
    }

    /// Drop all membership and visit stamps, keeping the dimensions.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = QuadCell::default();
        }
    }
}

#[cfg(test)]
#[path = "spatial_grid_tests.rs"]
mod tests;
