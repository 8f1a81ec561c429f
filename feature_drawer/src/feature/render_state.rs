/// Per-feature render state owned by the drawer.
///
/// Grid membership, draw category, opacity and the interpolated draw
/// position live here, keyed by FeatureKey, so the simulation-side
/// Feature carries no render-pipeline fields.

use glam::Vec3;
use slotmap::SecondaryMap;
use super::feature::{FeatureKey, ModelType, TextureKey};

/// Grid membership of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuadSlot {
    /// Not yet placed in a cell
    #[default]
    Unassigned,
    /// Never spatially indexed (non-model draw type)
    Excluded,
    /// Linear, row-major cell index
    Cell(usize),
}

impl QuadSlot {
    pub fn cell(self) -> Option<usize> {
        match self {
            QuadSlot::Cell(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_excluded(self) -> bool {
        self == QuadSlot::Excluded
    }
}

/// Per-pass draw category, recomputed every time a pass classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawCategory {
    #[default]
    None,
    Opaque,
    AlphaFade,
    Shadow,
    Impostor,
}

impl DrawCategory {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> usize {
        match self {
            DrawCategory::None => 0,
            DrawCategory::Opaque => 1,
            DrawCategory::AlphaFade => 2,
            DrawCategory::Shadow => 3,
            DrawCategory::Impostor => 4,
        }
    }
}

/// Bucket a feature was filed under when it entered the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinKey {
    pub model_type: ModelType,
    pub texture: TextureKey,
}

/// Render-side state of one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRenderState {
    pub quad: QuadSlot,
    pub bin: Option<BinKey>,
    pub category: DrawCategory,
    /// Opacity in [0, 1]
    pub opacity: f32,
    pub draw_position: Vec3,
    pub draw_mid_position: Vec3,
}

impl FeatureRenderState {
    pub fn new(position: Vec3, mid_position: Vec3) -> Self {
        Self {
            quad: QuadSlot::Unassigned,
            bin: None,
            category: DrawCategory::None,
            opacity: 0.0,
            draw_position: position,
            draw_mid_position: mid_position,
        }
    }
}

/// Side table FeatureKey -> FeatureRenderState.
pub struct RenderStateTable {
    states: SecondaryMap<FeatureKey, FeatureRenderState>,
}

impl RenderStateTable {
    pub fn new() -> Self {
        Self { states: SecondaryMap::new() }
    }

    pub fn insert(&mut self, key: FeatureKey, state: FeatureRenderState) -> Option<FeatureRenderState> {
        self.states.insert(key, state)
    }

    pub fn remove(&mut self, key: FeatureKey) -> Option<FeatureRenderState> {
        self.states.remove(key)
    }

    pub fn get(&self, key: FeatureKey) -> Option<&FeatureRenderState> {
        self.states.get(key)
    }

    pub fn get_mut(&mut self, key: FeatureKey) -> Option<&mut FeatureRenderState> {
        self.states.get_mut(key)
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.states.contains_key(key)
    }

    /// Draw category of a feature (None for unknown keys).
    pub fn category(&self, key: FeatureKey) -> DrawCategory {
        self.states.get(key).map_or(DrawCategory::None, |s| s.category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, &FeatureRenderState)> {
        self.states.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FeatureKey, &mut FeatureRenderState)> {
        self.states.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for RenderStateTable {
    fn default() -> Self {
        Self::new()
    }
}
