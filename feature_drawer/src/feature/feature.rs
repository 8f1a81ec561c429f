/// A static or destructible scene object as seen by the drawer.
///
/// Features are simulation entities. The drawer reads them through a
/// `FeatureRegistry` and never stores render state on them; see
/// `render_state` for the side table it owns instead.

use bitflags::bitflags;
use glam::Vec3;
use slotmap::new_key_type;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a Feature within a FeatureRegistry.
    pub struct FeatureKey;
}

/// Texture binding key used to bucket features sharing texture state.
pub type TextureKey = u32;

// ===== FLAGS =====

bitflags! {
    /// Per-feature state bits maintained by the simulation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureFlags: u32 {
        /// Never drawn by the batched pipeline
        const NO_DRAW   = 1 << 0;
        /// Outside the playable bounds
        const IN_VOID   = 1 << 1;
        /// Submerged (drawn by the refraction pass)
        const IN_WATER  = 1 << 2;
        /// Fades out with distance instead of turning into an impostor
        const ALPHA_FADE = 1 << 3;
    }
}

// ===== DRAW / MODEL TYPES =====

/// How the feature's definition wants to be drawn.
///
/// Only `Model` features take part in spatial indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawType {
    Model,
    Tree,
    None,
}

/// Model format. Batching iterates these in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelType {
    ThreeDo,
    S3o,
    Assimp,
}

impl ModelType {
    pub const COUNT: usize = 3;

    /// Fixed batching order.
    pub const ALL: [ModelType; ModelType::COUNT] = [ModelType::ThreeDo, ModelType::S3o, ModelType::Assimp];

    pub const fn index(self) -> usize {
        match self {
            ModelType::ThreeDo => 0,
            ModelType::S3o => 1,
            ModelType::Assimp => 2,
        }
    }

    /// 3DO models have clockwise-wound faces and holes.
    pub const fn needs_two_sided_shadows(self) -> bool {
        matches!(self, ModelType::ThreeDo)
    }
}

// ===== VIEWER =====

/// Who is looking: the local ally team and whether it sees everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerContext {
    pub ally_team: u32,
    pub full_view: bool,
}

impl ViewerContext {
    pub fn new(ally_team: u32) -> Self {
        Self { ally_team, full_view: false }
    }

    pub fn spectator() -> Self {
        Self { ally_team: 0, full_view: true }
    }
}

// ===== DESCRIPTOR =====

/// Creation parameters for a Feature.
#[derive(Debug, Clone)]
pub struct FeatureDesc {
    pub position: Vec3,
    /// Offset from `position` to the model's visual center
    pub mid_offset: Vec3,
    pub speed: Vec3,
    pub radius: f32,
    pub draw_radius: f32,
    pub team: u32,
    /// Bit `n` set when ally team `n` has line of sight
    pub los_mask: u64,
    pub flags: FeatureFlags,
    pub draw_type: DrawType,
    pub model_type: ModelType,
    pub texture: TextureKey,
}

impl Default for FeatureDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            mid_offset: Vec3::ZERO,
            speed: Vec3::ZERO,
            radius: 10.0,
            draw_radius: 10.0,
            team: 0,
            los_mask: u64::MAX,
            flags: FeatureFlags::empty(),
            draw_type: DrawType::Model,
            model_type: ModelType::S3o,
            texture: 0,
        }
    }
}

// ===== FEATURE =====

/// A drawable scene object.
#[derive(Debug, Clone)]
pub struct Feature {
    position: Vec3,
    mid_offset: Vec3,
    speed: Vec3,
    radius: f32,
    draw_radius: f32,
    team: u32,
    los_mask: u64,
    flags: FeatureFlags,
    draw_type: DrawType,
    model_type: ModelType,
    texture: TextureKey,
}

impl Feature {
    pub fn from_desc(desc: FeatureDesc) -> Self {
        Self {
            position: desc.position,
            mid_offset: desc.mid_offset,
            speed: desc.speed,
            radius: desc.radius,
            draw_radius: desc.draw_radius,
            team: desc.team,
            los_mask: desc.los_mask,
            flags: desc.flags,
            draw_type: desc.draw_type,
            model_type: desc.model_type,
            texture: desc.texture,
        }
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn mid_position(&self) -> Vec3 {
        self.position + self.mid_offset
    }

    pub fn speed(&self) -> Vec3 {
        self.speed
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sq_radius(&self) -> f32 {
        self.radius * self.radius
    }

    pub fn draw_radius(&self) -> f32 {
        self.draw_radius
    }

    pub fn team(&self) -> u32 {
        self.team
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn draw_type(&self) -> DrawType {
        self.draw_type
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn texture(&self) -> TextureKey {
        self.texture
    }

    pub fn supports_fade(&self) -> bool {
        self.flags.contains(FeatureFlags::ALPHA_FADE)
    }

    pub fn is_no_draw(&self) -> bool {
        self.flags.contains(FeatureFlags::NO_DRAW)
    }

    pub fn is_in_void(&self) -> bool {
        self.flags.contains(FeatureFlags::IN_VOID)
    }

    pub fn is_in_water(&self) -> bool {
        self.flags.contains(FeatureFlags::IN_WATER)
    }

    /// Line-of-sight check for one ally team (teams >= 64 never have LOS).
    pub fn is_in_los_for(&self, ally_team: u32) -> bool {
        ally_team < u64::BITS && self.los_mask & (1u64 << ally_team) != 0
    }

    /// Whether `viewer` is allowed to see this feature at all.
    pub fn is_visible_to(&self, viewer: &ViewerContext) -> bool {
        viewer.full_view || self.is_in_los_for(viewer.ally_team)
    }

    // ===== SETTERS (registry-tracked) =====

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub(crate) fn set_speed(&mut self, speed: Vec3) {
        self.speed = speed;
    }

    pub(crate) fn set_flags(&mut self, flags: FeatureFlags) {
        self.flags = flags;
    }

    pub(crate) fn set_los_mask(&mut self, mask: u64) {
        self.los_mask = mask;
    }
}

#[cfg(test)]
#[path = "feature_tests.rs"]
mod tests;
