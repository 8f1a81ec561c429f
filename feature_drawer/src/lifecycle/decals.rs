/// Ground decal collaborator.
///
/// Features can leave decals (tracks, footprints) on the ground; those
/// must be detached when the feature goes away.

use crate::feature::FeatureKey;

pub trait DecalCollaborator {
    /// Forget any decal tied to `key`.
    fn detach(&mut self, key: FeatureKey);
}

/// No decal system.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecals;

impl DecalCollaborator for NoDecals {
    fn detach(&mut self, _key: FeatureKey) {}
}
