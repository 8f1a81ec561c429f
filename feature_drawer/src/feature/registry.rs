/// Simulation-side store of features.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. Creation,
/// movement and removal are recorded in pending sets that the lifecycle
/// sync drains once per frame. Removal is deferred: `remove_feature`
/// only marks the key, `commit_removals` frees it after the drawer has
/// released its grid membership.
///
/// Every mutation bumps `revision`, so readers can tell whether any
/// feature changed since they last looked.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use super::feature::{Feature, FeatureDesc, FeatureFlags, FeatureKey};

pub struct FeatureRegistry {
    features: SlotMap<FeatureKey, Feature>,
    /// Features created since the last take_new_features()
    new_features: FxHashSet<FeatureKey>,
    /// Features moved since the last take_moved_features(), with the
    /// position they had before the first move
    moved_features: FxHashMap<FeatureKey, Vec3>,
    /// Features marked for deferred removal
    removed_features: FxHashSet<FeatureKey>,
    revision: u64,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self {
            features: SlotMap::with_key(),
            new_features: FxHashSet::default(),
            moved_features: FxHashMap::default(),
            removed_features: FxHashSet::default(),
            revision: 0,
        }
    }

    /// Add a feature. The key stays valid until the removal is committed.
    pub fn create_feature(&mut self, desc: FeatureDesc) -> FeatureKey {
        let key = self.features.insert(Feature::from_desc(desc));
        self.new_features.insert(key);
        self.revision += 1;
        key
    }

    /// Mark a feature for removal. Returns false for unknown or already
    /// removed keys.
    pub fn remove_feature(&mut self, key: FeatureKey) -> bool {
        if !self.features.contains_key(key) || self.removed_features.contains(&key) {
            return false;
        }
        self.moved_features.remove(&key);
        self.new_features.remove(&key);
        self.removed_features.insert(key);
        self.revision += 1;
        true
    }

    pub fn feature(&self, key: FeatureKey) -> Option<&Feature> {
        self.features.get(key)
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.features.contains_key(key)
    }

    /// Counter bumped by every create, remove and setter call.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move a feature. Returns false if the key is invalid.
    ///
    /// Features pending removal or not yet synced are not recorded as moved.
    pub fn set_position(&mut self, key: FeatureKey, position: Vec3) -> bool {
        let Some(feature) = self.features.get_mut(key) else {
            return false;
        };
        let old = feature.position();
        feature.set_position(position);
        self.revision += 1;
        if !self.new_features.contains(&key) && !self.removed_features.contains(&key) {
            self.moved_features.entry(key).or_insert(old);
        }
        true
    }

    pub fn set_speed(&mut self, key: FeatureKey, speed: Vec3) -> bool {
        self.update(key, |feature| feature.set_speed(speed))
    }

    pub fn set_flags(&mut self, key: FeatureKey, flags: FeatureFlags) -> bool {
        self.update(key, |feature| feature.set_flags(flags))
    }

    pub fn set_los_mask(&mut self, key: FeatureKey, mask: u64) -> bool {
        self.update(key, |feature| feature.set_los_mask(mask))
    }

    fn update(&mut self, key: FeatureKey, apply: impl FnOnce(&mut Feature)) -> bool {
        match self.features.get_mut(key) {
            Some(feature) => {
                apply(feature);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Take and clear the set of newly created features.
    pub fn take_new_features(&mut self) -> FxHashSet<FeatureKey> {
        std::mem::take(&mut self.new_features)
    }

    /// Take and clear the moved features (key -> position before moving).
    pub fn take_moved_features(&mut self) -> FxHashMap<FeatureKey, Vec3> {
        std::mem::take(&mut self.moved_features)
    }

    /// Take and clear the set of features marked for removal.
    pub fn take_removed_features(&mut self) -> FxHashSet<FeatureKey> {
        std::mem::take(&mut self.removed_features)
    }

    /// Actually remove features from the SlotMap.
    pub(crate) fn commit_removals(&mut self, keys: &FxHashSet<FeatureKey>) {
        for &key in keys {
            self.features.remove(key);
        }
    }

    pub fn features(&self) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
