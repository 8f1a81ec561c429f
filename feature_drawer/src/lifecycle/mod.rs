//! Lifecycle module
//!
//! Creation, destruction, movement and restore handling for the grid
//! and render-state side table.

mod decals;
mod manager;

pub use decals::{DecalCollaborator, NoDecals};
pub use manager::{LifecycleManager, SyncStats};
