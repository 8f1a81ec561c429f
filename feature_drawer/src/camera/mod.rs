//! Camera and frustum collaborators.
//!
//! Passive data containers owned and driven by the caller. The drawer
//! reads camera position and type and runs frustum tests.

mod camera;
mod frustum;

pub use camera::{Camera, CameraType};
pub use frustum::{AABB, Frustum, FrustumTest};
