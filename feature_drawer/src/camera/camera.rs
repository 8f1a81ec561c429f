/// Camera as seen by the drawer.
///
/// The frame orchestrator owns and moves it; the drawer reads the eye
/// position, the camera type and the frustum.

use glam::{Mat4, Vec3};
use super::frustum::Frustum;

/// Which engine camera is rendering.
///
/// Indexes the per-camera classification stamps kept by the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraType {
    /// Player view (also used for the refraction pass)
    Player,
    /// Underwater reflection camera
    Reflection,
    /// Shadow map camera
    Shadow,
}

impl CameraType {
    pub const COUNT: usize = 3;

    pub const fn index(self) -> usize {
        match self {
            CameraType::Player => 0,
            CameraType::Reflection => 1,
            CameraType::Shadow => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    camera_type: CameraType,
    position: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
}

impl Camera {
    /// Create a camera with an explicit frustum.
    pub fn new(
        camera_type: CameraType,
        position: Vec3,
        view: Mat4,
        projection: Mat4,
        frustum: Frustum,
    ) -> Self {
        Self {
            camera_type,
            position,
            view_matrix: view,
            projection_matrix: projection,
            frustum,
        }
    }

    /// Create a camera whose frustum is extracted from `projection * view`.
    pub fn from_matrices(camera_type: CameraType, position: Vec3, view: Mat4, projection: Mat4) -> Self {
        let frustum = Frustum::from_view_projection(&(projection * view));
        Self::new(camera_type, position, view, projection, frustum)
    }

    // ===== GETTERS =====

    pub fn camera_type(&self) -> CameraType {
        self.camera_type
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Sphere visibility test against the frustum.
    pub fn in_view(&self, point: Vec3, radius: f32) -> bool {
        self.frustum.intersects_sphere(point, radius)
    }

    // ===== PER-FRAME UPDATE =====

    /// Move the camera. The frustum is re-extracted from the new matrices.
    pub fn update(&mut self, position: Vec3, view: Mat4, projection: Mat4) {
        self.position = position;
        self.view_matrix = view;
        self.projection_matrix = projection;
        self.frustum = Frustum::from_view_projection(&self.view_projection_matrix());
    }

    /// Replace the frustum only (custom culling volumes, e.g. a shadow
    /// camera fitted to the visible area).
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
