/// View frustum and the boxes tested against it.
///
/// Planes are stored as (normal, d) in a Vec4 with inward-facing unit
/// normals, so `signed_distance >= 0` means "on the visible side".

use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Column of the map above grid cell (x, y), widened by `margin` on
    /// each horizontal side and spanning `min_y..max_y` vertically.
    pub fn for_cell(x: usize, y: usize, cell_size: f32, margin: f32, min_y: f32, max_y: f32) -> Self {
        let origin = Vec3::new(x as f32 * cell_size, min_y, y as f32 * cell_size);
        Self {
            min: origin - Vec3::new(margin, 0.0, margin),
            max: Vec3::new(origin.x + cell_size + margin, max_y, origin.z + cell_size + margin),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// `other` lies entirely within `self`.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Boxes overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Squared distance from `point` to the box, ignoring height.
    pub fn horizontal_distance_sq(&self, point: Vec3) -> f32 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dz = (self.min.z - point.z).max(0.0).max(point.z - self.max.z);
        dx * dx + dz * dz
    }

    /// Corner furthest along `normal`.
    fn positive_corner(&self, normal: Vec3) -> Vec3 {
        Vec3::select(normal.cmpge(Vec3::ZERO), self.max, self.min)
    }

    /// Corner furthest against `normal`.
    fn negative_corner(&self, normal: Vec3) -> Vec3 {
        Vec3::select(normal.cmpge(Vec3::ZERO), self.min, self.max)
    }
}

/// Outcome of `Frustum::classify_aabb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    Outside,
    Inside,
    Partial,
}

/// Left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

fn signed_distance(plane: Vec4, point: Vec3) -> f32 {
    plane.xyz().dot(point) + plane.w
}

impl Frustum {
    /// Gribb-Hartmann plane extraction from the rows of `vp`.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let (r0, r1, r2, r3) = (vp.row(0), vp.row(1), vp.row(2), vp.row(3));
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2].map(|plane| {
            let length = plane.xyz().length();
            if length > 0.0 { plane / length } else { plane }
        });
        Self { planes }
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes.iter().all(|&plane| signed_distance(plane, center) >= -radius)
    }

    /// Conservative box test: false only if some plane has the whole box behind it.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes.iter()
            .all(|&plane| signed_distance(plane, aabb.positive_corner(plane.xyz())) >= 0.0)
    }

    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let mut result = FrustumTest::Inside;
        for &plane in &self.planes {
            if signed_distance(plane, aabb.positive_corner(plane.xyz())) < 0.0 {
                return FrustumTest::Outside;
            }
            if signed_distance(plane, aabb.negative_corner(plane.xyz())) < 0.0 {
                result = FrustumTest::Partial;
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
