use glam::{Mat4, Vec3};
use super::*;

fn forward_frustum(far: f32) -> Frustum {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, far);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    Frustum::from_view_projection(&(projection * view))
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_planes_are_normalized() {
    let frustum = forward_frustum(100.0);

    for plane in &frustum.planes {
        let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
        assert!((normal_len - 1.0).abs() < 1e-4, "plane normal should be unit length");
    }
}

// ============================================================================
// Frustum::intersects_aabb
// ============================================================================

#[test]
fn test_aabb_inside_frustum() {
    let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    assert!(forward_frustum(100.0).intersects_aabb(&aabb));
}

#[test]
fn test_aabb_behind_camera() {
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, 10.0), Vec3::new(1.0, 1.0, 12.0));
    assert!(!forward_frustum(100.0).intersects_aabb(&aabb));
}

#[test]
fn test_aabb_beyond_far_plane() {
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, -20.0), Vec3::new(1.0, 1.0, -18.0));
    assert!(!forward_frustum(10.0).intersects_aabb(&aabb));
}

#[test]
fn test_aabb_straddling_orthographic_boundary() {
    let frustum = Frustum::from_view_projection(
        &Mat4::orthographic_rh(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0),
    );
    let aabb = AABB::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));

    assert!(frustum.intersects_aabb(&aabb));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Partial);
}

// ============================================================================
// Frustum::intersects_sphere
// ============================================================================

#[test]
fn test_sphere_at_origin_visible() {
    assert!(forward_frustum(100.0).intersects_sphere(Vec3::ZERO, 1.0));
}

#[test]
fn test_sphere_behind_camera_culled() {
    assert!(!forward_frustum(100.0).intersects_sphere(Vec3::new(0.0, 0.0, 20.0), 1.0));
}

#[test]
fn test_large_sphere_reaches_into_frustum() {
    // center behind the camera, radius large enough to cross the near plane
    assert!(forward_frustum(100.0).intersects_sphere(Vec3::new(0.0, 0.0, 8.0), 5.0));
}

// ============================================================================
// Frustum::classify_aabb
// ============================================================================

#[test]
fn test_classify_inside_and_outside() {
    let frustum = forward_frustum(100.0);

    let small = AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5));
    assert_eq!(frustum.classify_aabb(&small), FrustumTest::Inside);

    let far_away = AABB::new(Vec3::splat(500.0), Vec3::splat(501.0));
    assert_eq!(frustum.classify_aabb(&far_away), FrustumTest::Outside);
}

// ============================================================================
// AABB
// ============================================================================

#[test]
fn test_aabb_contains_and_intersects() {
    let big = AABB::new(Vec3::splat(-10.0), Vec3::splat(10.0));
    let small = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let straddling = AABB::new(Vec3::splat(5.0), Vec3::splat(15.0));
    let disjoint = AABB::new(Vec3::splat(20.0), Vec3::splat(21.0));

    assert!(big.contains(&small));
    assert!(!big.contains(&straddling));
    assert!(big.intersects(&straddling));
    assert!(!big.intersects(&disjoint));
    assert_eq!(straddling.center(), Vec3::splat(10.0));
}

#[test]
fn test_aabb_for_cell() {
    let cell = AABB::for_cell(2, 1, 32.0, 8.0, -100.0, 50.0);

    assert_eq!(cell.min, Vec3::new(56.0, -100.0, 24.0));
    assert_eq!(cell.max, Vec3::new(104.0, 50.0, 72.0));
}

#[test]
fn test_aabb_horizontal_distance_ignores_height() {
    let cell = AABB::for_cell(0, 0, 10.0, 0.0, 0.0, 1.0);

    assert_eq!(cell.horizontal_distance_sq(Vec3::new(5.0, 900.0, 5.0)), 0.0);
    assert_eq!(cell.horizontal_distance_sq(Vec3::new(13.0, 0.0, 14.0)), 25.0);
}
