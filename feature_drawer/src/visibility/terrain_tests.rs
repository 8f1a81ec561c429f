/// Tests for terrain collaborators
///
/// Grid-visibility walk, heightfield lookups and the reflection test.

use glam::{Mat4, Vec3};
use crate::camera::CameraType;
use super::*;

/// Orthographic camera looking straight down at `center`, covering
/// `half_extent` world units in each direction.
fn top_down_camera(center: Vec3, half_extent: f32) -> Camera {
    let eye = center + Vec3::new(0.0, 500.0, 0.0);
    let view = Mat4::look_at_rh(eye, center, Vec3::NEG_Z);
    let proj = Mat4::orthographic_rh(-half_extent, half_extent, -half_extent, half_extent, 0.1, 2000.0);
    Camera::from_matrices(CameraType::Player, eye, view, proj)
}

fn query<'a>(camera: &'a Camera, max_distance: f32) -> GridVisibilityQuery<'a> {
    GridVisibilityQuery {
        camera,
        min_y: -100.0,
        max_y: 100.0,
        max_distance,
        cell_size: 32.0,
        extra_margin: 0,
        cells_x: 4,
        cells_y: 4,
    }
}

fn visited(terrain: &dyn TerrainCollaborator, query: &GridVisibilityQuery) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    terrain.grid_visibility(query, &mut |x, y| cells.push((x, y)));
    cells
}

// ============================================================================
// Grid visibility
// ============================================================================

#[test]
fn test_camera_covering_map_sees_every_cell() {
    let camera = top_down_camera(Vec3::new(64.0, 0.0, 64.0), 200.0);
    let cells = visited(&FlatTerrain::new(0.0), &query(&camera, 1000.0));

    assert_eq!(cells.len(), 16);
    assert!(cells.contains(&(0, 0)));
    assert!(cells.contains(&(3, 3)));
}

#[test]
fn test_narrow_camera_sees_a_corner() {
    let camera = top_down_camera(Vec3::new(16.0, 0.0, 16.0), 10.0);
    let cells = visited(&FlatTerrain::new(0.0), &query(&camera, 1000.0));

    assert_eq!(cells, vec![(0, 0)]);
}

#[test]
fn test_distance_bound_limits_cells() {
    // Eye sits above (16, 16); cells beyond 40 units horizontally drop out
    let camera = top_down_camera(Vec3::new(16.0, 0.0, 16.0), 200.0);
    let cells = visited(&FlatTerrain::new(0.0), &query(&camera, 40.0));

    assert!(cells.contains(&(0, 0)));
    assert!(cells.contains(&(1, 1)));
    assert!(!cells.contains(&(3, 3)));
    assert!(!cells.contains(&(2, 0)));
}

#[test]
fn test_camera_looking_away_sees_nothing() {
    let eye = Vec3::new(64.0, 150.0, 64.0);
    let view = Mat4::look_at_rh(eye, eye + Vec3::Y, Vec3::Z);
    let proj = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.1, 20.0);
    let camera = Camera::from_matrices(CameraType::Player, eye, view, proj);

    assert!(visited(&FlatTerrain::new(0.0), &query(&camera, 1000.0)).is_empty());
}

// ============================================================================
// Heights
// ============================================================================

#[test]
fn test_flat_terrain_heights() {
    let terrain = FlatTerrain::new(12.0);
    assert_eq!(terrain.min_height(), 12.0);
    assert_eq!(terrain.max_height(), 12.0);
    assert_eq!(terrain.approximate_height(-5.0, 1000.0), 12.0);
}

#[test]
fn test_heightfield_lookup_and_range() {
    let terrain = HeightfieldTerrain::new(vec![0.0, 5.0, -3.0, 10.0], 2, 2, 8.0).unwrap();

    assert_eq!(terrain.min_height(), -3.0);
    assert_eq!(terrain.max_height(), 10.0);
    assert_eq!(terrain.approximate_height(1.0, 1.0), 0.0);
    assert_eq!(terrain.approximate_height(9.0, 1.0), 5.0);
    assert_eq!(terrain.approximate_height(1.0, 9.0), -3.0);
    // Out of bounds clamps to the edge samples
    assert_eq!(terrain.approximate_height(100.0, 100.0), 10.0);
    assert_eq!(terrain.approximate_height(-100.0, -100.0), 0.0);
}

#[test]
fn test_heightfield_rejects_wrong_sample_count() {
    assert!(HeightfieldTerrain::new(vec![0.0; 3], 2, 2, 8.0).is_none());
    assert!(HeightfieldTerrain::new(Vec::new(), 0, 0, 8.0).is_none());
}

// ============================================================================
// Reflection
// ============================================================================

#[test]
fn test_submerged_object_uses_its_own_ground() {
    let terrain = HeightfieldTerrain::new(vec![-20.0, 50.0], 2, 1, 8.0).unwrap();
    let camera = Vec3::new(0.0, 100.0, 0.0);

    assert!(object_visible_reflection(&terrain, Vec3::new(1.0, -5.0, 1.0), camera, 10.0));
    assert!(!object_visible_reflection(&terrain, Vec3::new(9.0, -5.0, 1.0), camera, 10.0));
}

#[test]
fn test_object_above_water_uses_crossing_point() {
    // Ground is deep water for x < 8 and a hill beyond
    let terrain = HeightfieldTerrain::new(vec![-50.0, 80.0], 2, 1, 8.0).unwrap();
    let object = Vec3::new(4.0, 10.0, 0.0);

    // Camera straight above: crossing point shares the object's xz
    assert!(object_visible_reflection(&terrain, object, Vec3::new(4.0, 100.0, 0.0), 5.0));

    // Mirrored camera below the plane: the segment crosses y = 0 at x = 12
    let camera = Vec3::new(20.0, -10.0, 0.0);
    assert!(!object_visible_reflection(&terrain, object, camera, 5.0));
}

#[test]
fn test_reflection_with_level_camera() {
    let terrain = FlatTerrain::new(0.0);
    let object = Vec3::new(0.0, 10.0, 0.0);
    assert!(object_visible_reflection(&terrain, object, Vec3::new(50.0, 10.0, 0.0), 1.0));
}
