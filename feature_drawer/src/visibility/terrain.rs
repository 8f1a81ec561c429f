/// Terrain collaborator used by the visibility walk.
///
/// The drawer never owns a heightmap. It asks the terrain for its height
/// range, for approximate heights (reflection test) and for the set of
/// grid cells a camera can see.

use glam::Vec3;
use crate::camera::{Camera, AABB};

/// Parameters of one grid-visibility walk.
#[derive(Debug, Clone, Copy)]
pub struct GridVisibilityQuery<'a> {
    pub camera: &'a Camera,
    /// Lowest world height to consider (terrain minimum minus margin)
    pub min_y: f32,
    /// Highest world height to consider (terrain maximum plus margin)
    pub max_y: f32,
    /// Horizontal distance bound from the camera
    pub max_distance: f32,
    /// World size of one grid cell
    pub cell_size: f32,
    /// Cells to add around the visible set
    pub extra_margin: u32,
    pub cells_x: usize,
    pub cells_y: usize,
}

/// Height and visibility queries the drawer needs from the terrain.
pub trait TerrainCollaborator {
    /// Current minimum terrain height.
    fn min_height(&self) -> f32;

    /// Current maximum terrain height.
    fn max_height(&self) -> f32;

    /// Cheap height lookup at world (x, z).
    fn approximate_height(&self, x: f32, z: f32) -> f32;

    /// Invoke `visitor(x, y)` once for every cell visible to the query camera.
    ///
    /// The default walks every cell and keeps those whose height-extended
    /// box intersects the frustum and lies within `max_distance`.
    fn grid_visibility(&self, query: &GridVisibilityQuery, visitor: &mut dyn FnMut(usize, usize)) {
        visit_frustum_cells(query, visitor);
    }
}

/// Frustum and distance test over every grid cell.
pub fn visit_frustum_cells(query: &GridVisibilityQuery, visitor: &mut dyn FnMut(usize, usize)) {
    let frustum = query.camera.frustum();
    let eye = query.camera.position();
    let margin = query.extra_margin as f32 * query.cell_size;
    let max_distance_sq = query.max_distance * query.max_distance;

    for y in 0..query.cells_y {
        for x in 0..query.cells_x {
            let bounds = AABB::for_cell(x, y, query.cell_size, margin, query.min_y, query.max_y);
            if bounds.horizontal_distance_sq(eye) > max_distance_sq {
                continue;
            }
            if frustum.intersects_aabb(&bounds) {
                visitor(x, y);
            }
        }
    }
}

/// Terrain of constant height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainCollaborator for FlatTerrain {
    fn min_height(&self) -> f32 {
        self.height
    }

    fn max_height(&self) -> f32 {
        self.height
    }

    fn approximate_height(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// Row-major height samples, one per `square_size` world units.
#[derive(Debug, Clone)]
pub struct HeightfieldTerrain {
    heights: Vec<f32>,
    width: usize,
    depth: usize,
    square_size: f32,
    min: f32,
    max: f32,
}

impl HeightfieldTerrain {
    /// Returns `None` when `heights` does not hold `width * depth` samples.
    pub fn new(heights: Vec<f32>, width: usize, depth: usize, square_size: f32) -> Option<Self> {
        if width == 0 || depth == 0 || heights.len() != width * depth {
            return None;
        }
        let min = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Some(Self { heights, width, depth, square_size, min, max })
    }
}

impl TerrainCollaborator for HeightfieldTerrain {
    fn min_height(&self) -> f32 {
        self.min
    }

    fn max_height(&self) -> f32 {
        self.max
    }

    fn approximate_height(&self, x: f32, z: f32) -> f32 {
        let sx = ((x / self.square_size).max(0.0) as usize).min(self.width - 1);
        let sz = ((z / self.square_size).max(0.0) as usize).min(self.depth - 1);
        self.heights[sz * self.width + sx]
    }
}

/// Whether an object shows up in the water reflection.
///
/// Submerged objects are visible when the terrain under them is no
/// higher than `radius`. Otherwise the point where the camera-to-object
/// segment crosses the water plane (y = 0) is tested the same way.
pub fn object_visible_reflection(
    terrain: &dyn TerrainCollaborator,
    object_position: Vec3,
    camera_position: Vec3,
    radius: f32,
) -> bool {
    if object_position.y < 0.0 {
        return terrain.approximate_height(object_position.x, object_position.z) <= radius;
    }

    let dif = object_position.y - camera_position.y;
    if dif.abs() <= f32::EPSILON {
        return terrain.approximate_height(object_position.x, object_position.z) <= radius;
    }

    let zero = camera_position * (object_position.y / dif) + object_position * (-camera_position.y / dif);
    terrain.approximate_height(zero.x, zero.z) <= radius
}

#[cfg(test)]
#[path = "terrain_tests.rs"]
mod tests;
