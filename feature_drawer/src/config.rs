/// Feature drawer configuration.
///
/// Read once when the drawer is created. `sanitized()` applies the
/// load-time rules: negative distances clamp to zero, the fade distance
/// never exceeds the draw distance, and a non-positive quad size or a
/// NaN distance is rejected.

use crate::error::{Error, Result};

/// Heightmap squares per draw quad side.
pub const DRAW_QUAD_SQUARES: f32 = 32.0;

/// World units per heightmap square.
pub const SQUARE_SIZE: f32 = 8.0;

/// Configuration for visibility culling and draw bucketing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDrawerConfig {
    /// Maximum distance at which features are drawn
    pub draw_distance: f32,
    /// Distance at which fading features start to fade out
    pub fade_distance: f32,
    /// Allow far features to fall back to impostors in the main pass
    pub draw_impostors: bool,
    /// World-space side length of one grid quad
    pub quad_size: f32,
    /// Per-radius draw range; `far_sq = radius^2 * unit_draw_distance^2`
    pub unit_draw_distance: f32,
    /// Added below the terrain minimum and above its maximum when
    /// bounding the frustum for the grid walk
    pub frustum_height_margin: f32,
    /// Extra cells the terrain grid walk should include around the frustum
    pub extra_cell_margin: u32,
}

impl Default for FeatureDrawerConfig {
    fn default() -> Self {
        Self {
            draw_distance: 6000.0,
            fade_distance: 4500.0,
            draw_impostors: true,
            quad_size: SQUARE_SIZE * DRAW_QUAD_SQUARES,
            unit_draw_distance: 1000.0,
            frustum_height_margin: 100.0,
            extra_cell_margin: 0,
        }
    }
}

impl FeatureDrawerConfig {
    pub fn with_draw_distance(mut self, distance: f32) -> Self {
        self.draw_distance = distance;
        self
    }

    pub fn with_fade_distance(mut self, distance: f32) -> Self {
        self.fade_distance = distance;
        self
    }

    pub fn with_impostors(mut self, enabled: bool) -> Self {
        self.draw_impostors = enabled;
        self
    }

    pub fn with_quad_size(mut self, size: f32) -> Self {
        self.quad_size = size;
        self
    }

    pub fn with_unit_draw_distance(mut self, distance: f32) -> Self {
        self.unit_draw_distance = distance;
        self
    }

    /// Squared draw distance (end of the fade window).
    pub fn sq_draw_distance(&self) -> f32 {
        self.draw_distance * self.draw_distance
    }

    /// Squared fade distance (start of the fade window).
    pub fn sq_fade_distance(&self) -> f32 {
        self.fade_distance * self.fade_distance
    }

    /// Multiplier applied to a feature's squared radius to get its far plane.
    pub fn far_plane_factor(&self) -> f32 {
        self.unit_draw_distance * self.unit_draw_distance
    }

    /// Validate and clamp the configuration.
    pub fn sanitized(mut self) -> Result<Self> {
        let distances = [
            ("draw_distance", self.draw_distance),
            ("fade_distance", self.fade_distance),
            ("unit_draw_distance", self.unit_draw_distance),
            ("frustum_height_margin", self.frustum_height_margin),
        ];
        for (name, value) in distances {
            if value.is_nan() {
                return Err(Error::InvalidConfig(format!("{} is NaN", name)));
            }
        }

        if !self.quad_size.is_finite() || self.quad_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "quad_size must be finite and > 0 (got {})", self.quad_size
            )));
        }

        if self.draw_distance < 0.0 {
            crate::fd_warn!("fdraw::Config", "draw_distance {} clamped to 0", self.draw_distance);
            self.draw_distance = 0.0;
        }
        if self.fade_distance < 0.0 {
            crate::fd_warn!("fdraw::Config", "fade_distance {} clamped to 0", self.fade_distance);
            self.fade_distance = 0.0;
        }
        if self.unit_draw_distance < 0.0 {
            crate::fd_warn!("fdraw::Config", "unit_draw_distance {} clamped to 0", self.unit_draw_distance);
            self.unit_draw_distance = 0.0;
        }
        if self.fade_distance > self.draw_distance {
            crate::fd_warn!(
                "fdraw::Config",
                "fade_distance {} clamped to draw_distance {}",
                self.fade_distance, self.draw_distance
            );
            self.fade_distance = self.draw_distance;
        }

        Ok(self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
