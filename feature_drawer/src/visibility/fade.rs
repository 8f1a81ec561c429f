/// Distance-based opacity for features that fade out.
///
/// Fading happens in squared-distance space. A feature's own far plane
/// (`radius^2 * unit_draw_distance^2`) caps the fade window; past it the
/// feature is out of range.

use crate::camera::Camera;
use crate::feature::Feature;

/// Squared-distance interval `[begin_sq, end_sq)` over which opacity
/// drops linearly from 1 to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeWindow {
    pub begin_sq: f32,
    pub end_sq: f32,
}

impl FadeWindow {
    pub fn new(begin_sq: f32, end_sq: f32) -> Self {
        Self { begin_sq, end_sq }
    }

    /// Window from plain (non-squared) fade and draw distances.
    pub fn from_distances(fade_distance: f32, draw_distance: f32) -> Self {
        Self::new(fade_distance * fade_distance, draw_distance * draw_distance)
    }

    /// Cap the window at `far_sq`, keeping the begin/end ratio.
    pub fn clamped_to(self, far_sq: f32) -> Self {
        if far_sq >= self.end_sq {
            return self;
        }
        let ratio = if self.end_sq > 0.0 { self.begin_sq / self.end_sq } else { 0.0 };
        Self {
            begin_sq: far_sq * ratio,
            end_sq: far_sq,
        }
    }
}

/// Outcome of an opacity computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeResult {
    /// Evaluated and drawable with this opacity
    Visible(f32),
    /// Past the fade window or the feature's own far plane
    OutOfRange,
    /// No camera was supplied (bookkeeping path)
    NotEvaluated,
}

impl FadeResult {
    /// Opacity to store; 0 for anything not visible.
    pub fn opacity(self) -> f32 {
        match self {
            FadeResult::Visible(opacity) => opacity,
            FadeResult::OutOfRange | FadeResult::NotEvaluated => 0.0,
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, FadeResult::Visible(_))
    }
}

/// Computes per-feature opacity against a camera.
#[derive(Debug, Clone, Copy)]
pub struct FadeCalculator {
    far_plane_factor: f32,
}

impl FadeCalculator {
    /// `far_plane_factor` is `unit_draw_distance^2`.
    pub fn new(far_plane_factor: f32) -> Self {
        Self { far_plane_factor }
    }

    pub fn far_plane_factor(&self) -> f32 {
        self.far_plane_factor
    }

    /// Squared distance beyond which a fading feature is out of range.
    pub fn far_sq(&self, feature: &Feature) -> f32 {
        feature.sq_radius() * self.far_plane_factor
    }

    pub fn compute_opacity(&self, feature: &Feature, camera: Option<&Camera>, window: FadeWindow) -> FadeResult {
        let Some(camera) = camera else {
            return if feature.supports_fade() {
                FadeResult::NotEvaluated
            } else {
                FadeResult::Visible(1.0)
            };
        };

        if !feature.supports_fade() {
            return FadeResult::Visible(1.0);
        }

        let sq_dist = feature.position().distance_squared(camera.position());
        let far_sq = self.far_sq(feature);
        if sq_dist >= far_sq {
            return FadeResult::OutOfRange;
        }

        let window = window.clamped_to(far_sq);
        if sq_dist < window.begin_sq {
            FadeResult::Visible(1.0)
        } else if sq_dist < window.end_sq {
            let t = (sq_dist - window.begin_sq) / (window.end_sq - window.begin_sq);
            FadeResult::Visible((1.0 - t).clamp(0.0, 1.0))
        } else {
            FadeResult::OutOfRange
        }
    }
}

#[cfg(test)]
#[path = "fade_tests.rs"]
mod tests;
