/// Scripted material overrides.
///
/// An override layer may claim a feature during a batched pass and draw
/// it itself afterwards; the batcher then skips its own submission.

use crate::error::Result;
use crate::feature::{Feature, FeatureKey};
use super::draw_sink::FeatureDrawSink;
use super::pass_table::EmitPass;

pub trait MaterialOverride {
    /// Return true to take over drawing `feature` in `pass`.
    fn claim(&mut self, key: FeatureKey, feature: &Feature, pass: EmitPass) -> bool;

    /// Draw everything claimed during `pass`.
    fn draw_claimed(&mut self, pass: EmitPass, sink: &mut dyn FeatureDrawSink) -> Result<()>;

    /// Deferred (geometry buffer) pass for overridden materials.
    fn draw_deferred(&mut self, sink: &mut dyn FeatureDrawSink) -> Result<()>;

    /// Draw a single feature. Returns false to let the caller draw it.
    fn draw_single(&mut self, key: FeatureKey, feature: &Feature, sink: &mut dyn FeatureDrawSink) -> Result<bool>;
}

/// No scripted materials: nothing is ever claimed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMaterialOverride;

impl MaterialOverride for NoMaterialOverride {
    fn claim(&mut self, _key: FeatureKey, _feature: &Feature, _pass: EmitPass) -> bool {
        false
    }

    fn draw_claimed(&mut self, _pass: EmitPass, _sink: &mut dyn FeatureDrawSink) -> Result<()> {
        Ok(())
    }

    fn draw_deferred(&mut self, _sink: &mut dyn FeatureDrawSink) -> Result<()> {
        Ok(())
    }

    fn draw_single(&mut self, _key: FeatureKey, _feature: &Feature, _sink: &mut dyn FeatureDrawSink) -> Result<bool> {
        Ok(false)
    }
}
