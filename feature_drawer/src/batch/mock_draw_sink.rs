/// Recording draw sink for unit tests (no graphics backend required).
///
/// Every call is appended to `commands` so tests can assert on the exact
/// submission order. `fail_on_draw` makes `draw_feature` return an error.

use crate::error::{Error, Result};
use crate::feature::{Feature, FeatureKey, FeatureRenderState, ModelType, TextureKey};
use super::draw_sink::FeatureDrawSink;
use super::material_override::MaterialOverride;
use super::pass_table::EmitPass;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCommand {
    BeginPass(EmitPass),
    EndPass(EmitPass),
    PushModelState(ModelType),
    PopModelState(ModelType),
    BindTexture(ModelType, TextureKey),
    TeamColour(u32, f32),
    FeatureAlpha(f32),
    FaceCulling(bool),
    Draw(FeatureKey),
    QueueImpostor(FeatureKey),
    FlushImpostors,
}

#[derive(Debug, Default)]
pub struct MockDrawSink {
    pub commands: Vec<SinkCommand>,
    pub fail_on_draw: bool,
}

impl MockDrawSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys passed to `draw_feature`, in order.
    pub fn drawn(&self) -> Vec<FeatureKey> {
        self.commands.iter()
            .filter_map(|c| match c {
                SinkCommand::Draw(key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&SinkCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl FeatureDrawSink for MockDrawSink {
    fn begin_pass(&mut self, pass: EmitPass) -> Result<()> {
        self.commands.push(SinkCommand::BeginPass(pass));
        Ok(())
    }

    fn end_pass(&mut self, pass: EmitPass) -> Result<()> {
        self.commands.push(SinkCommand::EndPass(pass));
        Ok(())
    }

    fn push_model_state(&mut self, model_type: ModelType) -> Result<()> {
        self.commands.push(SinkCommand::PushModelState(model_type));
        Ok(())
    }

    fn pop_model_state(&mut self, model_type: ModelType) -> Result<()> {
        self.commands.push(SinkCommand::PopModelState(model_type));
        Ok(())
    }

    fn bind_texture(&mut self, model_type: ModelType, texture: TextureKey) -> Result<()> {
        self.commands.push(SinkCommand::BindTexture(model_type, texture));
        Ok(())
    }

    fn set_team_colour(&mut self, team: u32, alpha: f32) -> Result<()> {
        self.commands.push(SinkCommand::TeamColour(team, alpha));
        Ok(())
    }

    fn set_feature_alpha(&mut self, opacity: f32) -> Result<()> {
        self.commands.push(SinkCommand::FeatureAlpha(opacity));
        Ok(())
    }

    fn set_face_culling(&mut self, enabled: bool) -> Result<()> {
        self.commands.push(SinkCommand::FaceCulling(enabled));
        Ok(())
    }

    fn draw_feature(&mut self, key: FeatureKey, _feature: &Feature, _state: &FeatureRenderState) -> Result<()> {
        if self.fail_on_draw {
            return Err(Error::BackendError("mock draw failure".to_string()));
        }
        self.commands.push(SinkCommand::Draw(key));
        Ok(())
    }

    fn queue_impostor(&mut self, key: FeatureKey, _feature: &Feature, _state: &FeatureRenderState) -> Result<()> {
        self.commands.push(SinkCommand::QueueImpostor(key));
        Ok(())
    }

    fn flush_impostors(&mut self) -> Result<()> {
        self.commands.push(SinkCommand::FlushImpostors);
        Ok(())
    }
}

/// Override layer that claims a fixed set of features.
#[derive(Debug, Default)]
pub struct MockOverride {
    pub claimable: Vec<FeatureKey>,
    pub claimed: Vec<(EmitPass, FeatureKey)>,
    /// Passes whose claimed features were drawn
    pub claimed_passes: Vec<EmitPass>,
    pub deferred_runs: usize,
    pub single_draws: Vec<FeatureKey>,
}

impl MockOverride {
    pub fn claiming(keys: Vec<FeatureKey>) -> Self {
        Self { claimable: keys, ..Default::default() }
    }
}

impl MaterialOverride for MockOverride {
    fn claim(&mut self, key: FeatureKey, _feature: &Feature, pass: EmitPass) -> bool {
        if self.claimable.contains(&key) {
            self.claimed.push((pass, key));
            return true;
        }
        false
    }

    fn draw_claimed(&mut self, pass: EmitPass, _sink: &mut dyn FeatureDrawSink) -> Result<()> {
        self.claimed_passes.push(pass);
        Ok(())
    }

    fn draw_deferred(&mut self, _sink: &mut dyn FeatureDrawSink) -> Result<()> {
        self.deferred_runs += 1;
        Ok(())
    }

    fn draw_single(&mut self, key: FeatureKey, _feature: &Feature, _sink: &mut dyn FeatureDrawSink) -> Result<bool> {
        if self.claimable.contains(&key) {
            self.single_draws.push(key);
            return Ok(true);
        }
        Ok(false)
    }
}
