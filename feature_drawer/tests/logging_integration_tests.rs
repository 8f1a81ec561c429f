//! Integration tests for drawer logging
//!
//! These tests swap the process-wide logger for a capturing one and check
//! what the drawer reports while it runs.
//!
//! Run with: cargo test --test logging_integration_tests

use feature_drawer::fdraw::{DrawContext, Error, FeatureDrawer, FeatureDrawerConfig, Result};
use feature_drawer::fdraw::batch::{EmitPass, FeatureDrawSink, NoMaterialOverride};
use feature_drawer::fdraw::camera::{Camera, CameraType};
use feature_drawer::fdraw::feature::{
    Feature, FeatureDesc, FeatureKey, FeatureRegistry, FeatureRenderState, ModelType,
    TextureKey, ViewerContext,
};
use feature_drawer::fdraw::lifecycle::NoDecals;
use feature_drawer::fdraw::log::{self, Logger, LogEntry, LogSeverity};
use feature_drawer::fdraw::visibility::FlatTerrain;
use feature_drawer::glam::{Mat4, Vec3};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn from_source<'a>(entries: &'a [LogEntry], source: &str) -> Vec<&'a LogEntry> {
    entries.iter().filter(|e| e.source == source).collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_creation_is_logged() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let config = FeatureDrawerConfig::default()
        .with_draw_distance(1000.0)
        .with_fade_distance(2000.0);
    let drawer = FeatureDrawer::new(config, 512.0, 512.0).unwrap();

    let captured = entries.lock().unwrap();
    let clamp = from_source(&captured, "fdraw::Config");
    assert_eq!(clamp.len(), 1);
    assert_eq!(clamp[0].severity, LogSeverity::Warn);
    assert_eq!(drawer.config().fade_distance, 1000.0);

    let created = from_source(&captured, "fdraw::FeatureDrawer");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].severity, LogSeverity::Info);
    assert!(created[0].message.contains("2x2 quads"));
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_rejected_shadow_pass_logs_error_with_location() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut drawer = FeatureDrawer::new(FeatureDrawerConfig::default(), 512.0, 512.0).unwrap();
    let registry = FeatureRegistry::new();
    let viewer = ViewerContext::new(0);
    let terrain = FlatTerrain::new(0.0);
    let mut sink = NullSink;
    let mut overrides = NoMaterialOverride;
    let camera = Camera::from_matrices(
        CameraType::Player,
        Vec3::new(0.0, 100.0, 0.0),
        Mat4::IDENTITY,
        Mat4::IDENTITY,
    );

    let mut ctx = DrawContext {
        registry: &registry,
        viewer: &viewer,
        terrain: &terrain,
        sink: &mut sink,
        overrides: &mut overrides,
    };
    let result = drawer.draw_shadow_pass(&mut ctx, &camera);
    assert!(matches!(result, Err(Error::InvalidState(_))));

    let captured = entries.lock().unwrap();
    let errors: Vec<_> = captured.iter().filter(|e| e.severity == LogSeverity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source, "fdraw::FeatureDrawer");
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_unknown_destroy_warns() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut drawer = FeatureDrawer::new(FeatureDrawerConfig::default(), 512.0, 512.0).unwrap();
    let mut registry = FeatureRegistry::new();
    let key = registry.create_feature(FeatureDesc::default());

    // Never synced, so the drawer has no state for it
    assert!(!drawer.lifecycle_mut().on_destroy(key, &mut NoDecals));

    let captured = entries.lock().unwrap();
    let warnings = from_source(&captured, "fdraw::LifecycleManager");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, LogSeverity::Warn);
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_removed_before_sync_is_quiet() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut drawer = FeatureDrawer::new(FeatureDrawerConfig::default(), 512.0, 512.0).unwrap();
    let mut registry = FeatureRegistry::new();
    let key = registry.create_feature(FeatureDesc::default());
    registry.remove_feature(key);

    let stats = drawer.sync(&mut registry, &mut NoDecals);
    assert_eq!(stats.destroyed, 0);

    let captured = entries.lock().unwrap();
    let lifecycle = from_source(&captured, "fdraw::LifecycleManager");
    assert_eq!(lifecycle.len(), 1);
    assert_eq!(lifecycle[0].severity, LogSeverity::Debug);
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_move_after_removal_is_not_warned() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut drawer = FeatureDrawer::new(FeatureDrawerConfig::default(), 512.0, 512.0).unwrap();
    let mut registry = FeatureRegistry::new();
    let key = registry.create_feature(FeatureDesc::default());
    drawer.sync(&mut registry, &mut NoDecals);

    registry.remove_feature(key);
    registry.set_position(key, Vec3::new(300.0, 0.0, 300.0));
    let stats = drawer.sync(&mut registry, &mut NoDecals);
    assert_eq!((stats.destroyed, stats.moved), (1, 0));

    let captured = entries.lock().unwrap();
    assert!(captured.iter().all(|e| e.severity < LogSeverity::Warn));
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);
    log::reset_logger();

    FeatureDrawer::new(FeatureDrawerConfig::default(), 512.0, 512.0).unwrap();

    assert!(entries.lock().unwrap().is_empty());
}

#[test]
#[serial]
fn test_integration_min_severity_filters_entries() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);
    log::set_min_severity(LogSeverity::Warn);

    let config = FeatureDrawerConfig::default()
        .with_draw_distance(1000.0)
        .with_fade_distance(2000.0);
    FeatureDrawer::new(config, 512.0, 512.0).unwrap();
    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1, "only the clamp warning survives");
        assert_eq!(captured[0].source, "fdraw::Config");
    }

    let mut drawer = FeatureDrawer::new(FeatureDrawerConfig::default(), 512.0, 512.0).unwrap();
    let mut registry = FeatureRegistry::new();
    let key = registry.create_feature(FeatureDesc::default());
    drawer.lifecycle_mut().on_destroy(key, &mut NoDecals);
    assert_eq!(entries.lock().unwrap().len(), 2);

    log::set_min_severity(LogSeverity::Trace);
    assert_eq!(log::min_severity(), LogSeverity::Trace);
    log::reset_logger();
}

// ============================================================================
// HELPERS
// ============================================================================

/// Sink that accepts everything and records nothing.
struct NullSink;

impl FeatureDrawSink for NullSink {
    fn begin_pass(&mut self, _pass: EmitPass) -> Result<()> {
        Ok(())
    }

    fn end_pass(&mut self, _pass: EmitPass) -> Result<()> {
        Ok(())
    }

    fn push_model_state(&mut self, _model_type: ModelType) -> Result<()> {
        Ok(())
    }

    fn pop_model_state(&mut self, _model_type: ModelType) -> Result<()> {
        Ok(())
    }

    fn bind_texture(&mut self, _model_type: ModelType, _texture: TextureKey) -> Result<()> {
        Ok(())
    }

    fn set_team_colour(&mut self, _team: u32, _alpha: f32) -> Result<()> {
        Ok(())
    }

    fn set_feature_alpha(&mut self, _opacity: f32) -> Result<()> {
        Ok(())
    }

    fn set_face_culling(&mut self, _enabled: bool) -> Result<()> {
        Ok(())
    }

    fn draw_feature(&mut self, _key: FeatureKey, _feature: &Feature, _state: &FeatureRenderState) -> Result<()> {
        Ok(())
    }

    fn queue_impostor(&mut self, _key: FeatureKey, _feature: &Feature, _state: &FeatureRenderState) -> Result<()> {
        Ok(())
    }

    fn flush_impostors(&mut self) -> Result<()> {
        Ok(())
    }
}
