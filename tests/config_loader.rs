mod common;

use common::*;
use statevm::config::{ConfigError, EngineSettings};
use statevm::interception::Interceptions;
use statevm::viewmodel::ViewModel;

/// Test that EngineSettings::default() produces the documented values.
#[test]
fn test_settings_default_values() {
    let settings = EngineSettings::default();

    assert!(!settings.debug);
    assert!(settings.tag.is_none());
    assert!(settings.trace_interceptions);
}

/// Test that a full settings file is parsed.
#[test]
fn test_load_from_full_file() {
    let (_dir, path) = temp_settings(
        r#"
debug = true
tag = "checkout"
trace_interceptions = false
"#,
    );

    let settings = EngineSettings::load_from(&path).expect("valid settings");

    assert_eq!(
        settings,
        EngineSettings {
            debug: true,
            tag: Some("checkout".to_string()),
            trace_interceptions: false,
        }
    );
}

/// Test that missing keys fall back to their defaults.
#[test]
fn test_load_from_partial_file() {
    let (_dir, path) = temp_settings("debug = true\n");

    let settings = EngineSettings::load_from(&path).expect("valid settings");

    assert!(settings.debug);
    assert!(settings.tag.is_none());
    assert!(settings.trace_interceptions);
}

/// Test that a missing file is a read error when loaded explicitly.
#[test]
fn test_load_from_missing_file() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("absent.toml");

    match EngineSettings::load_from(&path) {
        Err(ConfigError::ReadError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

/// Test that malformed TOML is a parse error.
#[test]
fn test_load_from_invalid_toml() {
    let (_dir, path) = temp_settings("debug = [not toml");

    let result = EngineSettings::load_from(&path);

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// Test that a value of the wrong type is a parse error.
#[test]
fn test_load_from_wrong_type() {
    let (_dir, path) = temp_settings("debug = \"sometimes\"\n");

    let result = EngineSettings::load_from(&path);

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// Test that a blank tag fails validation.
#[test]
fn test_load_from_blank_tag() {
    let (_dir, path) = temp_settings("tag = \"\"\n");

    match EngineSettings::load_from(&path) {
        Err(ConfigError::ValidationError { message }) => {
            assert!(message.contains("tag"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

/// Test that error messages name the offending file.
#[test]
fn test_error_display_includes_path() {
    let (_dir, path) = temp_settings("tag = 3\n");

    let err = EngineSettings::load_from(&path).expect_err("tag must be a string");

    assert!(err.to_string().contains("config.toml"));
}

/// Test that the settings tag is used by the view model.
#[tokio::test]
async fn test_settings_tag_applies_to_view_model() {
    let settings = EngineSettings {
        tag: Some("from-settings".to_string()),
        ..EngineSettings::default()
    };

    let vm = ViewModel::builder(Counter::default(), reduce)
        .interceptions(Interceptions::new())
        .settings(settings.clone())
        .build()
        .expect("runtime is running");
    let explicit = ViewModel::builder(Counter::default(), reduce)
        .settings(settings)
        .tag("explicit")
        .build()
        .expect("runtime is running");

    assert_eq!(vm.tag(), "from-settings");
    assert_eq!(explicit.tag(), "explicit");
}

/// Test that settings can silence interception tracing of an explicit debug config.
#[tokio::test]
async fn test_settings_can_silence_interception_traces() {
    let recorder = std::sync::Arc::new(Recorder::default());
    let vm = ViewModel::builder(Counter::default(), reduce)
        .interceptions(
            Interceptions::<Counter, CounterAction>::builder()
                .before_pipe("log", |_, _| {})
                .build(),
        )
        .debug(statevm::debug::DebugConfig::enabled().with_shared_plugin(recorder.clone()))
        .settings(EngineSettings {
            trace_interceptions: false,
            ..EngineSettings::default()
        })
        .build()
        .expect("runtime is running");

    vm.dispatch(CounterAction::Increment);
    vm.flush().await;

    assert!(recorder.traversal().is_empty());
    assert_eq!(recorder.updates(), vec![1]);
}
