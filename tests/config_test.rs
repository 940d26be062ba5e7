//! Integration tests for Settings config loading with layered precedence.
//!
//! - Defaults → Global → explicit file: each specified value REPLACES
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: these tests assume no global config on the test machine.

use std::fs;

use config::Map;
use tempfile::TempDir;

use assetmap::application::ApplicationError;
use assetmap::config::Settings;

#[test]
fn given_explicit_config_file_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assetmap.toml");
    fs::write(
        &path,
        r#"
data_file = "groups.json"

[layout]
h_gap = 10.0
indent = 32.0

[viewport]
max_zoom = 2.5
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert_eq!(settings.layout.h_gap, 10.0);
    assert_eq!(settings.layout.indent, 32.0);
    assert_eq!(settings.layout.v_gap, 9.0, "unspecified keeps default");
    assert_eq!(settings.viewport.max_zoom, 2.5);
    assert_eq!(settings.viewport.min_zoom, 0.2);

    let options = settings.layout.layout_options();
    assert_eq!(options.h_gap, 10.0);
    assert_eq!(settings.viewport.viewport().bounds.max, 2.5);
}

fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
    Some(
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn given_env_override_when_load_then_env_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assetmap.toml");
    fs::write(&path, "[viewport]\nfit_padding = 10.0\n").unwrap();

    let settings = Settings::load_with_env(
        Some(path.as_path()),
        env(&[("ASSETMAP_VIEWPORT__FIT_PADDING", "33")]),
    )
    .unwrap();

    assert_eq!(settings.viewport.fit_padding, 33.0);
}

#[test]
fn given_unparsable_env_value_when_load_then_config_error() {
    let err = Settings::load_with_env(None, env(&[("ASSETMAP_LAYOUT__H_GAP", "abc")])).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_nan_surface_size_from_env_when_load_then_rejected() {
    let err = Settings::load_with_env(None, env(&[("ASSETMAP_VIEWPORT__WIDTH", "NaN")])).unwrap_err();

    assert!(err.to_string().contains("viewport size invalid"), "{err}");
}

#[test]
fn given_negative_padding_in_file_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assetmap.toml");
    fs::write(&path, "[viewport]\nfit_padding = -5.0\n").unwrap();

    let err = Settings::load_with_env(Some(path.as_path()), env(&[])).unwrap_err();

    assert!(err.to_string().contains("viewport.fit_padding"), "{err}");
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_malformed_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assetmap.toml");
    fs::write(&path, "[layout\nh_gap = ").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_inverted_zoom_range_in_file_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assetmap.toml");
    fs::write(&path, "[viewport]\nmin_zoom = 3.0\nmax_zoom = 1.0\n").unwrap();

    assert!(Settings::load(Some(path.as_path())).is_err());
}

#[test]
fn given_settings_when_serialized_then_round_trips_through_toml() {
    let settings = Settings::default();

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}
