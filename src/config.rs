//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/assetmap/assetmap.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ASSETMAP_*` prefix, `__` between section and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::{CanvasSynchronizer, StripOptions};
use crate::application::ApplicationError;
use crate::domain::{LayoutOptions, Viewport, ZoomBounds};

/// Layout gaps and sibling strip placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub h_gap: f64,
    pub v_gap: f64,
    pub indented_v_gap: f64,
    pub indent: f64,
    pub strip_spacing: f64,
    pub strip_leading_gap: f64,
    pub strip_y_offset: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        let strip = StripOptions::default();
        Self {
            h_gap: layout.h_gap,
            v_gap: layout.v_gap,
            indented_v_gap: layout.indented_v_gap,
            indent: layout.indent,
            strip_spacing: strip.spacing,
            strip_leading_gap: strip.leading_gap,
            strip_y_offset: strip.y_offset,
        }
    }
}

impl LayoutSettings {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            h_gap: self.h_gap,
            v_gap: self.v_gap,
            indented_v_gap: self.indented_v_gap,
            indent: self.indent,
        }
    }

    pub fn strip_options(&self) -> StripOptions {
        StripOptions {
            spacing: self.strip_spacing,
            leading_gap: self.strip_leading_gap,
            y_offset: self.strip_y_offset,
        }
    }
}

/// Surface size and zoom behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Padding around content in zoom-to-fit
    pub fit_padding: f64,
    /// Distance of the root's top edge from the surface top on first paint
    pub root_top_offset: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        let bounds = ZoomBounds::default();
        Self {
            width: 1280.0,
            height: 720.0,
            min_zoom: bounds.min,
            max_zoom: bounds.max,
            fit_padding: 20.0,
            root_top_offset: 40.0,
        }
    }
}

impl ViewportSettings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width,
            self.height,
            ZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            },
        )
    }
}

/// Raw layout settings for intermediate parsing (None = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub h_gap: Option<f64>,
    pub v_gap: Option<f64>,
    pub indented_v_gap: Option<f64>,
    pub indent: Option<f64>,
    pub strip_spacing: Option<f64>,
    pub strip_leading_gap: Option<f64>,
    pub strip_y_offset: Option<f64>,
}

/// Raw viewport settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewportSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub fit_padding: Option<f64>,
    pub root_top_offset: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub layout: RawLayoutSettings,
    pub viewport: RawViewportSettings,
}

/// Unified configuration for assetmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Group dump used when no file is given on the command line
    pub data_file: Option<PathBuf>,
    pub layout: LayoutSettings,
    pub viewport: ViewportSettings,
}

/// Get the XDG config directory for assetmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "assetmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("assetmap.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Overlay raw settings: every specified value replaces the current one.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let (l, o) = (&self.layout, &overlay.layout);
        let (v, ov) = (&self.viewport, &overlay.viewport);
        Self {
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
            layout: LayoutSettings {
                h_gap: o.h_gap.unwrap_or(l.h_gap),
                v_gap: o.v_gap.unwrap_or(l.v_gap),
                indented_v_gap: o.indented_v_gap.unwrap_or(l.indented_v_gap),
                indent: o.indent.unwrap_or(l.indent),
                strip_spacing: o.strip_spacing.unwrap_or(l.strip_spacing),
                strip_leading_gap: o.strip_leading_gap.unwrap_or(l.strip_leading_gap),
                strip_y_offset: o.strip_y_offset.unwrap_or(l.strip_y_offset),
            },
            viewport: ViewportSettings {
                width: ov.width.unwrap_or(v.width),
                height: ov.height.unwrap_or(v.height),
                min_zoom: ov.min_zoom.unwrap_or(v.min_zoom),
                max_zoom: ov.max_zoom.unwrap_or(v.max_zoom),
                fit_padding: ov.fit_padding.unwrap_or(v.fit_padding),
                root_top_offset: ov.root_top_offset.unwrap_or(v.root_top_offset),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, applied after the global one
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_file, None)
    }

    /// Like [`Settings::load`], reading `ASSETMAP_*` variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file must exist if given
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Apply environment variables (explicit override)
        current = Self::apply_env_overrides(current, env)?;

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply ASSETMAP_* environment variables as explicit overrides.
    /// A variable that is set but does not parse is an error, not a silent default.
    fn apply_env_overrides(
        settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ASSETMAP")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        let float = |key: &str| optional(config.get_float(key));
        let raw = RawSettings {
            data_file: optional(config.get_string("data_file"))?.map(PathBuf::from),
            layout: RawLayoutSettings {
                h_gap: float("layout.h_gap")?,
                v_gap: float("layout.v_gap")?,
                indented_v_gap: float("layout.indented_v_gap")?,
                indent: float("layout.indent")?,
                strip_spacing: float("layout.strip_spacing")?,
                strip_leading_gap: float("layout.strip_leading_gap")?,
                strip_y_offset: float("layout.strip_y_offset")?,
            },
            viewport: RawViewportSettings {
                width: float("viewport.width")?,
                height: float("viewport.height")?,
                min_zoom: float("viewport.min_zoom")?,
                max_zoom: float("viewport.max_zoom")?,
                fit_padding: float("viewport.fit_padding")?,
                root_top_offset: float("viewport.root_top_offset")?,
            },
        };
        Ok(settings.merge_with(&raw))
    }

    fn expand_paths(&mut self) {
        self.data_file = self.data_file.as_deref().map(expand_path);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        let (l, v) = (&self.layout, &self.viewport);
        let non_negative = [
            ("layout.h_gap", l.h_gap),
            ("layout.v_gap", l.v_gap),
            ("layout.indented_v_gap", l.indented_v_gap),
            ("layout.indent", l.indent),
            ("layout.strip_spacing", l.strip_spacing),
            ("layout.strip_leading_gap", l.strip_leading_gap),
            ("viewport.fit_padding", v.fit_padding),
        ];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ApplicationError::Config {
                    message: format!("{key} must be a finite non-negative number, got {value}"),
                });
            }
        }
        for (key, value) in [
            ("layout.strip_y_offset", l.strip_y_offset),
            ("viewport.root_top_offset", v.root_top_offset),
        ] {
            if !value.is_finite() {
                return Err(ApplicationError::Config {
                    message: format!("{key} must be finite, got {value}"),
                });
            }
        }
        if !(v.min_zoom > 0.0 && v.min_zoom <= v.max_zoom && v.max_zoom.is_finite()) {
            return Err(ApplicationError::Config {
                message: format!(
                    "viewport zoom range invalid: min_zoom={} max_zoom={}",
                    v.min_zoom, v.max_zoom
                ),
            });
        }
        if !(v.width.is_finite() && v.width > 0.0 && v.height.is_finite() && v.height > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("viewport size invalid: {}x{}", v.width, v.height),
            });
        }
        Ok(())
    }

    /// Canvas synchronizer configured from these settings.
    pub fn synchronizer(&self) -> CanvasSynchronizer {
        CanvasSynchronizer::new(
            self.layout.layout_options(),
            self.layout.strip_options(),
            self.viewport.fit_padding,
            self.viewport.root_top_offset,
        )
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# assetmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/assetmap/assetmap.toml
#   File:   --config <path>
#   Env:    ASSETMAP_* environment variables, e.g. ASSETMAP_LAYOUT__H_GAP=10

# Group dump used when no file is given on the command line
# data_file = "~/panorama/groups.json"

[layout]
# Padding per side in the compact pass (group and subject domains)
# h_gap = 8.0
# v_gap = 9.0

# Padding per side and child indent in the indented pass
# indented_v_gap = 4.0
# indent = 28.0

# Sibling strip next to the focused group
# strip_spacing = 236.0
# strip_leading_gap = 16.0
# strip_y_offset = 12.0

[viewport]
# width = 1280.0
# height = 720.0
# min_zoom = 0.2
# max_zoom = 4.0
# fit_padding = 20.0
# root_top_offset = 40.0
"#
        .to_string()
    }
}

/// Missing keys are `None`; anything else the config crate reports is an error.
fn optional<T>(value: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
