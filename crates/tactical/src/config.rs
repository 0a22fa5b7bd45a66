//! Display settings loaded at startup.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::coord::{cell_to_lepton, CELL_PIXEL_W};
use crate::display::Display;
use crate::house::SessionKind;

pub const CONFIG_ENV_VAR: &str = "TACVIEW_CONFIG";

/// View sizes use this to take whatever screen space is left.
pub const FILL: i32 = -1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path} at `{field}`: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("failed to read env var {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub tactical_x: i32,
    pub tactical_y: i32,
    pub view_width_cells: i32,
    pub view_height_cells: i32,
    /// Columns kept free on the right of the screen for a side panel.
    pub sidebar_cells: i32,
    pub scroll_step_leptons: i32,
    pub target_fps: u32,
    pub metrics_interval_secs: f32,
    pub sorted_draw: bool,
    pub ignore_view_constraints: bool,
    pub share_ally_visibility: bool,
    pub editor_mode: bool,
    pub session_kind: SessionKind,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: "Tactical View".to_string(),
            window_width: 640,
            window_height: 400,
            tactical_x: 0,
            tactical_y: 16,
            view_width_cells: FILL,
            view_height_cells: FILL,
            sidebar_cells: 0,
            scroll_step_leptons: 256,
            target_fps: 60,
            metrics_interval_secs: 1.0,
            sorted_draw: true,
            ignore_view_constraints: false,
            share_ally_visibility: false,
            editor_mode: false,
            session_kind: SessionKind::Skirmish,
        }
    }
}

impl DisplayConfig {
    /// Reads the file named by `TACVIEW_CONFIG`. No variable, or a path that
    /// does not exist, gives the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(value) => {
                let path = PathBuf::from(value);
                if path.exists() {
                    Self::load(&path)
                } else {
                    info!(path = %path.display(), "config_missing_using_defaults");
                    Ok(Self::default())
                }
            }
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source) => Err(ConfigError::EnvVar {
                var: CONFIG_ENV_VAR,
                source,
            }),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&raw, path)?;
        info!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    /// `origin` only labels errors.
    pub fn parse(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: DisplayConfig =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let field = error.path().to_string();
                ConfigError::Parse {
                    path: origin.to_path_buf(),
                    field,
                    source: error.into_inner(),
                }
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                message: message.into(),
            }
        }

        for (field, value) in [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
        ] {
            if value == 0 {
                return Err(invalid(field, "window must be non-empty"));
            }
        }
        for (field, value) in [
            ("view_width_cells", self.view_width_cells),
            ("view_height_cells", self.view_height_cells),
        ] {
            if value != FILL && value <= 0 {
                return Err(invalid(field, format!("expected -1 or a positive count, got {value}")));
            }
        }
        if self.sidebar_cells < 0 {
            return Err(invalid(
                "sidebar_cells",
                format!("expected zero or more, got {}", self.sidebar_cells),
            ));
        }
        if self.scroll_step_leptons <= 0 {
            return Err(invalid(
                "scroll_step_leptons",
                format!("expected a positive step, got {}", self.scroll_step_leptons),
            ));
        }
        if self.target_fps == 0 {
            return Err(invalid("target_fps", "expected a positive rate"));
        }
        if !self.metrics_interval_secs.is_finite() || self.metrics_interval_secs <= 0.0 {
            return Err(invalid(
                "metrics_interval_secs",
                format!("expected a positive interval, got {}", self.metrics_interval_secs),
            ));
        }
        Ok(())
    }

    /// Pushes the settings into a display and sizes its tactical view.
    pub fn apply(&self, display: &mut Display) {
        display.options.sorted_draw = self.sorted_draw;
        display.options.editor_mode = self.editor_mode;
        display.options.sidebar_leptons = cell_to_lepton(self.sidebar_cells);
        display.viewport.ignore_view_constraints = self.ignore_view_constraints;
        display.session.kind = self.session_kind;
        display.session.share_ally_visibility = self.share_ally_visibility;
        display.set_screen_size(self.window_width as i32, self.window_height as i32);

        let width = if self.view_width_cells == FILL {
            let free = self.window_width as i32 - self.tactical_x - self.sidebar_cells * CELL_PIXEL_W;
            Some((free / CELL_PIXEL_W).max(1))
        } else {
            Some(self.view_width_cells)
        };
        let height = (self.view_height_cells != FILL).then_some(self.view_height_cells);
        display.set_view_dimensions(self.tactical_x, self.tactical_y, width, height);
    }
}
