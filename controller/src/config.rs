//! TOML configuration model.

use std::{
    fs,
    path::{Path, PathBuf},
};

use life_canvas_core::{CellSize, IntervalBounds, StepInterval, Theme};
use life_canvas_engine::EngineConfig;
use life_canvas_system_sizing::ChromeReserve;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    /// The interval range is empty or starts at zero.
    #[error("invalid interval range {min_ms}..={max_ms} ms")]
    IntervalBounds {
        /// Configured fastest interval.
        min_ms: u32,
        /// Configured slowest interval.
        max_ms: u32,
    },
    /// The universe would contain no cells.
    #[error("universe dimensions {width}x{height} contain no cells")]
    EmptyGrid {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
}

/// Step timing and speed slider range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Initial step interval.
    pub interval_ms: u32,
    /// Fastest interval the slider allows.
    pub min_interval_ms: u32,
    /// Slowest interval the slider allows.
    pub max_interval_ms: u32,
    /// Slider granularity.
    pub interval_step_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let bounds = IntervalBounds::default();
        Self {
            interval_ms: StepInterval::DEFAULT.millis(),
            min_interval_ms: bounds.min_ms(),
            max_interval_ms: bounds.max_ms(),
            interval_step_ms: bounds.step_ms(),
        }
    }
}

/// Space reserved around the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Padding subtracted from both container axes.
    pub padding_px: u32,
    /// Height reserved for controls and statistics.
    pub controls_height_px: u32,
    /// Smallest cell size.
    pub min_cell_size_px: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let reserve = ChromeReserve::default();
        Self {
            padding_px: reserve.padding_px,
            controls_height_px: reserve.controls_height_px,
            min_cell_size_px: CellSize::MIN.get(),
        }
    }
}

/// Initial look and run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Starting theme.
    pub theme: Theme,
    /// Whether the simulation runs as soon as it is mounted.
    pub start_running: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            start_running: true,
        }
    }
}

/// Additional pattern sources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// TOML catalog appended after the built-in patterns.
    pub extra: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Step timing.
    pub timing: TimingConfig,
    /// Canvas layout.
    pub layout: LayoutConfig,
    /// Universe parameters handed to the engine.
    pub engine: EngineConfig,
    /// Theme and run state.
    pub appearance: AppearanceConfig,
    /// Pattern catalog extensions.
    pub patterns: PatternsConfig,
}

impl Config {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.interval_bounds()?;
        if self.engine.width == 0 || self.engine.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.engine.width,
                height: self.engine.height,
            });
        }
        Ok(())
    }

    /// Speed slider range.
    pub fn interval_bounds(&self) -> Result<IntervalBounds, ConfigError> {
        IntervalBounds::new(
            self.timing.min_interval_ms,
            self.timing.max_interval_ms,
            self.timing.interval_step_ms,
        )
        .ok_or(ConfigError::IntervalBounds {
            min_ms: self.timing.min_interval_ms,
            max_ms: self.timing.max_interval_ms,
        })
    }

    /// Chrome reserved around the canvas.
    #[must_use]
    pub const fn chrome_reserve(&self) -> ChromeReserve {
        ChromeReserve {
            padding_px: self.layout.padding_px,
            controls_height_px: self.layout.controls_height_px,
        }
    }

    /// Smallest cell size the layout may produce.
    #[must_use]
    pub const fn min_cell_size(&self) -> CellSize {
        CellSize::new(self.layout.min_cell_size_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").expect("empty config is valid");

        assert_eq!(config, Config::default());
        assert_eq!(config.timing.interval_ms, 100);
        assert_eq!(config.engine.width, 64);
        assert!(config.appearance.start_running);
    }

    #[test]
    fn inverted_interval_range_is_rejected() {
        let error = Config::from_toml_str(
            r#"
            [timing]
            min_interval_ms = 500
            max_interval_ms = 100
            "#,
        )
        .expect_err("inverted bounds must be rejected");

        assert!(matches!(
            error,
            ConfigError::IntervalBounds {
                min_ms: 500,
                max_ms: 100
            }
        ));
    }
}
