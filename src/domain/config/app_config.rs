//! Application configuration value object

use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::capture::{CaptureOptions, DisplaySurface};
use crate::domain::error::ConfigError;

/// Default frame rate when none is configured
pub const DEFAULT_FRAMERATE: u32 = 30;

/// Frame rates accepted from flags and config
pub const FRAMERATE_RANGE: RangeInclusive<u32> = 1..=120;

/// Linux-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinuxConfig {
    /// X display to grab from (overrides `$DISPLAY`)
    pub display: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub surface: Option<String>,
    pub framerate: Option<u32>,
    pub output_dir: Option<String>,
    pub linux: Option<LinuxConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            surface: Some("window".to_string()),
            framerate: Some(DEFAULT_FRAMERATE),
            output_dir: Some(".".to_string()),
            linux: Some(LinuxConfig { display: None }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            surface: other.surface.or(self.surface),
            framerate: other.framerate.or(self.framerate),
            output_dir: other.output_dir.or(self.output_dir),
            linux: Self::merge_linux_config(self.linux, other.linux),
        }
    }

    fn merge_linux_config(
        base: Option<LinuxConfig>,
        other: Option<LinuxConfig>,
    ) -> Option<LinuxConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(LinuxConfig {
                display: o.display.or(b.display),
            }),
        }
    }

    /// Get surface as parsed DisplaySurface, or window if not set/invalid
    pub fn surface_or_default(&self) -> DisplaySurface {
        self.surface
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get frame rate, or the default if not set or zero
    pub fn framerate_or_default(&self) -> u32 {
        self.framerate
            .filter(|&f| f > 0)
            .unwrap_or(DEFAULT_FRAMERATE)
    }

    /// Get the output directory, or the current directory if not set
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the configured X display, if any
    pub fn display(&self) -> Option<&str> {
        self.linux.as_ref().and_then(|l| l.display.as_deref())
    }

    /// Check the values a capture session would run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(surface) = &self.surface {
            surface
                .parse::<DisplaySurface>()
                .map_err(|e| ConfigError::ValidationError {
                    key: "surface".to_string(),
                    message: e.to_string(),
                })?;
        }
        if let Some(framerate) = self.framerate {
            if !FRAMERATE_RANGE.contains(&framerate) {
                return Err(ConfigError::ValidationError {
                    key: "framerate".to_string(),
                    message: format!(
                        "{} is out of range ({}-{})",
                        framerate,
                        FRAMERATE_RANGE.start(),
                        FRAMERATE_RANGE.end()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Build the capture request options from this config
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions::for_surface(self.surface_or_default())
            .with_frame_rate(Some(self.framerate_or_default()))
    }
}
