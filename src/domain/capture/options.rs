//! Display capture request options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidSurfaceError;

/// Kind of display surface the user is asked to pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySurface {
    /// A whole screen
    Monitor,
    /// A single application window
    #[default]
    Window,
}

impl DisplaySurface {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monitor => "monitor",
            Self::Window => "window",
        }
    }
}

impl FromStr for DisplaySurface {
    type Err = InvalidSurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monitor" | "screen" => Ok(Self::Monitor),
            "window" => Ok(Self::Window),
            _ => Err(InvalidSurfaceError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DisplaySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video part of a capture request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOptions {
    pub display_surface: DisplaySurface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
}

/// Options sent to the display source when capture starts.
///
/// The default asks for a window-level surface and no audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub video: VideoOptions,
    pub audio: bool,
}

impl CaptureOptions {
    /// Options for the given surface, without audio
    pub fn for_surface(surface: DisplaySurface) -> Self {
        Self {
            video: VideoOptions {
                display_surface: surface,
                frame_rate: None,
            },
            audio: false,
        }
    }

    /// Set the ideal frame rate
    pub fn with_frame_rate(mut self, frame_rate: Option<u32>) -> Self {
        self.video.frame_rate = frame_rate;
        self
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::for_surface(DisplaySurface::Window)
    }
}
