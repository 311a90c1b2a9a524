//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::capture::{CaptureOptions, DisplaySurface};

/// screen-capture - record a window or screen to WebM
#[derive(Parser, Debug)]
#[command(name = "screen-capture")]
#[command(version)]
#[command(about = "Capture a window or screen, preview it live, record it and save it as WebM")]
#[command(long_about = None)]
pub struct Cli {
    /// Display surface to capture
    #[arg(short = 's', long, value_name = "SURFACE")]
    pub surface: Option<SurfaceArg>,

    /// Directory the recording is saved into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Ideal capture frame rate
    #[arg(short = 'r', long, value_name = "FPS", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub framerate: Option<u32>,

    /// X display to capture from (defaults to $DISPLAY)
    #[arg(long, value_name = "DISPLAY")]
    pub display: Option<String>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Surface argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SurfaceArg {
    Window,
    Monitor,
}

impl From<SurfaceArg> for DisplaySurface {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Window => DisplaySurface::Window,
            SurfaceArg::Monitor => DisplaySurface::Monitor,
        }
    }
}

/// Parsed options for an interactive capture session
#[derive(Debug, Clone)]
pub struct CaptureRunOptions {
    pub capture: CaptureOptions,
    pub output_dir: PathBuf,
    pub display: Option<String>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["surface", "framerate", "output_dir", "linux.display"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
