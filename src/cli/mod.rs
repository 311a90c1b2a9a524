//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, session input handling,
//! and the interactive session runner.

pub mod app;
pub mod args;
pub mod commands;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_interactive, EXIT_ERROR, EXIT_SUCCESS};
pub use args::{CaptureRunOptions, Cli, Commands, ConfigAction};
pub use commands::UserCommand;
pub use presenter::Presenter;
