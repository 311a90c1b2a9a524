//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like X11, FFmpeg, and the filesystem.

pub mod capture;
pub mod config;
pub mod preview;
pub mod recording;
pub mod save;

// Re-export adapters
pub use capture::X11DisplaySource;
pub use config::XdgConfigStore;
pub use preview::TerminalPreview;
pub use recording::FfmpegRecorder;
pub use save::FsFileSaveSink;
