//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod display_source;
pub mod file_save;
pub mod preview;
pub mod recorder;

// Re-export common types
pub use config::ConfigStore;
pub use display_source::{CaptureError, DisplaySource, MediaStream, MediaTrack};
pub use file_save::{FileSaveSink, SaveError};
pub use preview::{NoPreview, PreviewSink};
pub use recorder::{ActiveRecorder, ChunkCallback, RecorderError, RecorderSink};
