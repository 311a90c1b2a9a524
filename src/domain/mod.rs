//! Domain layer - Core capture logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod log;
pub mod recording;

// Re-export common types
pub use capture::{CaptureLifecycle, CaptureOptions, CaptureState, DisplaySurface};
pub use config::AppConfig;
pub use error::*;
pub use log::{CaptureLog, LogLevel, LogLine};
pub use recording::{RecordedSegments, Segment, VideoBlob, VideoMimeType};
