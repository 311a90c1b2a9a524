//! Recorder port interfaces

use std::sync::Arc;

use thiserror::Error;

use crate::domain::recording::{Segment, VideoMimeType};

use super::display_source::MediaStream;

/// Recorder errors
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    #[error("Failed to start recorder: {0}")]
    StartFailed(String),

    #[error("Stream has no live video track")]
    NoVideoTrack,

    #[error("FFmpeg not found. Please install ffmpeg.")]
    FfmpegNotFound,
}

/// Callback invoked for every chunk the recorder emits, in delivery order.
pub type ChunkCallback = Arc<dyn Fn(Segment) + Send + Sync>;

/// Handle to a running recorder
pub trait ActiveRecorder: Send + Sync {
    /// Stop recording.
    ///
    /// Returns immediately; buffered data is flushed to the chunk callback
    /// in the background. Stopping twice does nothing.
    fn stop(&self);

    fn is_recording(&self) -> bool;

    /// Container format of the emitted chunks
    fn mime_type(&self) -> VideoMimeType {
        VideoMimeType::Webm
    }
}

/// Port for recording a live stream into chunks
pub trait RecorderSink: Send + Sync {
    /// Start recording `stream`, delivering chunks to `on_data`.
    fn start(
        &self,
        stream: Arc<dyn MediaStream>,
        on_data: ChunkCallback,
    ) -> Result<Box<dyn ActiveRecorder>, RecorderError>;
}
