//! Display capture port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::{CaptureOptions, TrackConstraints, TrackKind, TrackSettings};

/// Capture request errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture was cancelled by the user")]
    Cancelled,

    #[error("No capture source available: {0}")]
    NoSource(String),

    #[error("Capture request failed: {0}")]
    Failed(String),
}

/// A single track of a live media stream
pub trait MediaTrack: Send + Sync {
    fn id(&self) -> &str;

    fn kind(&self) -> TrackKind;

    /// Effective settings reported by the source
    fn settings(&self) -> TrackSettings;

    /// Constraints the track was requested with
    fn constraints(&self) -> TrackConstraints;

    /// Stop the track. Stopping an ended track does nothing.
    fn stop(&self);

    /// Whether the track is still delivering media
    fn is_live(&self) -> bool;
}

/// A live media stream handed out by a display source
pub trait MediaStream: Send + Sync {
    fn id(&self) -> &str;

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>>;

    fn video_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks()
            .into_iter()
            .filter(|t| t.kind() == TrackKind::Video)
            .collect()
    }

    /// Stop every constituent track
    fn stop_all(&self) {
        for track in self.tracks() {
            track.stop();
        }
    }
}

/// Port for obtaining a live display stream
#[async_trait]
pub trait DisplaySource: Send + Sync {
    /// Ask the platform for a display stream.
    ///
    /// This may wait for the user to pick a surface. Cancellation, denial,
    /// or a missing source are reported as `CaptureError`.
    async fn request(&self, options: &CaptureOptions) -> Result<Arc<dyn MediaStream>, CaptureError>;
}
