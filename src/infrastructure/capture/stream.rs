//! X11 screen-grab stream and track

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{MediaStream, MediaTrack};
use crate::domain::capture::{CaptureOptions, TrackConstraints, TrackKind, TrackSettings};

use super::geometry::WindowGeometry;

/// Video track backed by an X11 screen region.
///
/// `settings().device_id` holds the X display name; width, height, and
/// offsets describe the grabbed region.
pub struct X11Track {
    id: String,
    settings: TrackSettings,
    constraints: TrackConstraints,
    live: AtomicBool,
}

impl X11Track {
    pub fn new(display: &str, geometry: &WindowGeometry, options: &CaptureOptions) -> Self {
        let region = geometry.normalized();
        Self {
            id: format!("x11-{}", region.window_id),
            settings: TrackSettings {
                device_id: display.to_string(),
                display_surface: Some(options.video.display_surface),
                width: Some(region.width),
                height: Some(region.height),
                frame_rate: options.video.frame_rate,
                offset_x: Some(region.x),
                offset_y: Some(region.y),
            },
            constraints: TrackConstraints {
                display_surface: Some(options.video.display_surface),
                frame_rate: options.video.frame_rate,
            },
            live: AtomicBool::new(true),
        }
    }
}

impl MediaTrack for X11Track {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn settings(&self) -> TrackSettings {
        self.settings.clone()
    }

    fn constraints(&self) -> TrackConstraints {
        self.constraints.clone()
    }

    fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!(track = %self.id, "track stopped");
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Stream with a single X11 video track
pub struct X11Stream {
    id: String,
    track: Arc<X11Track>,
}

impl X11Stream {
    pub fn new(track: X11Track) -> Self {
        Self {
            id: format!("stream-{}", track.id),
            track: Arc::new(track),
        }
    }
}

impl MediaStream for X11Stream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        vec![Arc::clone(&self.track) as Arc<dyn MediaTrack>]
    }
}
