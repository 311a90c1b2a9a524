//! Capture domain module

mod options;
mod state;
mod track;

pub use options::{CaptureOptions, DisplaySurface, VideoOptions};
pub use state::{CaptureLifecycle, CaptureState, InvalidStateTransition};
pub use track::{TrackConstraints, TrackKind, TrackSettings};
