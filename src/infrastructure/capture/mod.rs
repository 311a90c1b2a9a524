//! Display capture infrastructure module
//!
//! Provides window and monitor selection on X11. The selected region is
//! described as a single-track stream; pixels are grabbed by the recorder.

mod geometry;
mod stream;
mod x11;

pub use geometry::{parse_xwininfo, WindowGeometry};
pub use stream::{X11Stream, X11Track};
pub use x11::X11DisplaySource;
