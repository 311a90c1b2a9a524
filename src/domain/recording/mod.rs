//! Recording domain module

mod blob;
mod segments;

pub use blob::{human_readable_size, VideoBlob, VideoMimeType};
pub use segments::{RecordedSegments, Segment};
