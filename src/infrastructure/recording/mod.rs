//! Recording infrastructure module
//!
//! Records a display stream with FFmpeg into WebM chunks.

mod ffmpeg;

pub use ffmpeg::FfmpegRecorder;
