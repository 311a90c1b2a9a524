//! screen-capture - record a window or screen to WebM
//!
//! This crate asks the display server for a window (or whole monitor),
//! previews it, records it with ffmpeg as VP8 WebM segments and saves the
//! concatenated recording as `screen-capture.webm`.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Capture lifecycle, options, recorded segments, the capture log
//! - **Application**: The capture controller and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (X11, FFmpeg, filesystem, XDG config)
//! - **CLI**: Command-line interface, interactive session, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
