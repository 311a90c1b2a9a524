//! Terminal preview adapter
//!
//! A terminal cannot show the captured pixels, so the preview announces
//! what is live and for how long.

use std::sync::Mutex;
use std::time::Instant;

use colored::Colorize;

use crate::application::ports::{MediaStream, PreviewSink};

struct Bound {
    label: String,
    since: Instant,
}

/// Preview that prints the bound stream to stderr
#[derive(Default)]
pub struct TerminalPreview {
    bound: Mutex<Option<Bound>>,
}

impl TerminalPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description of the bound stream and how long it has been live
    pub fn describe(&self) -> Option<String> {
        let guard = self.bound.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .map(|b| format!("{} ({}s)", b.label, b.since.elapsed().as_secs()))
    }

    fn label_for(stream: &dyn MediaStream) -> String {
        let Some(track) = stream.video_tracks().into_iter().next() else {
            return stream.id().to_string();
        };
        let settings = track.settings();
        let surface = settings
            .display_surface
            .map(|s| s.to_string())
            .unwrap_or_else(|| "display".to_string());
        match settings.resolution() {
            Some(res) => format!("{} {} on {}", surface, res, settings.device_id),
            None => format!("{} on {}", surface, settings.device_id),
        }
    }
}

impl PreviewSink for TerminalPreview {
    fn bind(&self, stream: &dyn MediaStream) {
        let label = Self::label_for(stream);
        eprintln!("{} Live: {}", "●".red(), label);
        *self.bound.lock().unwrap_or_else(|e| e.into_inner()) = Some(Bound {
            label,
            since: Instant::now(),
        });
    }

    fn unbind(&self) {
        let previous = self.bound.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(bound) = previous {
            eprintln!(
                "{} Preview closed after {}s",
                "■".dimmed(),
                bound.since.elapsed().as_secs()
            );
        }
    }
}
