//! X11 display source adapter
//!
//! Uses `xwininfo` to let the user pick a window (or reads the root window
//! for a whole-monitor capture). The resulting region is grabbed later by
//! the ffmpeg recorder through `x11grab`.

use std::env;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{CaptureError, DisplaySource, MediaStream};
use crate::domain::capture::{CaptureOptions, DisplaySurface};

use super::geometry::parse_xwininfo;
use super::stream::{X11Stream, X11Track};

/// Display source for X11 sessions
pub struct X11DisplaySource {
    display: Option<String>,
}

impl X11DisplaySource {
    /// Use the display named by `$DISPLAY`
    pub fn new() -> Self {
        Self { display: None }
    }

    /// Use an explicit display, falling back to `$DISPLAY` when `None`
    pub fn with_display(display: Option<String>) -> Self {
        Self { display }
    }

    fn resolve_display(&self) -> Result<String, CaptureError> {
        self.display
            .clone()
            .or_else(|| env::var("DISPLAY").ok())
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                CaptureError::NoSource("no X display available (DISPLAY is not set)".to_string())
            })
    }

    fn xwininfo_args(display: &str, surface: DisplaySurface) -> Vec<String> {
        let mut args = vec!["-display".to_string(), display.to_string()];
        if surface == DisplaySurface::Monitor {
            args.push("-root".to_string());
        }
        args
    }

    /// Make sure ffmpeg is installed before asking the user to pick anything
    async fn ensure_ffmpeg() -> Result<(), CaptureError> {
        let status = Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(s) if s.success() => Ok(()),
            Ok(s) => Err(CaptureError::NoSource(format!(
                "ffmpeg is not usable (exit status {})",
                s
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CaptureError::NoSource(
                "ffmpeg not found. Please install ffmpeg.".to_string(),
            )),
            Err(e) => Err(CaptureError::Failed(e.to_string())),
        }
    }

    async fn run_xwininfo(display: &str, surface: DisplaySurface) -> Result<String, CaptureError> {
        let output = Command::new("xwininfo")
            .args(Self::xwininfo_args(display, surface))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptureError::NoSource(
                        "xwininfo not found. Please install x11-utils.".to_string(),
                    )
                } else {
                    CaptureError::Failed(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_xwininfo_failure(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for X11DisplaySource {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a failed `xwininfo` run to a capture error
fn classify_xwininfo_failure(stderr: &str) -> CaptureError {
    let lower = stderr.to_lowercase();
    if lower.contains("unable to open display") || lower.contains("can't open display") {
        CaptureError::NoSource(
            stderr
                .lines()
                .last()
                .unwrap_or("cannot open display")
                .trim()
                .to_string(),
        )
    } else if lower.contains("permission") || lower.contains("authorization") {
        CaptureError::PermissionDenied(stderr.trim().to_string())
    } else {
        // Interrupted or aborted pick
        CaptureError::Cancelled
    }
}

#[async_trait]
impl DisplaySource for X11DisplaySource {
    async fn request(
        &self,
        options: &CaptureOptions,
    ) -> Result<Arc<dyn MediaStream>, CaptureError> {
        if options.audio {
            return Err(CaptureError::Failed(
                "audio capture is not supported".to_string(),
            ));
        }

        let x_display = self.resolve_display()?;
        Self::ensure_ffmpeg().await?;

        let surface = options.video.display_surface;
        debug!(display = %x_display, %surface, "selecting capture region");
        let output = Self::run_xwininfo(&x_display, surface).await?;

        let geometry = parse_xwininfo(&output).ok_or_else(|| {
            CaptureError::Failed("could not read window geometry".to_string())
        })?;
        if geometry.normalized().is_empty() {
            return Err(CaptureError::Failed(format!(
                "window {} is too small to capture",
                geometry.window_id
            )));
        }

        debug!(?geometry, "capture region selected");
        let track = X11Track::new(&x_display, &geometry, options);
        Ok(Arc::new(X11Stream::new(track)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_display_wins() {
        let source = X11DisplaySource::with_display(Some(":7".to_string()));
        assert_eq!(source.resolve_display().unwrap(), ":7");
    }

    #[test]
    fn blank_display_is_no_source() {
        let source = X11DisplaySource::with_display(Some("  ".to_string()));
        // Falls back to $DISPLAY; only assert when that is unset too
        if env::var("DISPLAY").map(|d| d.trim().is_empty()).unwrap_or(true) {
            assert!(matches!(
                source.resolve_display(),
                Err(CaptureError::NoSource(_))
            ));
        }
    }

    #[test]
    fn monitor_uses_root_window() {
        let args = X11DisplaySource::xwininfo_args(":0", DisplaySurface::Monitor);
        assert_eq!(args, vec!["-display", ":0", "-root"]);

        let args = X11DisplaySource::xwininfo_args(":0", DisplaySurface::Window);
        assert_eq!(args, vec!["-display", ":0"]);
    }

    #[test]
    fn classify_failures() {
        assert!(matches!(
            classify_xwininfo_failure("xwininfo: error: unable to open display \":9\"\n"),
            CaptureError::NoSource(_)
        ));
        assert!(matches!(
            classify_xwininfo_failure("Authorization required, but no authorization protocol specified"),
            CaptureError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify_xwininfo_failure(""),
            CaptureError::Cancelled
        ));
    }

    #[tokio::test]
    async fn audio_requests_are_rejected() {
        let source = X11DisplaySource::with_display(Some(":0".to_string()));
        let mut options = CaptureOptions::default();
        options.audio = true;

        let err = source.request(&options).await.err().unwrap();
        assert!(err.to_string().contains("audio"));
    }
}
