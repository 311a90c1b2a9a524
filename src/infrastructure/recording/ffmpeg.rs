//! FFmpeg-based screen recorder adapter
//!
//! Grabs the region described by the stream's video track with `x11grab`,
//! encodes VP8 into a WebM container on stdout, and forwards every read
//! from stdout as one segment.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{debug, warn};

use crate::application::ports::{
    ActiveRecorder, ChunkCallback, MediaStream, MediaTrack, RecorderError, RecorderSink,
};
use crate::domain::capture::TrackSettings;
use crate::domain::config::DEFAULT_FRAMERATE;
use crate::domain::recording::{Segment, VideoMimeType};

/// Size of a single stdout read, and so the upper bound of a segment
const CHUNK_SIZE: usize = 64 * 1024;

/// How often the track watcher checks whether the track was stopped
const TRACK_POLL_MS: u64 = 100;

/// FFmpeg recorder sink
pub struct FfmpegRecorder {
    program: String,
}

impl FfmpegRecorder {
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }

    /// Use a specific ffmpeg binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build FFmpeg args for grabbing the track's region into WebM on stdout
    fn build_ffmpeg_args(settings: &TrackSettings) -> Result<Vec<String>, RecorderError> {
        let (width, height) = match (settings.width, settings.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(RecorderError::StartFailed(
                    "track has no frame size".to_string(),
                ))
            }
        };
        let framerate = settings.frame_rate.unwrap_or(DEFAULT_FRAMERATE);
        let input = format!(
            "{}+{},{}",
            settings.device_id,
            settings.offset_x.unwrap_or(0),
            settings.offset_y.unwrap_or(0)
        );

        Ok(vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "x11grab".to_string(),
            "-framerate".to_string(),
            framerate.to_string(),
            "-video_size".to_string(),
            format!("{}x{}", width, height),
            "-i".to_string(),
            input,
            "-an".to_string(),
            "-c:v".to_string(),
            "libvpx".to_string(), // VP8, the common WebM default
            "-deadline".to_string(),
            "realtime".to_string(),
            "-cpu-used".to_string(),
            "8".to_string(),
            "-b:v".to_string(),
            "2M".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-f".to_string(),
            "webm".to_string(),
            "pipe:1".to_string(),
        ])
    }

    fn spawn_ffmpeg(&self, args: &[String]) -> Result<Child, RecorderError> {
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecorderError::FfmpegNotFound
                } else {
                    RecorderError::StartFailed(e.to_string())
                }
            })
    }
}

impl Default for FfmpegRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward everything read from `reader` to `on_data`, one segment per read
async fn pump_chunks<Rd>(mut reader: Rd, on_data: ChunkCallback) -> std::io::Result<usize>
where
    Rd: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(total);
        }
        total += n;
        on_data(Segment::from(&buf[..n]));
    }
}

impl RecorderSink for FfmpegRecorder {
    fn start(
        &self,
        stream: Arc<dyn MediaStream>,
        on_data: ChunkCallback,
    ) -> Result<Box<dyn ActiveRecorder>, RecorderError> {
        let track = stream
            .video_tracks()
            .into_iter()
            .find(|t| t.is_live())
            .ok_or(RecorderError::NoVideoTrack)?;

        let args = Self::build_ffmpeg_args(&track.settings())?;
        debug!(?args, "spawning ffmpeg");
        let mut child = self.spawn_ffmpeg(&args)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RecorderError::StartFailed("ffmpeg stdout unavailable".to_string()))?;
        let pid = child.id();
        let recording = Arc::new(AtomicBool::new(true));

        // Reader: delivers chunks until ffmpeg closes stdout, then reaps it
        let reader_recording = Arc::clone(&recording);
        tokio::spawn(async move {
            match pump_chunks(stdout, on_data).await {
                Ok(total) => debug!(bytes = total, "ffmpeg output drained"),
                Err(e) => warn!(error = %e, "reading ffmpeg output failed"),
            }

            let stopped_by_us = !reader_recording.swap(false, Ordering::SeqCst);
            match child.wait_with_output().await {
                Ok(output) if !output.status.success() && !stopped_by_us => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(
                        status = %output.status,
                        error = stderr.lines().last().unwrap_or("unknown error"),
                        "ffmpeg exited unexpectedly"
                    );
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "waiting for ffmpeg failed"),
            }
        });

        // Watcher: ending the track ends the recording
        let watcher_recording = Arc::clone(&recording);
        tokio::spawn(watch_track(track, watcher_recording, pid));

        Ok(Box::new(FfmpegRecording { pid, recording }))
    }
}

async fn watch_track(track: Arc<dyn MediaTrack>, recording: Arc<AtomicBool>, pid: Option<u32>) {
    let mut ticker = interval(TokioDuration::from_millis(TRACK_POLL_MS));
    while recording.load(Ordering::SeqCst) {
        ticker.tick().await;
        if !track.is_live() {
            if recording.swap(false, Ordering::SeqCst) {
                debug!(track = track.id(), "track ended, stopping ffmpeg");
                interrupt(pid);
            }
            break;
        }
    }
}

/// Handle to a running ffmpeg process
struct FfmpegRecording {
    pid: Option<u32>,
    recording: Arc<AtomicBool>,
}

impl ActiveRecorder for FfmpegRecording {
    fn stop(&self) {
        if self.recording.swap(false, Ordering::SeqCst) {
            interrupt(self.pid);
        }
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn mime_type(&self) -> VideoMimeType {
        VideoMimeType::Webm
    }
}

/// Ask ffmpeg to finish gracefully so it writes out the remaining data
#[cfg(unix)]
fn interrupt(pid: Option<u32>) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    if let Some(id) = pid {
        if let Err(e) = signal::kill(Pid::from_raw(id as i32), Signal::SIGINT) {
            warn!(pid = id, error = %e, "failed to signal ffmpeg");
        }
    }
}

#[cfg(not(unix))]
fn interrupt(pid: Option<u32>) {
    warn!(?pid, "graceful ffmpeg stop is not supported on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn settings() -> TrackSettings {
        TrackSettings {
            device_id: ":0".to_string(),
            width: Some(1280),
            height: Some(720),
            frame_rate: Some(24),
            offset_x: Some(100),
            offset_y: Some(52),
            ..Default::default()
        }
    }

    #[test]
    fn args_grab_track_region() {
        let args = FfmpegRecorder::build_ffmpeg_args(&settings()).unwrap();
        let joined = args.join(" ");

        assert!(joined.contains("-f x11grab"));
        assert!(joined.contains("-framerate 24"));
        assert!(joined.contains("-video_size 1280x720"));
        assert!(joined.contains("-i :0+100,52"));
        assert!(joined.contains("-an"));
        assert!(joined.ends_with("-f webm pipe:1"));
    }

    #[test]
    fn args_default_framerate_and_offset() {
        let mut s = settings();
        s.frame_rate = None;
        s.offset_x = None;
        s.offset_y = None;

        let joined = FfmpegRecorder::build_ffmpeg_args(&s).unwrap().join(" ");
        assert!(joined.contains(&format!("-framerate {}", DEFAULT_FRAMERATE)));
        assert!(joined.contains("-i :0+0,0"));
    }

    #[test]
    fn args_require_frame_size() {
        let mut s = settings();
        s.height = None;
        assert!(FfmpegRecorder::build_ffmpeg_args(&s).is_err());
    }

    #[tokio::test]
    async fn pump_delivers_reads_in_order() {
        let chunks: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&chunks);
        let on_data: ChunkCallback = Arc::new(move |segment: Segment| {
            sink.lock().unwrap().extend_from_slice(segment.as_bytes());
        });

        let input: &[u8] = b"webm-bytes-in-order";
        let total = pump_chunks(input, on_data).await.unwrap();

        assert_eq!(total, input.len());
        assert_eq!(chunks.lock().unwrap().as_slice(), input);
    }

    #[tokio::test]
    async fn missing_binary_is_reported() {
        use crate::domain::capture::CaptureOptions;
        use crate::infrastructure::capture::{WindowGeometry, X11Stream, X11Track};

        let geometry = WindowGeometry {
            window_id: "0x1".to_string(),
            x: 0,
            y: 0,
            width: 320,
            height: 240,
        };
        let stream = Arc::new(X11Stream::new(X11Track::new(
            ":0",
            &geometry,
            &CaptureOptions::default(),
        )));
        let recorder = FfmpegRecorder::with_program("/nonexistent/ffmpeg-for-tests");

        let result = recorder.start(stream, Arc::new(|_: Segment| {}));
        assert!(matches!(result, Err(RecorderError::FfmpegNotFound)));
    }
}
