//! Capture controller use case
//!
//! Owns the capture/record lifecycle and wires the display source, recorder,
//! preview, and file-save ports together. Every user-visible outcome,
//! including failures, ends up as a line in the capture log.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::capture::{
    CaptureLifecycle, CaptureOptions, CaptureState, InvalidStateTransition, TrackSettings,
};
use crate::domain::log::CaptureLog;
use crate::domain::recording::{RecordedSegments, VideoMimeType};

use super::ports::{
    ActiveRecorder, ChunkCallback, DisplaySource, FileSaveSink, MediaStream, PreviewSink,
    RecorderSink,
};

/// File name suggested to the file-save sink
pub const SAVE_FILENAME: &str = "screen-capture.webm";

pub const MSG_NO_DATA: &str = "No recorded data available.";
pub const MSG_SAVED: &str = "Video saved successfully.";

/// Errors from the capture controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),
}

/// Result of a start request that was allowed to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Capture and recording are running
    Started,
    /// The request failed; the reason is in the log
    Failed,
}

/// Result of a save request that was allowed to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// Nothing was recorded, no file produced
    NoData,
    /// The file-save sink failed; the reason is in the log
    Failed,
}

/// Live stream and recorder of one capture session.
///
/// Dropping the session stops its tracks and recorder, so a session can
/// never outlive its owner with live handles.
struct CaptureSession {
    stream: Arc<dyn MediaStream>,
    recorder: Option<Box<dyn ActiveRecorder>>,
    released: bool,
}

impl CaptureSession {
    fn new(stream: Arc<dyn MediaStream>) -> Self {
        Self {
            stream,
            recorder: None,
            released: false,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.stream.stop_all();
        if let Some(recorder) = &self.recorder {
            recorder.stop();
        }
        debug!(stream = self.stream.id(), "capture session released");
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Capture controller.
///
/// State machine: IDLE -> CAPTURING (start_capture) -> IDLE (stop_capture).
/// Dropping the controller stops any running capture.
pub struct CaptureController<S, R, F, P>
where
    S: DisplaySource,
    R: RecorderSink,
    F: FileSaveSink,
    P: PreviewSink,
{
    source: S,
    recorder: R,
    saver: F,
    preview: P,
    options: CaptureOptions,
    lifecycle: CaptureLifecycle,
    session: Option<CaptureSession>,
    segments: Arc<Mutex<RecordedSegments>>,
    mime_type: VideoMimeType,
    log: CaptureLog,
    last_attempt_failed: bool,
}

impl<S, R, F, P> CaptureController<S, R, F, P>
where
    S: DisplaySource,
    R: RecorderSink,
    F: FileSaveSink,
    P: PreviewSink,
{
    /// Create a controller with the default options (window surface, no audio)
    pub fn new(source: S, recorder: R, saver: F, preview: P) -> Self {
        Self::with_options(source, recorder, saver, preview, CaptureOptions::default())
    }

    pub fn with_options(
        source: S,
        recorder: R,
        saver: F,
        preview: P,
        options: CaptureOptions,
    ) -> Self {
        Self {
            source,
            recorder,
            saver,
            preview,
            options,
            lifecycle: CaptureLifecycle::new(),
            session: None,
            segments: Arc::new(Mutex::new(RecordedSegments::new())),
            mime_type: VideoMimeType::default(),
            log: CaptureLog::new(),
            last_attempt_failed: false,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.lifecycle.state()
    }

    pub fn is_capturing(&self) -> bool {
        self.lifecycle.is_capturing()
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    /// Read-only view of the capture log
    pub fn log(&self) -> &CaptureLog {
        &self.log
    }

    /// Number of segments recorded in the current (or last) session
    pub fn segment_count(&self) -> usize {
        self.lock_segments().len()
    }

    /// Bytes recorded in the current (or last) session
    pub fn recorded_bytes(&self) -> usize {
        self.lock_segments().total_bytes()
    }

    /// Settings of the live video track, while capturing
    pub fn live_settings(&self) -> Option<TrackSettings> {
        let session = self.session.as_ref()?;
        session.stream.video_tracks().first().map(|t| t.settings())
    }

    pub fn can_start(&self) -> bool {
        self.lifecycle.is_idle()
    }

    pub fn can_stop(&self) -> bool {
        self.lifecycle.is_capturing()
    }

    pub fn can_save(&self) -> bool {
        self.lifecycle.is_idle() && self.segment_count() > 0
    }

    /// Request a display stream and start recording it.
    ///
    /// A failed request is logged and leaves the controller idle. Calling
    /// this while already capturing is refused without side effects.
    pub async fn start_capture(&mut self) -> Result<StartOutcome, ControllerError> {
        self.lifecycle.ensure_can_begin()?;

        // Keep errors from consecutive failed attempts visible
        if !self.last_attempt_failed {
            self.log.reset();
        }

        debug!(options = ?self.options, "requesting display stream");
        let stream = match self.source.request(&self.options).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "display capture request failed");
                self.log.error(e.to_string());
                self.last_attempt_failed = true;
                return Ok(StartOutcome::Failed);
            }
        };

        if self.last_attempt_failed {
            self.log.reset();
            self.last_attempt_failed = false;
        }

        self.preview.bind(stream.as_ref());
        self.lifecycle.begin()?;
        self.session = Some(CaptureSession::new(Arc::clone(&stream)));
        self.dump_options_info(stream.as_ref());

        // Fresh list per session; a previous recorder's late flush keeps
        // writing into the list it was given
        self.segments = Arc::new(Mutex::new(RecordedSegments::new()));
        let segments = Arc::clone(&self.segments);
        let on_data: ChunkCallback = Arc::new(move |segment| {
            segments
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(segment);
        });

        match self.recorder.start(Arc::clone(&stream), on_data) {
            Ok(active) => {
                self.mime_type = active.mime_type();
                if let Some(session) = self.session.as_mut() {
                    session.recorder = Some(active);
                }
                debug!(stream = stream.id(), "capture started");
                Ok(StartOutcome::Started)
            }
            Err(e) => {
                warn!(error = %e, "recorder failed to start");
                self.stop_capture();
                self.log.error(e.to_string());
                self.last_attempt_failed = true;
                Ok(StartOutcome::Failed)
            }
        }
    }

    /// Stop tracks and recorder and return to idle.
    ///
    /// Safe to call at any time; when idle it only writes the state.
    pub fn stop_capture(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
            self.preview.unbind();
        }
        self.lifecycle.end();
    }

    /// Concatenate the recorded segments and hand them to the file-save sink.
    pub async fn save_recording(&mut self) -> Result<SaveOutcome, ControllerError> {
        self.lifecycle.ensure_can_save()?;

        let blob = {
            let segments = self.segments.lock().unwrap_or_else(|e| e.into_inner());
            if segments.is_empty() {
                self.log.info(MSG_NO_DATA);
                return Ok(SaveOutcome::NoData);
            }
            segments.to_blob(self.mime_type)
        };

        debug!(size = blob.size_bytes(), "saving recording");
        let result = self.saver.save(&blob, SAVE_FILENAME).await;
        drop(blob);

        match result {
            Ok(path) => {
                self.log.info(MSG_SAVED);
                Ok(SaveOutcome::Saved(path))
            }
            Err(e) => {
                warn!(error = %e, "saving recording failed");
                self.log.error(e.to_string());
                Ok(SaveOutcome::Failed)
            }
        }
    }

    /// Write the first video track's settings and constraints to the log
    fn dump_options_info(&mut self, stream: &dyn MediaStream) {
        let Some(track) = stream.video_tracks().into_iter().next() else {
            self.log.info("Stream has no video track.");
            return;
        };

        self.log.info("Track settings:");
        self.log.info(to_pretty_json(&track.settings()));
        self.log.info("Track constraints:");
        self.log.info(to_pretty_json(&track.constraints()));
    }

    fn lock_segments(&self) -> std::sync::MutexGuard<'_, RecordedSegments> {
        self.segments.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S, R, F, P> Drop for CaptureController<S, R, F, P>
where
    S: DisplaySource,
    R: RecorderSink,
    F: FileSaveSink,
    P: PreviewSink,
{
    fn drop(&mut self) {
        self.stop_capture();
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CaptureError, MediaTrack, RecorderError, SaveError};
    use crate::domain::capture::{TrackConstraints, TrackKind};
    use crate::domain::recording::{Segment, VideoBlob};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct MockTrack {
        live: AtomicBool,
    }

    impl MediaTrack for MockTrack {
        fn id(&self) -> &str {
            "track-1"
        }

        fn kind(&self) -> TrackKind {
            TrackKind::Video
        }

        fn settings(&self) -> TrackSettings {
            TrackSettings {
                device_id: "mock".to_string(),
                width: Some(640),
                height: Some(480),
                ..Default::default()
            }
        }

        fn constraints(&self) -> TrackConstraints {
            TrackConstraints::default()
        }

        fn stop(&self) {
            self.live.store(false, Ordering::SeqCst);
        }

        fn is_live(&self) -> bool {
            self.live.load(Ordering::SeqCst)
        }
    }

    struct MockStream {
        track: Arc<MockTrack>,
    }

    impl MediaStream for MockStream {
        fn id(&self) -> &str {
            "stream-1"
        }

        fn tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
            vec![self.track.clone() as Arc<dyn MediaTrack>]
        }
    }

    /// Hands out queued results; grants when the queue is empty
    #[derive(Default)]
    struct MockSource {
        results: Mutex<VecDeque<Result<(), CaptureError>>>,
        last_track: Arc<Mutex<Option<Arc<MockTrack>>>>,
    }

    #[async_trait]
    impl DisplaySource for MockSource {
        async fn request(
            &self,
            _options: &CaptureOptions,
        ) -> Result<Arc<dyn MediaStream>, CaptureError> {
            if let Some(Err(e)) = self.results.lock().unwrap().pop_front() {
                return Err(e);
            }
            let track = Arc::new(MockTrack {
                live: AtomicBool::new(true),
            });
            *self.last_track.lock().unwrap() = Some(track.clone());
            Ok(Arc::new(MockStream { track }))
        }
    }

    struct MockActive {
        recording: Arc<AtomicBool>,
        stops: Arc<AtomicUsize>,
    }

    impl ActiveRecorder for MockActive {
        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.recording.store(false, Ordering::SeqCst);
        }

        fn is_recording(&self) -> bool {
            self.recording.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct MockRecorder {
        fail: bool,
        callback: Arc<Mutex<Option<ChunkCallback>>>,
        recording: Arc<AtomicBool>,
        stops: Arc<AtomicUsize>,
    }

    impl RecorderSink for MockRecorder {
        fn start(
            &self,
            _stream: Arc<dyn MediaStream>,
            on_data: ChunkCallback,
        ) -> Result<Box<dyn ActiveRecorder>, RecorderError> {
            if self.fail {
                return Err(RecorderError::StartFailed("encoder busy".to_string()));
            }
            *self.callback.lock().unwrap() = Some(on_data);
            self.recording.store(true, Ordering::SeqCst);
            Ok(Box::new(MockActive {
                recording: self.recording.clone(),
                stops: self.stops.clone(),
            }))
        }
    }

    #[derive(Default)]
    struct MockSaver {
        saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
        fail: bool,
    }

    #[async_trait]
    impl FileSaveSink for MockSaver {
        async fn save(&self, blob: &VideoBlob, filename: &str) -> Result<PathBuf, SaveError> {
            if self.fail {
                return Err(SaveError::WriteFailed("disk full".to_string()));
            }
            self.saved
                .lock()
                .unwrap()
                .push((filename.to_string(), blob.data().to_vec()));
            Ok(PathBuf::from(filename))
        }
    }

    #[derive(Default)]
    struct MockPreview {
        bound: AtomicBool,
    }

    impl PreviewSink for MockPreview {
        fn bind(&self, _stream: &dyn MediaStream) {
            self.bound.store(true, Ordering::SeqCst);
        }

        fn unbind(&self) {
            self.bound.store(false, Ordering::SeqCst);
        }
    }

    type TestController = CaptureController<MockSource, MockRecorder, MockSaver, MockPreview>;

    fn controller() -> TestController {
        CaptureController::new(
            MockSource::default(),
            MockRecorder::default(),
            MockSaver::default(),
            MockPreview::default(),
        )
    }

    fn deliver(controller: &TestController, bytes: &[u8]) {
        let callback = controller.recorder.callback.lock().unwrap().clone();
        (callback.expect("recorder not started"))(Segment::from(bytes));
    }

    #[tokio::test]
    async fn start_from_idle() {
        let mut c = controller();
        assert!(c.can_start());

        let outcome = c.start_capture().await.unwrap();
        assert_eq!(outcome, StartOutcome::Started);
        assert_eq!(c.state(), CaptureState::Capturing);
        assert_eq!(c.segment_count(), 0);
        assert!(c.preview.bound.load(Ordering::SeqCst));
        assert!(c.can_stop());
        assert!(!c.can_start());
    }

    #[tokio::test]
    async fn start_dumps_track_info() {
        let mut c = controller();
        c.start_capture().await.unwrap();

        let text = c.log().text();
        assert!(text.contains("Track settings:"));
        assert!(text.contains("\"width\": 640"));
        assert!(text.contains("Track constraints:"));
        assert_eq!(c.log().error_count(), 0);
    }

    #[tokio::test]
    async fn start_while_capturing_is_refused() {
        let mut c = controller();
        c.start_capture().await.unwrap();

        let err = c.start_capture().await.unwrap_err();
        assert!(err.to_string().contains("start capture"));
        assert!(c.is_capturing());
    }

    #[tokio::test]
    async fn denied_start_logs_one_error() {
        let mut c = controller();
        c.source
            .results
            .lock()
            .unwrap()
            .push_back(Err(CaptureError::PermissionDenied("not allowed".to_string())));

        let outcome = c.start_capture().await.unwrap();
        assert_eq!(outcome, StartOutcome::Failed);
        assert_eq!(c.state(), CaptureState::Idle);
        assert_eq!(c.log().error_count(), 1);
        assert!(c.log().text().contains("Error: Permission denied: not allowed"));
    }

    #[tokio::test]
    async fn recorder_failure_releases_stream() {
        let mut c = CaptureController::new(
            MockSource::default(),
            MockRecorder {
                fail: true,
                ..Default::default()
            },
            MockSaver::default(),
            MockPreview::default(),
        );

        let outcome = c.start_capture().await.unwrap();
        assert_eq!(outcome, StartOutcome::Failed);
        assert_eq!(c.state(), CaptureState::Idle);
        assert!(!c.preview.bound.load(Ordering::SeqCst));

        let track = c.source.last_track.lock().unwrap().clone().unwrap();
        assert!(!track.is_live());
        assert!(c.log().text().contains("Error: Failed to start recorder"));
    }

    #[tokio::test]
    async fn stop_releases_tracks_and_recorder() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        let track = c.source.last_track.lock().unwrap().clone().unwrap();

        c.stop_capture();

        assert_eq!(c.state(), CaptureState::Idle);
        assert!(!track.is_live());
        assert!(!c.recorder.recording.load(Ordering::SeqCst));
        assert_eq!(c.recorder.stops.load(Ordering::SeqCst), 1);
        assert!(!c.preview.bound.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stop_when_idle_is_noop() {
        let mut c = controller();
        c.stop_capture();
        c.stop_capture();

        assert_eq!(c.state(), CaptureState::Idle);
        assert_eq!(c.recorder.stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn save_without_data_logs_message() {
        let mut c = controller();
        assert!(!c.can_save());

        let outcome = c.save_recording().await.unwrap();
        assert_eq!(outcome, SaveOutcome::NoData);
        assert!(c.saver.saved.lock().unwrap().is_empty());
        assert!(c.log().text().contains(MSG_NO_DATA));
    }

    #[tokio::test]
    async fn save_while_capturing_is_refused() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        deliver(&c, b"chunk");

        assert!(!c.can_save());
        assert!(c.save_recording().await.is_err());
        assert!(c.saver.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_concatenates_in_delivery_order() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        deliver(&c, b"one-");
        deliver(&c, b"two");
        c.stop_capture();

        assert!(c.can_save());
        let outcome = c.save_recording().await.unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(PathBuf::from(SAVE_FILENAME)));

        let saved = c.saver.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, SAVE_FILENAME);
        assert_eq!(saved[0].1, b"one-two");
        assert!(c.log().text().contains(MSG_SAVED));
    }

    #[tokio::test]
    async fn chunks_flushed_after_stop_are_kept() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        deliver(&c, b"a");
        c.stop_capture();
        deliver(&c, b"b");

        assert_eq!(c.segment_count(), 2);
        assert_eq!(c.recorded_bytes(), 2);
    }

    #[tokio::test]
    async fn failed_save_keeps_segments() {
        let mut c = CaptureController::new(
            MockSource::default(),
            MockRecorder::default(),
            MockSaver {
                fail: true,
                ..Default::default()
            },
            MockPreview::default(),
        );
        c.start_capture().await.unwrap();
        deliver(&c, b"data");
        c.stop_capture();

        let outcome = c.save_recording().await.unwrap();
        assert_eq!(outcome, SaveOutcome::Failed);
        assert!(c.log().text().contains("Error: Failed to write file: disk full"));
        assert!(c.can_save());
    }

    #[tokio::test]
    async fn new_session_clears_segments_and_log() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        deliver(&c, b"old");
        c.stop_capture();
        c.save_recording().await.unwrap();

        c.start_capture().await.unwrap();
        assert_eq!(c.segment_count(), 0);
        assert!(!c.log().text().contains(MSG_SAVED));
    }

    #[tokio::test]
    async fn consecutive_failures_accumulate_error_lines() {
        let mut c = controller();
        {
            let mut results = c.source.results.lock().unwrap();
            results.push_back(Err(CaptureError::Cancelled));
            results.push_back(Err(CaptureError::NoSource("no display".to_string())));
        }

        c.start_capture().await.unwrap();
        assert_eq!(c.state(), CaptureState::Idle);
        c.start_capture().await.unwrap();
        assert_eq!(c.state(), CaptureState::Idle);

        assert_eq!(c.log().error_count(), 2);

        // A successful attempt starts with a fresh log
        c.start_capture().await.unwrap();
        assert_eq!(c.log().error_count(), 0);
    }

    #[tokio::test]
    async fn success_after_failure_starts_fresh_log() {
        let mut c = controller();
        c.source
            .results
            .lock()
            .unwrap()
            .push_back(Err(CaptureError::Cancelled));

        c.start_capture().await.unwrap();
        assert_eq!(c.log().error_count(), 1);

        c.start_capture().await.unwrap();
        assert_eq!(c.state(), CaptureState::Capturing);
        assert!(c.log().text().starts_with("Track settings:"));
        assert!(!c.log().text().contains("Error:"));
    }

    #[tokio::test]
    async fn late_flush_from_previous_session_is_not_recorded() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        let previous = c.recorder.callback.lock().unwrap().clone().unwrap();
        c.stop_capture();

        c.start_capture().await.unwrap();
        previous(Segment::from(&b"OLD-TAIL"[..]));
        deliver(&c, b"new");
        c.stop_capture();

        assert_eq!(c.segment_count(), 1);
        c.save_recording().await.unwrap();
        let saved = c.saver.saved.lock().unwrap();
        assert_eq!(saved[0].1, b"new");
    }

    #[tokio::test]
    async fn drop_while_capturing_stops_everything() {
        let mut c = controller();
        c.start_capture().await.unwrap();
        let track = c.source.last_track.lock().unwrap().clone().unwrap();
        let recording = c.recorder.recording.clone();
        let stops = c.recorder.stops.clone();

        drop(c);

        assert!(!track.is_live());
        assert!(!recording.load(Ordering::SeqCst));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
