//! Live preview port interface

use super::display_source::MediaStream;

/// Port for showing the captured stream while it is live
pub trait PreviewSink: Send + Sync {
    /// Attach a stream to the preview
    fn bind(&self, stream: &dyn MediaStream);

    /// Detach whatever stream is bound. Does nothing when unbound.
    fn unbind(&self);
}

/// Preview that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreview;

impl PreviewSink for NoPreview {
    fn bind(&self, _stream: &dyn MediaStream) {}

    fn unbind(&self) {}
}
