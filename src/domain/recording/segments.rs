//! Recorded segment list

use super::blob::{VideoBlob, VideoMimeType};

/// One binary chunk emitted by a recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment(Vec<u8>);

impl Segment {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Segment {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Segment {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

/// Ordered, append-only list of segments recorded during one session.
///
/// Segments keep delivery order and are never reordered or deduplicated.
#[derive(Debug, Default)]
pub struct RecordedSegments {
    segments: Vec<Segment>,
    total_bytes: usize,
}

impl RecordedSegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Empty segments are dropped.
    ///
    /// Returns whether the segment was kept.
    pub fn push(&mut self, segment: Segment) -> bool {
        if segment.is_empty() {
            return false;
        }
        self.total_bytes += segment.len();
        self.segments.push(segment);
        true
    }

    /// Remove every segment
    pub fn clear(&mut self) {
        self.segments.clear();
        self.total_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total payload size across all segments
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Concatenate all segments into a single blob, in delivery order
    pub fn to_blob(&self, mime_type: VideoMimeType) -> VideoBlob {
        let mut data = Vec::with_capacity(self.total_bytes);
        for segment in &self.segments {
            data.extend_from_slice(segment.as_bytes());
        }
        VideoBlob::new(data, mime_type)
    }
}
