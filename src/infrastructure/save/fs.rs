//! Filesystem file-save adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{FileSaveSink, SaveError};
use crate::domain::recording::VideoBlob;

/// Saves recordings into a directory
pub struct FsFileSaveSink {
    dir: PathBuf,
}

impl FsFileSaveSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reject names that would escape the output directory
    fn validate_filename(filename: &str) -> Result<(), SaveError> {
        let invalid = filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains('/')
            || filename.contains('\\');
        if invalid {
            return Err(SaveError::InvalidFileName(filename.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FileSaveSink for FsFileSaveSink {
    async fn save(&self, blob: &VideoBlob, filename: &str) -> Result<PathBuf, SaveError> {
        Self::validate_filename(filename)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SaveError::WriteFailed(format!("{}: {}", self.dir.display(), e)))?;

        let target = self.dir.join(filename);
        let partial = self.dir.join(format!(".{}.part", filename));

        // Write next to the target, then move into place
        fs::write(&partial, blob.data())
            .await
            .map_err(|e| SaveError::WriteFailed(format!("{}: {}", partial.display(), e)))?;
        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(SaveError::WriteFailed(format!("{}: {}", target.display(), e)));
        }

        debug!(path = %target.display(), bytes = blob.size_bytes(), "recording written");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::VideoMimeType;

    #[tokio::test]
    async fn writes_blob_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsFileSaveSink::new(dir.path().join("videos"));
        let blob = VideoBlob::new(b"webm".to_vec(), VideoMimeType::Webm);

        let path = sink.save(&blob, "screen-capture.webm").await.unwrap();

        assert_eq!(path, dir.path().join("videos").join("screen-capture.webm"));
        assert_eq!(std::fs::read(&path).unwrap(), b"webm");
        assert!(!dir.path().join("videos").join(".screen-capture.webm.part").exists());
    }

    #[tokio::test]
    async fn overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsFileSaveSink::new(dir.path());

        sink.save(&VideoBlob::new(b"first".to_vec(), VideoMimeType::Webm), "a.webm")
            .await
            .unwrap();
        let path = sink
            .save(&VideoBlob::new(b"second".to_vec(), VideoMimeType::Webm), "a.webm")
            .await
            .unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsFileSaveSink::new(dir.path());
        let blob = VideoBlob::new(vec![1], VideoMimeType::Webm);

        for name in ["", "..", "../escape.webm", "a/b.webm"] {
            let err = sink.save(&blob, name).await.unwrap_err();
            assert!(matches!(err, SaveError::InvalidFileName(_)), "{}", name);
        }
    }
}
