//! File save port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::VideoBlob;

/// File save errors
#[derive(Debug, Clone, Error)]
pub enum SaveError {
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Failed to write file: {0}")]
    WriteFailed(String),
}

/// Port for handing a finished recording to the user as a file
#[async_trait]
pub trait FileSaveSink: Send + Sync {
    /// Save `blob` under the suggested `filename`.
    ///
    /// # Returns
    /// Where the file ended up
    async fn save(&self, blob: &VideoBlob, filename: &str) -> Result<PathBuf, SaveError>;
}
