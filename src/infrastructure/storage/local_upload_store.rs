use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::io::AsyncWriteExt;

use crate::domain::{StoragePath, UploadId, UploadedAudio};

/// Stages uploaded audio files in a local directory.
pub struct LocalUploadStore {
    base_path: PathBuf,
}

impl LocalUploadStore {
    pub fn new(base_path: PathBuf) -> Result<Self, UploadStoreError> {
        std::fs::create_dir_all(&base_path).map_err(UploadStoreError::Io)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Writes `stream` to a new file named after `filename`. The returned
    /// guard removes the file when dropped.
    pub async fn store<E>(
        &self,
        filename: &str,
        mut stream: BoxStream<'_, Result<Bytes, E>>,
    ) -> Result<StagedUpload, UploadStoreError>
    where
        E: std::fmt::Display,
    {
        let id = UploadId::new();
        let storage_path = StoragePath::new(&id, filename);
        let path = self.base_path.join(storage_path.as_str());

        let file = tokio::fs::File::create(&path)
            .await
            .map_err(UploadStoreError::Io)?;
        let guard = StagedUpload::new(UploadedAudio::new(
            id,
            filename.to_string(),
            path.clone(),
            0,
        ));
        let mut file = tokio::io::BufWriter::new(file);

        let mut total_bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| UploadStoreError::ReadFailed(e.to_string()))?;
            total_bytes += bytes.len() as u64;
            file.write_all(&bytes).await.map_err(UploadStoreError::Io)?;
        }
        file.flush().await.map_err(UploadStoreError::Io)?;

        tracing::debug!(path = %path.display(), bytes = total_bytes, "Upload staged");

        Ok(guard.with_size(total_bytes))
    }
}

/// An uploaded file on disk, deleted when this value is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    audio: UploadedAudio,
}

impl StagedUpload {
    fn new(audio: UploadedAudio) -> Self {
        Self { audio }
    }

    fn with_size(mut self, size_bytes: u64) -> Self {
        self.audio.size_bytes = size_bytes;
        self
    }

    pub fn audio(&self) -> &UploadedAudio {
        &self.audio
    }

    pub fn path(&self) -> &Path {
        &self.audio.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.audio.path) {
            Ok(()) => {
                tracing::debug!(path = %self.audio.path.display(), "Staged upload removed");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.audio.path.display(),
                    "Failed to delete staged upload"
                );
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadStoreError {
    #[error("failed to read upload: {0}")]
    ReadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
