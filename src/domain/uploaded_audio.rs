use std::path::PathBuf;

use super::UploadId;

/// An audio file received from a client and staged on local disk for the
/// duration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAudio {
    pub id: UploadId,
    pub original_filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl UploadedAudio {
    pub fn new(id: UploadId, original_filename: String, path: PathBuf, size_bytes: u64) -> Self {
        Self {
            id,
            original_filename,
            path,
            size_bytes,
        }
    }
}
