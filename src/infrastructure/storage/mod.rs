mod chunked_reader;
mod local_upload_store;

pub use chunked_reader::{ChunkedFileReader, DEFAULT_CHUNK_SIZE, read_chunks};
pub use local_upload_store::{LocalUploadStore, StagedUpload, UploadStoreError};
