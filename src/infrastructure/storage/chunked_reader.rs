use std::io;
use std::path::Path;

use bytes::Bytes;
use futures::Stream;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

pub const DEFAULT_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Forward-only reader yielding a file in blocks of exactly `chunk_size`
/// bytes, except the last block which holds the remainder.
pub struct ChunkedFileReader {
    file: File,
    chunk_size: usize,
}

impl ChunkedFileReader {
    pub async fn open(path: &Path, chunk_size: usize) -> io::Result<Self> {
        if chunk_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "chunk size must be greater than zero",
            ));
        }
        let file = File::open(path).await?;
        Ok(Self { file, chunk_size })
    }

    /// Returns `None` once end of file is reached.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;

        while filled < self.chunk_size {
            let read = self.file.read(&mut buf[filled..]).await?;
            if read == 0 {
                break;
            }
            filled += read;
        }

        if filled == 0 {
            return Ok(None);
        }

        buf.truncate(filled);
        Ok(Some(Bytes::from(buf)))
    }

    pub fn into_stream(self) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
        stream::try_unfold(self, |mut reader| async move {
            Ok(reader.next_chunk().await?.map(|chunk| (chunk, reader)))
        })
    }
}

pub async fn read_chunks(
    path: &Path,
    chunk_size: usize,
) -> io::Result<BoxStream<'static, io::Result<Bytes>>> {
    let reader = ChunkedFileReader::open(path, chunk_size).await?;
    Ok(reader.into_stream().boxed())
}
