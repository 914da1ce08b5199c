//! Fixed-size chunking for files too large to return whole.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, ServerError};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub content: String,
    pub chunk_number: u64,
    pub total_chunks: u64,
}

/// ceil(size / chunk_size); zero for an empty input.
pub fn chunks_for(size: u64, chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    size.div_ceil(chunk_size)
}

/// Reads chunk `chunk_number` (0-based) of a file as lossy UTF-8.
///
/// A chunk past the end yields empty content rather than an error.
pub fn read_chunk(path: &Path, chunk_number: u64, chunk_size: u64) -> Result<Chunk> {
    if chunk_size == 0 {
        return Err(ServerError::InvalidArguments("chunkSize must be positive".to_string()));
    }

    let io_err = |e| ServerError::from_io(e, path);
    let mut file = File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    let total_chunks = chunks_for(size, chunk_size);

    if chunk_number >= total_chunks {
        return Ok(Chunk {
            content: String::new(),
            chunk_number,
            total_chunks,
        });
    }

    file.seek(SeekFrom::Start(chunk_number * chunk_size))
        .map_err(io_err)?;
    let mut buf = Vec::with_capacity(chunk_size as usize);
    file.take(chunk_size).read_to_end(&mut buf).map_err(io_err)?;

    Ok(Chunk {
        content: String::from_utf8_lossy(&buf).into_owned(),
        chunk_number,
        total_chunks,
    })
}
