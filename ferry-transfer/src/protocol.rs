//! Push wire messages and the chunk reader that feeds them.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ferry_core::ChunkOffset;

/// Command tag carried by every push chunk.
pub const FILE_RECV_COMMAND: &str = "_file_recv";

/// One push chunk, fields in wire order.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMessage {
    pub command: String,
    pub identity: String,
    /// Destination path with leading separators stripped.
    pub path: String,
    pub offset: ChunkOffset,
    pub data: Vec<u8>,
    pub token: String,
}

impl fmt::Debug for ChunkMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkMessage")
            .field("command", &self.command)
            .field("identity", &self.identity)
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("data_len", &self.data.len())
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Positive acknowledgement of a chunk. Absence of an `Ack` is the only
/// failure signal the protocol has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Bytes of the chunk the receiver stored.
    pub received: u64,
}

/// Destination path sent to the receiver: the local path without its
/// leading separators.
pub fn destination_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    raw.trim_start_matches(std::path::MAIN_SEPARATOR)
        .trim_start_matches('/')
        .to_string()
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Bytes of one chunk and where they start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub offset: ChunkOffset,
    pub data: Vec<u8>,
}

/// Sequential fixed-size reader. Offsets strictly increase; an empty input
/// still yields one empty chunk.
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: usize,
    offset: ChunkOffset,
    started: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        ChunkReader {
            reader,
            chunk_size: chunk_size.max(1),
            offset: ChunkOffset::START,
            started: false,
        }
    }

    pub fn next_chunk(&mut self) -> std::io::Result<Option<Chunk>> {
        let mut data = Vec::with_capacity(self.chunk_size);
        (&mut self.reader)
            .take(self.chunk_size as u64)
            .read_to_end(&mut data)?;
        if data.is_empty() && self.started {
            return Ok(None);
        }
        self.started = true;
        let chunk = Chunk {
            offset: self.offset,
            data,
        };
        self.offset = self.offset.advance(chunk.data.len());
        Ok(Some(chunk))
    }
}
