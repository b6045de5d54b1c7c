use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use ferry_core::FerryConfig;

use crate::protocol::{Ack, ChunkMessage, FILE_RECV_COMMAND};
use crate::traits::Transport;

use super::is_contained;

/// Receiving end of a push, writing under `<root>/<identity>/files/<path>`.
///
/// Every refusal is a `None` acknowledgement; the reason is only logged.
#[derive(Debug, Clone)]
pub struct SpoolTransport {
    root: PathBuf,
    accept: bool,
    max_size: Option<u64>,
    expected_token: Option<String>,
}

impl SpoolTransport {
    pub fn new(root: impl Into<PathBuf>, accept: bool, expected_token: Option<String>) -> Self {
        SpoolTransport {
            root: root.into(),
            accept,
            max_size: None,
            expected_token,
        }
    }

    pub fn from_config(config: &FerryConfig) -> Self {
        SpoolTransport::new(config.spool_dir.clone(), config.accept_pushes, config.token.clone())
            .with_max_size(config.max_push_size)
    }

    pub fn with_max_size(mut self, max_size: Option<u64>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Where a pushed `path` from `identity` lands.
    pub fn received_path(&self, identity: &str, path: &str) -> PathBuf {
        self.root.join(identity).join("files").join(path)
    }

    fn refuse(&self, message: &ChunkMessage) -> Option<&'static str> {
        if !self.accept {
            return Some("pushes are disabled on this receiver");
        }
        if message.command != FILE_RECV_COMMAND {
            return Some("unknown command");
        }
        if self.expected_token.as_deref() != Some(message.token.as_str()) {
            return Some("invalid token");
        }
        if !is_contained(Path::new(&message.identity)) || !is_contained(Path::new(&message.path))
        {
            return Some("path escapes the spool");
        }
        let Some(end) = message.offset.value().checked_add(message.data.len() as u64) else {
            return Some("offset out of range");
        };
        if self.max_size.is_some_and(|max| end > max) {
            return Some("file exceeds the size limit");
        }
        None
    }

    fn write_chunk(&self, message: &ChunkMessage) -> std::io::Result<()> {
        let dest = self.received_path(&message.identity, &message.path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(message.offset.value() == 0)
            .open(&dest)?;
        file.seek(SeekFrom::Start(message.offset.value()))?;
        file.write_all(&message.data)?;
        Ok(())
    }
}

impl Transport for SpoolTransport {
    fn send(&mut self, message: &ChunkMessage) -> Option<Ack> {
        if let Some(reason) = self.refuse(message) {
            tracing::warn!("refusing chunk for {}: {reason}", message.path);
            return None;
        }
        if let Err(err) = self.write_chunk(message) {
            tracing::warn!("failed to store chunk for {}: {err}", message.path);
            return None;
        }
        Some(Ack {
            received: message.data.len() as u64,
        })
    }
}
