//! Error types for ferry-transfer.

use std::path::PathBuf;

use thiserror::Error;

use ferry_core::RejectReason;
use ferry_renderer::RenderError;

/// All errors that can arise from transfer operations.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Relative path or `..` segment. Raised before any filesystem access.
    #[error("path must be absolute and free of '..' segments: {path}")]
    InvalidPath { path: PathBuf },

    /// Push precondition: the resolved path is not an existing regular file.
    #[error("not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// The remote endpoint returned no acknowledgement for a chunk.
    #[error(
        "transfer of {path} was denied; ensure the receiver accepts pushes and the file \
         is within its size limit"
    )]
    TransferDenied { path: PathBuf },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The authentication collaborator could not issue a credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The content-store collaborator failed to resolve or fetch a path.
    #[error("content store error: {0}")]
    Store(String),

    /// Filename templating failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    /// Reason recorded when this error ends a single file's transfer.
    pub fn reject_reason(&self) -> RejectReason {
        match self {
            TransferError::InvalidPath { .. } => RejectReason::InvalidPath,
            TransferError::NotAFile { .. } => RejectReason::NotAFile,
            TransferError::TransferDenied { .. } => RejectReason::TransferDenied,
            other => RejectReason::Failed(other.to_string()),
        }
    }
}

/// Convenience constructor for [`TransferError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TransferError {
    TransferError::Io {
        path: path.into(),
        source,
    }
}
