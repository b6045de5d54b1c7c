//! Collaborator seams: authentication, chunk transport, content store.
//!
//! All calls are blocking. Implementations decide their own timeouts.

use std::path::{Path, PathBuf};

use ferry_core::{Credential, Environment, Fingerprint, LogicalPath};

use crate::error::TransferError;
use crate::protocol::{Ack, ChunkMessage};

/// Issues the credential a [`TransferSession`](crate::TransferSession)
/// attaches to every chunk.
pub trait Authenticator {
    fn authenticate(&mut self) -> Result<Credential, TransferError>;
}

/// Moves one chunk message to the remote endpoint.
pub trait Transport {
    /// `None` means the chunk was not accepted, for whatever reason.
    fn send(&mut self, message: &ChunkMessage) -> Option<Ack>;
}

/// Resolves logical paths to fingerprints and local files.
///
/// Paths without the remote scheme are treated as already local.
pub trait ContentStore {
    /// Fingerprint of `path` in `env`; `None` when it does not exist.
    fn resolve_fingerprint(
        &mut self,
        path: &LogicalPath,
        env: &Environment,
    ) -> Result<Option<Fingerprint>, TransferError>;

    /// Materialise `path` at `dest`, creating missing parent directories
    /// only when `makedirs` is set. Returns the local path written.
    fn fetch_file(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        makedirs: bool,
        env: &Environment,
    ) -> Result<PathBuf, TransferError>;

    /// Materialise every file under the remote directory `path` below
    /// `dest`. Returns the local paths written, in store order.
    fn fetch_dir(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        env: &Environment,
    ) -> Result<Vec<PathBuf>, TransferError>;
}

/// Opens a [`ContentStore`] handle. Called at most once per
/// [`StoreSession`](crate::StoreSession).
pub trait StoreConnector {
    type Store: ContentStore;

    fn connect(&self) -> Result<Self::Store, TransferError>;
}
