//! StoreSession: one lazily connected content-store handle.

use ferry_core::{Environment, Fingerprint, HashAlgorithm, LogicalPath};

use crate::digest::ContentDigest;
use crate::error::TransferError;
use crate::traits::{ContentStore, StoreConnector};

/// Owns the connector and, after first use, the store handle it produced.
///
/// The handle lives as long as the session; a failed connect is retried on
/// the next call.
pub struct StoreSession<C: StoreConnector> {
    connector: C,
    store: Option<C::Store>,
    digest: ContentDigest,
}

impl<C: StoreConnector> StoreSession<C> {
    pub fn new(connector: C, algorithm: HashAlgorithm) -> Self {
        StoreSession {
            connector,
            store: None,
            digest: ContentDigest::new(algorithm),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    pub fn digest(&self) -> ContentDigest {
        self.digest
    }

    /// The store handle, connecting on first call.
    pub fn store(&mut self) -> Result<&mut C::Store, TransferError> {
        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let store = self.connector.connect()?;
                tracing::debug!("connected to content store");
                store
            }
        };
        Ok(self.store.insert(store))
    }

    /// Fingerprint of `path`: asked of the store for remote paths, computed
    /// locally for bare local paths. `None` when absent.
    pub fn hash_file(
        &mut self,
        path: &LogicalPath,
        env: &Environment,
    ) -> Result<Option<Fingerprint>, TransferError> {
        match path.as_local() {
            Some(local) => self.digest.digest_file(local),
            None => self.store()?.resolve_fingerprint(path, env),
        }
    }
}
