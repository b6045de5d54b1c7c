//! IntegrityCheck: read-only comparison of a remote and a local file.

use std::path::Path;

use ferry_core::{Environment, LogicalPath};

use crate::error::TransferError;
use crate::store::StoreSession;
use crate::traits::StoreConnector;

pub struct IntegrityCheck<'s, C: StoreConnector> {
    session: &'s mut StoreSession<C>,
}

impl<'s, C: StoreConnector> IntegrityCheck<'s, C> {
    pub fn new(session: &'s mut StoreSession<C>) -> Self {
        IntegrityCheck { session }
    }

    /// `true` iff both fingerprints exist and are equal.
    ///
    /// A missing local file is logged and compares as a mismatch without
    /// asking the store. Two absent fingerprints do not match.
    pub fn verify_match(
        &mut self,
        remote: &LogicalPath,
        local: &Path,
        env: &Environment,
    ) -> Result<bool, TransferError> {
        if !local.exists() {
            tracing::error!("local file {} does not exist", local.display());
            return Ok(false);
        }
        let local_fp = self.session.digest().digest_file(local)?;
        let remote_fp = self.session.hash_file(remote, env)?;
        let matched = matches!((&local_fp, &remote_fp), (Some(l), Some(r)) if l == r);
        tracing::debug!(
            "{remote} vs {}: {}",
            local.display(),
            if matched { "match" } else { "mismatch" }
        );
        Ok(matched)
    }
}
