//! PushEngine: best-effort directory pushes on top of [`TransferSession`].

use std::path::Path;

use ferry_core::{DirectoryTransferResult, TransferOutcome};

use crate::pathset::{validate_local_path, PathSet};
use crate::session::TransferSession;
use crate::traits::{Authenticator, Transport};

/// Pushes a file or a whole tree through a borrowed session.
///
/// One file's failure never stops the batch: every enumerated file gets an
/// outcome, in traversal order.
pub struct PushEngine<'s, A, T> {
    session: &'s mut TransferSession<A, T>,
}

impl<'s, A: Authenticator, T: Transport> PushEngine<'s, A, T> {
    pub fn new(session: &'s mut TransferSession<A, T>) -> Self {
        PushEngine { session }
    }

    /// Push `root`, filtered by `glob` when it is a directory.
    pub fn push_path(&mut self, root: &Path, glob: Option<&str>) -> DirectoryTransferResult {
        if let Err(err) = validate_local_path(root) {
            return DirectoryTransferResult::single(TransferOutcome::Rejected {
                path: root.to_path_buf(),
                reason: err.reject_reason(),
            });
        }

        let resolved = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        if resolved.is_file() {
            return DirectoryTransferResult::single(self.session.push_file(&resolved, false));
        }

        let set = match PathSet::new(&resolved).and_then(|set| set.with_glob(glob)) {
            Ok(set) => set,
            Err(err) => {
                tracing::error!("{err}");
                return DirectoryTransferResult::single(TransferOutcome::Rejected {
                    path: root.to_path_buf(),
                    reason: err.reject_reason(),
                });
            }
        };

        let result: DirectoryTransferResult = set
            .enumerate()
            .map(|file| self.session.push_file(&file, false))
            .collect();
        tracing::info!(
            "pushed {}/{} files from {}",
            result.success_count(),
            result.len(),
            resolved.display()
        );
        result
    }
}
