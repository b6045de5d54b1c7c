//! Filesystem-backed collaborators, so a single host can act as both the
//! pushing side and the content store.
//!
//! - [`LocalAuthenticator`]: credentials from the configured token
//! - [`SpoolTransport`]: receiver that writes accepted chunks under a spool dir
//! - [`LocalStoreConnector`] / [`LocalStore`]: `remote://` paths backed by
//!   per-environment directories

mod auth;
mod spool;
mod store;

pub use auth::LocalAuthenticator;
pub use spool::SpoolTransport;
pub use store::{LocalStore, LocalStoreConnector};

use std::path::{Component, Path};

/// `true` when every component of `path` is a plain name.
pub(crate) fn is_contained(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
        && path.components().next().is_some()
}
