//! # ferry-transfer
//!
//! Integrity-verified file transfer.
//!
//! - Push: [`TransferSession::push_file`] sends one file in chunks under a
//!   lazily obtained credential; [`PushEngine::push_path`] walks a tree with
//!   an optional glob and pushes every file, best-effort.
//! - Pull: [`PullEngine::get_file`] / [`PullEngine::get_dir`] fetch through a
//!   [`StoreSession`] and fingerprint the materialised files locally.
//! - [`IntegrityCheck::verify_match`] compares a remote and a local file
//!   without transferring anything.
//!
//! The authentication, transport and content-store collaborators are traits
//! ([`Authenticator`], [`Transport`], [`StoreConnector`]); [`local`] has
//! filesystem-backed implementations.

pub mod digest;
pub mod error;
pub mod integrity;
pub mod local;
pub mod pathset;
pub mod protocol;
pub mod pull;
pub mod push;
pub mod session;
pub mod store;
pub mod traits;

pub use digest::ContentDigest;
pub use error::TransferError;
pub use integrity::IntegrityCheck;
pub use local::{LocalAuthenticator, LocalStore, LocalStoreConnector, SpoolTransport};
pub use pathset::{enumerate, validate_local_path, GlobFilter, PathSet, PathWalk};
pub use protocol::{Ack, ChunkMessage, FILE_RECV_COMMAND};
pub use pull::{PullEngine, PullOptions};
pub use push::PushEngine;
pub use session::{SessionConfig, TransferSession};
pub use store::StoreSession;
pub use traits::{Authenticator, ContentStore, StoreConnector, Transport};
