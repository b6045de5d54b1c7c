//! Ferry core library: domain types, configuration, errors.
//!
//! - [`types`]: logical paths, fingerprints, credentials, transfer outcomes
//! - [`config`]: `~/.ferry/config.yaml` loading and the legacy `env` shim
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{reconcile_environment, FerryConfig};
pub use error::ConfigError;
pub use types::{
    ChunkOffset, Credential, DirectoryTransferResult, Environment, Fingerprint,
    FingerprintParseError, HashAlgorithm, LogicalPath, RejectReason, SkipReason,
    TransferOutcome, DEFAULT_ENVIRONMENT, REMOTE_SCHEME,
};
