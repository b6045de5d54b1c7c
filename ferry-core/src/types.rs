//! Domain types shared by every ferry crate.
//!
//! All local filesystem paths are `PathBuf`; remote resources are
//! [`LogicalPath`]s, which are never converted to `PathBuf` implicitly.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Scheme prefix marking a logical path that is resolved by the content store.
pub const REMOTE_SCHEME: &str = "remote://";

/// Name of the environment used when none is given.
pub const DEFAULT_ENVIRONMENT: &str = "base";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a remote resource.
///
/// `remote://<rel>` resolves against the content store; any other value is a
/// bare local path the store treats as already resident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalPath(String);

impl LogicalPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the path carries the [`REMOTE_SCHEME`] prefix.
    pub fn is_remote(&self) -> bool {
        self.0.starts_with(REMOTE_SCHEME)
    }

    /// Store-relative part of a remote path, without the scheme or any
    /// leading separators. `None` for local paths.
    pub fn remote_relative(&self) -> Option<&str> {
        self.0
            .strip_prefix(REMOTE_SCHEME)
            .map(|rest| rest.trim_start_matches('/'))
    }

    /// The path as a local filesystem path. `None` for remote paths.
    pub fn as_local(&self) -> Option<&Path> {
        if self.is_remote() {
            None
        } else {
            Some(Path::new(&self.0))
        }
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LogicalPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LogicalPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Named partition of the content store's namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Environment(pub String);

impl Default for Environment {
    fn default() -> Self {
        Self(DEFAULT_ENVIRONMENT.to_owned())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Environment {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Byte offset of a chunk within the file being pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ChunkOffset(pub u64);

impl ChunkOffset {
    pub const START: ChunkOffset = ChunkOffset(0);

    pub fn value(self) -> u64 {
        self.0
    }

    /// Offset immediately after `len` more bytes.
    pub fn advance(self, len: usize) -> Self {
        Self(self.0 + len as u64)
    }
}

impl fmt::Display for ChunkOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Fingerprints
// ---------------------------------------------------------------------------

/// Digest algorithm a [`Fingerprint`] was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Tag used in the textual `<tag>:<hex>` form.
    pub fn tag(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FingerprintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(FingerprintParseError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

/// Failure parsing a `<tag>:<hex>` fingerprint string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintParseError {
    #[error("unknown hash algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("fingerprint must look like '<algorithm>:<hex>', got '{0}'")]
    Malformed(String),

    #[error("{algorithm} digest must be {expected} bytes, got {actual}")]
    WrongLength {
        algorithm: HashAlgorithm,
        expected: usize,
        actual: usize,
    },
}

/// Content digest tagged with the algorithm that produced it.
///
/// Equality compares the tag and the digest bytes. An absent resource has no
/// fingerprint at all; APIs express that as `Option<Fingerprint>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint {
    algorithm: HashAlgorithm,
    digest: Vec<u8>,
}

impl Fingerprint {
    /// Build a fingerprint from raw digest bytes.
    ///
    /// Returns an error when `digest` does not have the algorithm's length.
    pub fn new(algorithm: HashAlgorithm, digest: Vec<u8>) -> Result<Self, FingerprintParseError> {
        if digest.len() != algorithm.digest_len() {
            return Err(FingerprintParseError::WrongLength {
                algorithm,
                expected: algorithm.digest_len(),
                actual: digest.len(),
            });
        }
        Ok(Self { algorithm, digest })
    }

    pub fn from_sha256(digest: [u8; 32]) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            digest: digest.to_vec(),
        }
    }

    pub fn from_sha512(digest: [u8; 64]) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha512,
            digest: digest.to_vec(),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.digest)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, digest) = s
            .split_once(':')
            .ok_or_else(|| FingerprintParseError::Malformed(s.to_owned()))?;
        let algorithm = tag.parse::<HashAlgorithm>()?;
        let bytes = hex::decode(digest).map_err(|_| FingerprintParseError::Malformed(s.to_owned()))?;
        Fingerprint::new(algorithm, bytes)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.to_string()
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Session-scoped authentication token. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// Issue a credential valid for `ttl` from now.
    pub fn issue(token: impl Into<String>, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            token: token.into(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a file was not transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Relative path or a `..` segment; nothing was touched.
    InvalidPath,
    /// The resolved path is not an existing regular file.
    NotAFile,
    /// The remote endpoint did not acknowledge a chunk.
    TransferDenied,
    /// Any other failure (authentication, local I/O).
    Failed(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InvalidPath => write!(f, "invalid_path"),
            RejectReason::NotAFile => write!(f, "not_a_file"),
            RejectReason::TransferDenied => write!(f, "transfer_denied"),
            RejectReason::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Why a transfer was deliberately not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RemoteAbsent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RemoteAbsent => write!(f, "remote_absent"),
        }
    }
}

/// Result of transferring one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// The file was transferred. `fingerprint` is recomputed locally after
    /// the transfer and is `None` only if the file vanished in between.
    Success {
        path: PathBuf,
        fingerprint: Option<Fingerprint>,
    },
    Rejected {
        path: PathBuf,
        reason: RejectReason,
    },
    Skipped {
        path: PathBuf,
        reason: SkipReason,
    },
}

impl TransferOutcome {
    pub fn path(&self) -> &Path {
        match self {
            TransferOutcome::Success { path, .. }
            | TransferOutcome::Rejected { path, .. }
            | TransferOutcome::Skipped { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            TransferOutcome::Success { fingerprint, .. } => fingerprint.as_ref(),
            _ => None,
        }
    }

    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            TransferOutcome::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Per-file outcomes of a directory transfer, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryTransferResult(Vec<TransferOutcome>);

impl DirectoryTransferResult {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(outcome: TransferOutcome) -> Self {
        Self(vec![outcome])
    }

    pub fn push(&mut self, outcome: TransferOutcome) {
        self.0.push(outcome);
    }

    pub fn outcomes(&self) -> &[TransferOutcome] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransferOutcome> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.0.iter().filter(|o| o.is_success()).count()
    }

    /// `true` when every recorded outcome is a success.
    pub fn all_succeeded(&self) -> bool {
        self.0.iter().all(TransferOutcome::is_success)
    }
}

impl FromIterator<TransferOutcome> for DirectoryTransferResult {
    fn from_iter<I: IntoIterator<Item = TransferOutcome>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DirectoryTransferResult {
    type Item = TransferOutcome;
    type IntoIter = std::vec::IntoIter<TransferOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DirectoryTransferResult {
    type Item = &'a TransferOutcome;
    type IntoIter = std::slice::Iter<'a, TransferOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
