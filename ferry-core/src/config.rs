//! Process configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.ferry/
//!   config.yaml   (optional: every field has a default)
//!   spool/        (default receiver directory for local pushes)
//! ```
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Environment, HashAlgorithm};

/// Chunk size used when `file_buffer_size` is not configured.
pub const DEFAULT_FILE_BUFFER_SIZE: usize = 8096;

/// Identity sent with pushes when `id` is not configured.
pub const DEFAULT_IDENTITY: &str = "local";

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully-resolved configuration. Built only through [`load_at`] /
/// [`FerryConfig::defaults_at`], so every field has a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FerryConfig {
    /// Local identity carried by every chunk message.
    pub id: String,
    /// Bytes read per pushed chunk.
    pub file_buffer_size: usize,
    /// Fingerprint algorithm for local digests.
    pub hash_type: HashAlgorithm,
    /// Environment used when a command does not name one.
    pub environment: Environment,
    /// Directory backing each environment of the local content store.
    pub store_roots: BTreeMap<Environment, PathBuf>,
    /// Receiver directory for the local push transport.
    pub spool_dir: PathBuf,
    /// Receiver acceptance policy. Pushes are denied unless enabled.
    pub accept_pushes: bool,
    /// Receiver size limit in bytes.
    pub max_push_size: Option<u64>,
    /// Shared secret issued by the local authenticator.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub token_ttl_secs: u64,
    /// Extra variables exposed to filename templates.
    pub template_vars: BTreeMap<String, String>,
}

impl FerryConfig {
    /// Configuration used when no config file exists.
    pub fn defaults_at(home: &Path) -> Self {
        FerryConfig {
            id: DEFAULT_IDENTITY.to_owned(),
            file_buffer_size: DEFAULT_FILE_BUFFER_SIZE,
            hash_type: HashAlgorithm::default(),
            environment: Environment::default(),
            store_roots: BTreeMap::new(),
            spool_dir: ferry_root(home).join("spool"),
            accept_pushes: false,
            max_push_size: None,
            token: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            template_vars: BTreeMap::new(),
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.token_ttl_secs).unwrap_or(i64::MAX))
    }

    /// Directory backing `env`, if one is configured.
    pub fn store_root(&self, env: &Environment) -> Option<&Path> {
        self.store_roots.get(env).map(PathBuf::as_path)
    }
}

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

/// On-disk payload. Every field is optional; `env` is the legacy spelling of
/// `environment`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    id: Option<String>,
    file_buffer_size: Option<usize>,
    hash_type: Option<HashAlgorithm>,
    environment: Option<Environment>,
    env: Option<String>,
    store_roots: BTreeMap<Environment, PathBuf>,
    spool_dir: Option<PathBuf>,
    accept_pushes: Option<bool>,
    max_push_size: Option<u64>,
    token: Option<String>,
    token_ttl_secs: Option<u64>,
    template_vars: BTreeMap<String, String>,
}

impl ConfigFile {
    fn into_config(self, home: &Path) -> FerryConfig {
        let defaults = FerryConfig::defaults_at(home);
        FerryConfig {
            id: self.id.unwrap_or(defaults.id),
            file_buffer_size: self
                .file_buffer_size
                .filter(|size| *size > 0)
                .unwrap_or(defaults.file_buffer_size),
            hash_type: self.hash_type.unwrap_or(defaults.hash_type),
            environment: reconcile_environment(self.environment, self.env),
            store_roots: self.store_roots,
            spool_dir: self.spool_dir.unwrap_or(defaults.spool_dir),
            accept_pushes: self.accept_pushes.unwrap_or(defaults.accept_pushes),
            max_push_size: self.max_push_size,
            token: self.token.filter(|t| !t.is_empty()),
            token_ttl_secs: self.token_ttl_secs.unwrap_or(defaults.token_ttl_secs),
            template_vars: self.template_vars,
        }
    }
}

/// Map the legacy `env` value onto the canonical environment.
///
/// When `legacy_env` is given it wins over `environment` and a deprecation
/// warning is logged.
pub fn reconcile_environment(
    environment: Option<Environment>,
    legacy_env: Option<String>,
) -> Environment {
    match legacy_env {
        Some(env) => {
            tracing::warn!(
                "passing an environment as `env` is deprecated; use `environment` instead"
            );
            Environment::from(env)
        }
        None => environment.unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Paths + load
// ---------------------------------------------------------------------------

/// `<home>/.ferry/`
pub fn ferry_root(home: &Path) -> PathBuf {
    home.join(".ferry")
}

/// `<home>/.ferry/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    ferry_root(home).join("config.yaml")
}

/// Load configuration rooted at `home`.
///
/// Returns defaults if the file is missing or empty,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path) -> Result<FerryConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(FerryConfig::defaults_at(home));
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(FerryConfig::defaults_at(home));
    }
    let file: ConfigFile =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })?;
    Ok(file.into_config(home))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<FerryConfig, ConfigError> {
    load_at(&home()?)
}

/// Resolve `~` via `dirs::home_dir()`.
pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
