//! Subcommands and the wiring they share.

pub mod check;
pub mod get;
pub mod hash;
pub mod push;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ferry_core::{config, Environment, FerryConfig};
use ferry_transfer::{
    LocalAuthenticator, LocalStoreConnector, SessionConfig, SpoolTransport, StoreSession,
    TransferSession,
};

pub type PushSession = TransferSession<LocalAuthenticator, SpoolTransport>;
pub type LocalStoreSession = StoreSession<LocalStoreConnector>;

/// `~/.ferry/config.yaml`, or defaults when absent.
pub fn load_config() -> Result<FerryConfig> {
    let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
    let path = config::config_path_at(&home);
    let config = config::load_at(&home)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::debug!("loaded config from {} (id {})", path.display(), config.id);
    Ok(config)
}

pub fn push_session(config: &FerryConfig) -> PushSession {
    TransferSession::new(
        SessionConfig::from_config(config),
        LocalAuthenticator::from_config(config),
        SpoolTransport::from_config(config),
    )
}

pub fn store_session(config: &FerryConfig) -> LocalStoreSession {
    StoreSession::new(LocalStoreConnector::from_config(config), config.hash_type)
}

/// Anchor a relative destination or comparison path at the working
/// directory. Push paths are never passed through here.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(cwd.join(path))
}

/// `--environment`, else the configured default.
pub fn environment_or_default(config: &FerryConfig, environment: Option<String>) -> Environment {
    environment
        .map(Environment::from)
        .unwrap_or_else(|| config.environment.clone())
}

/// `--environment` plus the deprecated `--env` spelling.
#[derive(clap::Args, Debug, Default)]
pub struct EnvironmentArgs {
    /// Content-store environment (defaults to `environment` in the config).
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// Deprecated alias of `--environment`; wins when both are given.
    #[arg(long, hide = true)]
    pub env: Option<String>,
}

impl EnvironmentArgs {
    pub fn pull_options(self, config: &FerryConfig) -> ferry_transfer::PullOptions {
        let environment = environment_or_default(config, self.environment);
        ferry_transfer::PullOptions::with_legacy_env(Some(environment), self.env)
    }

    pub fn resolve(self, config: &FerryConfig) -> Environment {
        self.pull_options(config).environment
    }
}
