//! PullEngine: fetch remote files through a [`StoreSession`] and fingerprint
//! what landed locally.
//!
//! The store's own fingerprint decides only whether a fetch happens at all;
//! the fingerprint reported for a materialised file is always recomputed
//! from local bytes.

use std::path::{Path, PathBuf};

use ferry_core::{
    reconcile_environment, DirectoryTransferResult, Environment, LogicalPath, SkipReason,
    TransferOutcome,
};
use ferry_renderer::{PathContext, PathRenderer, TemplateEngineKind};

use crate::error::TransferError;
use crate::store::StoreSession;
use crate::traits::{ContentStore, StoreConnector};

/// Per-call pull settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullOptions {
    pub environment: Environment,
    /// Create missing destination parents (single-file pulls only).
    pub makedirs: bool,
    /// Render the remote path and destination before fetching.
    pub template: Option<TemplateEngineKind>,
}

impl PullOptions {
    pub fn new(environment: Environment) -> Self {
        PullOptions {
            environment,
            ..PullOptions::default()
        }
    }

    /// Options from a canonical `environment` and a deprecated `env` value.
    /// The legacy value wins and logs a deprecation warning.
    pub fn with_legacy_env(environment: Option<Environment>, env: Option<String>) -> Self {
        PullOptions::new(reconcile_environment(environment, env))
    }

    pub fn makedirs(mut self, makedirs: bool) -> Self {
        self.makedirs = makedirs;
        self
    }

    pub fn template(mut self, template: Option<TemplateEngineKind>) -> Self {
        self.template = template;
        self
    }
}

/// Single-file and directory pulls over a borrowed store session.
pub struct PullEngine<'s, C: StoreConnector> {
    session: &'s mut StoreSession<C>,
    context: PathContext,
}

impl<'s, C: StoreConnector> PullEngine<'s, C> {
    pub fn new(session: &'s mut StoreSession<C>) -> Self {
        PullEngine {
            session,
            context: PathContext::new(
                ferry_core::config::DEFAULT_IDENTITY,
                &Environment::default(),
            ),
        }
    }

    /// Template variables for rendered pulls. The environment field is
    /// replaced by each call's [`PullOptions::environment`].
    pub fn with_context(mut self, context: PathContext) -> Self {
        self.context = context;
        self
    }

    /// Fetch one file. `Skipped(remote_absent)` without any fetch when the
    /// store has no fingerprint for it.
    pub fn get_file(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        options: &PullOptions,
    ) -> Result<TransferOutcome, TransferError> {
        let (path, dest) = self.render(path, dest, options)?;
        let env = &options.environment;

        let store = self.session.store()?;
        if store.resolve_fingerprint(&path, env)?.is_none() {
            tracing::debug!("{path} is absent in environment {env}; skipping");
            return Ok(TransferOutcome::Skipped {
                path: dest,
                reason: SkipReason::RemoteAbsent,
            });
        }

        let local = store.fetch_file(&path, &dest, options.makedirs, env)?;
        let fingerprint = self.session.digest().digest_file(&local)?;
        tracing::info!("fetched {path} to {}", local.display());
        Ok(TransferOutcome::Success {
            path: local,
            fingerprint,
        })
    }

    /// Fetch a remote directory. Outcomes follow the store's order; no
    /// filtering is applied.
    pub fn get_dir(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        options: &PullOptions,
    ) -> Result<DirectoryTransferResult, TransferError> {
        let (path, dest) = self.render(path, dest, options)?;
        let env = &options.environment;

        let fetched = self.session.store()?.fetch_dir(&path, &dest, env)?;
        let digest = self.session.digest();
        let mut result = DirectoryTransferResult::new();
        for local in fetched {
            let fingerprint = digest.digest_file(&local)?;
            result.push(TransferOutcome::Success {
                path: local,
                fingerprint,
            });
        }
        tracing::info!("fetched {} files from {path}", result.len());
        Ok(result)
    }

    fn render(
        &self,
        path: &LogicalPath,
        dest: &Path,
        options: &PullOptions,
    ) -> Result<(LogicalPath, PathBuf), TransferError> {
        let renderer = PathRenderer::new(options.template);
        if renderer.engine().is_none() {
            return Ok((path.clone(), dest.to_path_buf()));
        }
        let ctx = PathContext {
            environment: options.environment.to_string(),
            ..self.context.clone()
        };
        let (path, dest) = renderer.render_pair(path.as_str(), &dest.to_string_lossy(), &ctx)?;
        Ok((LogicalPath::new(path), PathBuf::from(dest)))
    }
}
