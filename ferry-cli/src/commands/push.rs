//! `ferry push` / `ferry push-dir`

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use ferry_transfer::PushEngine;

use super::{load_config, push_session};
use crate::output::Output;

/// Arguments for `ferry push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Absolute path of the local file to push.
    pub path: PathBuf,

    /// Push the symlink path as given instead of its target.
    #[arg(long)]
    pub keep_symlinks: bool,
}

impl PushArgs {
    pub fn run(self, out: Output) -> Result<()> {
        let config = load_config()?;
        let mut session = push_session(&config);

        let outcome = session.push_file(&self.path, self.keep_symlinks);
        out.outcome(&outcome)?;
        if let Some(reason) = outcome.reject_reason() {
            bail!("push of {} was rejected: {reason}", self.path.display());
        }
        Ok(())
    }
}

/// Arguments for `ferry push-dir`.
#[derive(Args, Debug)]
pub struct PushDirArgs {
    /// Absolute path of the directory (or single file) to push.
    pub path: PathBuf,

    /// Only push files whose full path matches this shell-style pattern.
    #[arg(long)]
    pub glob: Option<String>,
}

impl PushDirArgs {
    pub fn run(self, out: Output) -> Result<()> {
        let config = load_config()?;
        let mut session = push_session(&config);

        let result = PushEngine::new(&mut session).push_path(&self.path, self.glob.as_deref());
        out.directory(&self.path.display().to_string(), &result)?;
        let failed = result.len() - result.success_count();
        if failed > 0 {
            bail!("{failed} of {} files were not pushed", result.len());
        }
        Ok(())
    }
}
