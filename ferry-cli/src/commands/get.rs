//! `ferry get-file` / `ferry get-dir`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use ferry_core::{FerryConfig, LogicalPath, TransferOutcome};
use ferry_renderer::{PathContext, TemplateEngineKind};
use ferry_transfer::{PullEngine, PullOptions};

use super::{absolutize, load_config, store_session, EnvironmentArgs};
use crate::output::Output;

/// Arguments for `ferry get-file`.
#[derive(Args, Debug)]
pub struct GetFileArgs {
    /// Remote logical path (`remote://...`) or a bare local path.
    pub remote: String,

    /// Local destination file or existing directory.
    pub dest: PathBuf,

    #[command(flatten)]
    pub scope: EnvironmentArgs,

    /// Create missing parent directories of the destination.
    #[arg(long)]
    pub makedirs: bool,

    /// Render both paths with this template engine first (`tera` or `jinja`).
    #[arg(long)]
    pub template: Option<String>,
}

impl GetFileArgs {
    pub fn run(self, out: Output) -> Result<()> {
        let config = load_config()?;
        let dest = absolutize(&self.dest)?;
        let options = pull_options(self.scope, &config, self.template.as_deref())?
            .makedirs(self.makedirs);
        let mut store = store_session(&config);
        let mut engine = PullEngine::new(&mut store)
            .with_context(PathContext::from_config(&config, &options.environment));

        let remote = LogicalPath::new(self.remote);
        let outcome = engine
            .get_file(&remote, &dest, &options)
            .with_context(|| format!("failed to fetch '{remote}'"))?;
        out.outcome(&outcome)?;
        if let TransferOutcome::Skipped { .. } = outcome {
            bail!(
                "'{remote}' does not exist in environment '{}'",
                options.environment
            );
        }
        Ok(())
    }
}

/// Arguments for `ferry get-dir`.
#[derive(Args, Debug)]
pub struct GetDirArgs {
    /// Remote logical directory.
    pub remote: String,

    /// Local directory the remote directory is copied into.
    pub dest: PathBuf,

    #[command(flatten)]
    pub scope: EnvironmentArgs,

    /// Render both paths with this template engine first (`tera` or `jinja`).
    #[arg(long)]
    pub template: Option<String>,
}

impl GetDirArgs {
    pub fn run(self, out: Output) -> Result<()> {
        let config = load_config()?;
        let dest = absolutize(&self.dest)?;
        let options = pull_options(self.scope, &config, self.template.as_deref())?;
        let mut store = store_session(&config);
        let mut engine = PullEngine::new(&mut store)
            .with_context(PathContext::from_config(&config, &options.environment));

        let remote = LogicalPath::new(self.remote);
        let result = engine
            .get_dir(&remote, &dest, &options)
            .with_context(|| format!("failed to fetch directory '{remote}'"))?;
        out.directory(remote.as_str(), &result)
    }
}

fn pull_options(
    env: EnvironmentArgs,
    config: &FerryConfig,
    template: Option<&str>,
) -> Result<PullOptions> {
    let template = template
        .map(|name| name.parse::<TemplateEngineKind>())
        .transpose()
        .context("invalid --template")?;
    Ok(env.pull_options(config).template(template))
}
