//! `ferry check`: compare a remote and a local fingerprint.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use ferry_core::LogicalPath;
use ferry_transfer::IntegrityCheck;

use super::{absolutize, load_config, store_session, EnvironmentArgs};
use crate::output::{print_json, Output};

/// Arguments for `ferry check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Remote logical path.
    pub remote: String,

    /// Local file to compare against.
    pub local: PathBuf,

    #[command(flatten)]
    pub scope: EnvironmentArgs,
}

#[derive(Serialize)]
struct CheckJson<'a> {
    remote: &'a str,
    local: String,
    matched: bool,
}

impl CheckArgs {
    pub fn run(self, out: Output) -> Result<()> {
        let config = load_config()?;
        let local = absolutize(&self.local)?;
        let env = self.scope.resolve(&config);
        let remote = LogicalPath::new(self.remote);
        let mut store = store_session(&config);

        let matched = IntegrityCheck::new(&mut store)
            .verify_match(&remote, &local, &env)
            .with_context(|| format!("failed to check '{remote}'"))?;

        if out.is_json() {
            print_json(&CheckJson {
                remote: remote.as_str(),
                local: local.display().to_string(),
                matched,
            })?;
        } else if matched {
            println!("{}  {} matches {}", "✓".green().bold(), local.display(), remote);
        } else {
            println!("{}  {} differs from {}", "✗".red().bold(), local.display(), remote);
        }

        if !matched {
            bail!("fingerprints do not match");
        }
        Ok(())
    }
}
