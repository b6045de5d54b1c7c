//! `ferry hash`

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use ferry_core::{Fingerprint, LogicalPath};

use super::{load_config, store_session, EnvironmentArgs};
use crate::output::{print_json, Output};

/// Arguments for `ferry hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Remote logical path or local file.
    pub path: String,

    #[command(flatten)]
    pub scope: EnvironmentArgs,
}

#[derive(Serialize)]
struct HashJson<'a> {
    path: &'a str,
    fingerprint: Option<&'a Fingerprint>,
}

impl HashArgs {
    pub fn run(self, out: Output) -> Result<()> {
        let config = load_config()?;
        let env = self.scope.resolve(&config);
        let path = LogicalPath::new(self.path);
        let mut store = store_session(&config);

        let fingerprint = store
            .hash_file(&path, &env)
            .with_context(|| format!("failed to hash '{path}'"))?;

        if out.is_json() {
            print_json(&HashJson {
                path: path.as_str(),
                fingerprint: fingerprint.as_ref(),
            })?;
        } else if let Some(fp) = &fingerprint {
            println!("{fp}  {path}");
        }

        if fingerprint.is_none() {
            bail!("'{path}' does not exist in environment '{env}'");
        }
        Ok(())
    }
}
