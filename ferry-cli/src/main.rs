//! Ferry: integrity-verified file transfer CLI.
//!
//! # Usage
//!
//! ```text
//! ferry push <file> [--keep-symlinks]
//! ferry push-dir <dir> [--glob <pattern>]
//! ferry get-file <remote> <dest> [--environment <env>] [--makedirs] [--template tera]
//! ferry get-dir <remote> <dest> [--environment <env>] [--template tera]
//! ferry check <remote> <local> [--environment <env>]
//! ferry hash <path> [--environment <env>]
//! ```
//!
//! Global flags: `--json` for machine-readable output, `-v` for debug logs.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    check::CheckArgs,
    get::{GetDirArgs, GetFileArgs},
    hash::HashArgs,
    push::{PushArgs, PushDirArgs},
};
use output::Output;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ferry",
    version,
    about = "Push and fetch files with content fingerprint verification",
    long_about = None,
)]
struct Cli {
    /// Emit machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log protocol steps (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Push one local file to the receiver.
    Push(PushArgs),

    /// Push every file under a directory, optionally filtered by a glob.
    PushDir(PushDirArgs),

    /// Fetch one file from the content store.
    GetFile(GetFileArgs),

    /// Fetch a directory from the content store.
    GetDir(GetDirArgs),

    /// Compare the fingerprints of a remote and a local file.
    Check(CheckArgs),

    /// Print the fingerprint of a remote or local file.
    Hash(HashArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let out = Output::new(cli.json);
    match cli.command {
        Commands::Push(args) => args.run(out),
        Commands::PushDir(args) => args.run(out),
        Commands::GetFile(args) => args.run(out),
        Commands::GetDir(args) => args.run(out),
        Commands::Check(args) => args.run(out),
        Commands::Hash(args) => args.run(out),
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
