//! Human and JSON rendering of transfer outcomes.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use ferry_core::{DirectoryTransferResult, TransferOutcome};

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn outcome(&self, outcome: &TransferOutcome) -> Result<()> {
        if self.json {
            return print_json(outcome);
        }
        println!("{}", outcome_line(outcome));
        Ok(())
    }

    pub fn directory(&self, root: &str, result: &DirectoryTransferResult) -> Result<()> {
        if self.json {
            return print_json(result);
        }
        if result.is_empty() {
            println!("· '{root}': no files");
            return Ok(());
        }
        println!(
            "'{root}' ({} of {} succeeded)",
            result.success_count(),
            result.len()
        );
        for outcome in result {
            println!("  {}", outcome_line(outcome));
        }
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize JSON output")?
    );
    Ok(())
}

fn outcome_line(outcome: &TransferOutcome) -> String {
    match outcome {
        TransferOutcome::Success { path, fingerprint } => {
            let fp = fingerprint
                .as_ref()
                .map_or_else(|| "-".to_string(), |fp| fp.to_string());
            format!("{}  {}  {}", "✓".green().bold(), path.display(), fp.bright_black())
        }
        TransferOutcome::Rejected { path, reason } => {
            format!("{}  {}  {}", "✗".red().bold(), path.display(), reason.to_string().red())
        }
        TransferOutcome::Skipped { path, reason } => {
            format!("{}  {}  {}", "·".yellow().bold(), path.display(), reason.to_string().yellow())
        }
    }
}
