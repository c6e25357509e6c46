//! CLI for pagemirror.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pagemirror_core::config;
use std::path::PathBuf;

use commands::{run_capture, run_completions, CaptureArgs};

/// Top-level CLI for pagemirror.
#[derive(Debug, Parser)]
#[command(name = "pagemirror")]
#[command(about = "pagemirror: save a web page and its same-site assets as a local copy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Capture a page into a directory (index.html plus mirrored assets).
    Capture {
        /// Page URL. With --html, used only as the base for resolving references.
        url: String,

        /// Output directory name.
        #[arg(long, short = 'n', value_name = "DIR")]
        name: PathBuf,

        /// Use markup from this file (e.g. saved from a browser) instead of fetching the page.
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Download at most N assets at once (default: config, else unbounded).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Print the asset mapping without downloading or writing anything.
        #[arg(long, conflicts_with = "report")]
        dry_run: bool,

        /// Write a JSON report of all asset decisions and outcomes to this file.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Capture {
                url,
                name,
                html,
                jobs,
                dry_run,
                report,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = CaptureArgs {
                    url,
                    name,
                    html,
                    jobs,
                    dry_run,
                    report,
                };
                run_capture(&cfg, args).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
