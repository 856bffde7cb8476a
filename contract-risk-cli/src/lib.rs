//! Command-line front end for contract risk analysis.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod cli;
mod report;

pub use report::{render_json, render_text};

/// contract-risk: heuristic risk analysis for commercial contracts.
#[derive(Parser)]
#[command(name = "contract-risk")]
#[command(about = "Heuristic risk analysis for commercial contracts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyzes a plain-text contract.
    Analyze(cli::analyze::AnalyzeCommand),
    /// Checks or exports analyzer configuration.
    Config(cli::config::ConfigCommand),
}

impl Cli {
    /// Executes the command, writing its output to `out`.
    pub fn execute(self, out: &mut impl Write) -> Result<()> {
        match self.command {
            Commands::Analyze(cmd) => cmd.execute(out),
            Commands::Config(cmd) => cmd.execute(out),
        }
    }
}
