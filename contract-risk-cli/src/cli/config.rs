//! Configuration-related CLI commands.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contract_risk::{AnalyzerConfig, RiskAnalyzer};

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Validates and compiles a RON configuration.
    Check(CheckCommand),
    /// Prints the built-in configuration as RON.
    Dump(DumpCommand),
}

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {
    /// RON configuration file.
    pub file: PathBuf,
}

/// Dump command options.
#[derive(Parser)]
pub struct DumpCommand {}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self, out: &mut impl Write) -> Result<()> {
        match self.command {
            ConfigSubcommands::Check(cmd) => cmd.execute(out),
            ConfigSubcommands::Dump(cmd) => cmd.execute(out),
        }
    }
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self, out: &mut impl Write) -> Result<()> {
        let config = AnalyzerConfig::load(&self.file)
            .with_context(|| format!("Failed to load configuration {}", self.file.display()))?;
        let analyzer = RiskAnalyzer::new(&config)
            .with_context(|| format!("Invalid configuration {}", self.file.display()))?;

        writeln!(
            out,
            "{}: ok ({} categories, {} adjustment rules)",
            self.file.display(),
            analyzer.catalog().categories().len(),
            config.scoring.adjustments.len()
        )?;
        Ok(())
    }
}

impl DumpCommand {
    /// Executes the dump command.
    pub fn execute(self, out: &mut impl Write) -> Result<()> {
        let ron = AnalyzerConfig::standard()
            .to_ron_string()
            .context("Failed to serialize the built-in configuration")?;
        writeln!(out, "{ron}")?;
        Ok(())
    }
}
