//! The `analyze` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use contract_risk::{
    AnalyzerConfig, ExplanationProvider, PlainTextLoader, RecommendationProvider, RiskAnalyzer,
};

use crate::report::{render_json, render_text};

/// Output format for an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Annotated clauses and a score summary.
    Text,
    /// The full assessment as JSON.
    Json,
}

/// Analyze command options.
#[derive(Parser)]
pub struct AnalyzeCommand {
    /// Plain-text (.txt) contract to analyze.
    pub file: PathBuf,

    /// RON analyzer configuration; defaults to the built-in catalog.
    #[arg(long, value_name = "RON")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Include recommended actions.
    #[arg(long)]
    pub recommendations: bool,

    /// Largest accepted file, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_size: Option<u64>,
}

impl AnalyzeCommand {
    /// Executes the analyze command.
    pub fn execute(self, out: &mut impl Write) -> Result<()> {
        let config = match &self.config {
            Some(path) => AnalyzerConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => AnalyzerConfig::standard(),
        };
        let analyzer = RiskAnalyzer::new(&config).context("Invalid analyzer configuration")?;

        let mut loader = PlainTextLoader::new();
        if let Some(max_size) = self.max_size {
            loader = loader.with_max_size(max_size);
        }

        let assessment = analyzer
            .analyze_path(&loader, &self.file)
            .with_context(|| format!("Failed to analyze {}", self.file.display()))?;
        tracing::debug!(
            clauses = assessment.clauses.len(),
            findings = assessment.findings.len(),
            "analysis finished"
        );

        let recommendations = if self.recommendations {
            Some(
                RecommendationProvider::new()
                    .explain(&assessment)
                    .context("Failed to build recommendations")?,
            )
        } else {
            None
        };

        match self.format {
            OutputFormat::Json => {
                let json = render_json(&assessment, recommendations.as_ref())?;
                writeln!(out, "{json}")?;
            }
            OutputFormat::Text => {
                write!(out, "{}", render_text(&assessment, recommendations.as_ref()))?;
            }
        }

        Ok(())
    }
}
