//! Command-line interface for claimcheck.
//!
//! Validates text against web evidence, and exposes the segmenter, the
//! similarity scorer and the health report for diagnostics.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use claimcheck_core::{classify, Segmenter, ValidationVerdict, DEFAULT_MAX_STATEMENTS};
use claimcheck_runtime::{
    HealthReport, ProviderRegistry, ProviderSettings, RuntimeConfig, SimilarityScorer,
    TieredScore, ValidationOrchestrator,
};

/// claimcheck - check factual claims against web evidence
#[derive(Parser, Debug)]
#[command(name = "claimcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the claims in a piece of text
    Validate {
        /// Text to validate (reads --file or stdin if not provided)
        text: Option<String>,

        /// Read text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Runtime configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how text splits into checkable statements
    Segment {
        /// Text to segment
        text: String,

        /// Maximum number of statements
        #[arg(short, long, default_value_t = DEFAULT_MAX_STATEMENTS)]
        max: usize,
    },

    /// Score a statement against one evidence snippet
    Score {
        /// The claim
        #[arg(long)]
        statement: String,

        /// The evidence text
        #[arg(long)]
        snippet: String,

        /// Skip embedding providers
        #[arg(long)]
        lexical: bool,

        /// Runtime configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show which credentials are configured
    Health {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Validate {
                text,
                file,
                config,
                json,
            } => validate(text, file, config, json).await,
            Commands::Segment { text, max } => {
                print!("{}", render_segments(&Segmenter::new(max).segment(&text)));
                Ok(())
            }
            Commands::Score {
                statement,
                snippet,
                lexical,
                config,
            } => score(&statement, &snippet, lexical, config).await,
            Commands::Health { json } => {
                let report = ProviderSettings::from_env().health_report();
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render_health(&report));
                }
                Ok(())
            }
        }
    }
}

async fn validate(
    text: Option<String>,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let settings = ProviderSettings::from_env();
    let orchestrator = ValidationOrchestrator::from_settings(&settings, config)?;

    let input = read_input(text, file.as_deref())?;
    debug!(chars = input.chars().count(), tier = ?orchestrator.similarity_tier(), "validating input");
    let verdict = orchestrator.validate(&input).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print!("{}", render_verdict(&verdict));
    }
    Ok(())
}

async fn score(statement: &str, snippet: &str, lexical: bool, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let scorer = if lexical {
        SimilarityScorer::lexical_only()
    } else {
        SimilarityScorer::from_settings(
            &ProviderSettings::from_env(),
            &config,
            &ProviderRegistry::with_defaults(),
        )
    };

    let scored = scorer.score(statement, snippet).await;
    print!("{}", render_score(&scored));
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    Ok(config)
}

/// Text argument, then file, then stdin.
fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;

    Ok(buffer)
}

fn render_verdict(verdict: &ValidationVerdict) -> String {
    let mut out = String::new();
    let status = if verdict.validated {
        "VALIDATED"
    } else {
        "NOT VALIDATED"
    };
    out.push_str(&format!("{}: {}\n", status, verdict.message));

    for (i, claim) in verdict.claims.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. [{}] {:.4}  {}\n",
            i + 1,
            claim.confidence,
            claim.similarity,
            claim.statement
        ));
        if let Some(snippet) = &claim.best_snippet {
            out.push_str(&format!("   evidence: {}\n", snippet));
        }
        if let Some(url) = &claim.best_url {
            out.push_str(&format!("   source:   {}\n", url));
        }
    }

    if !verdict.claims.is_empty() {
        let (high, medium, low) = verdict.confidence_counts();
        out.push_str(&format!(
            "\nHigh: {}  Medium: {}  Low: {}\n",
            high, medium, low
        ));
    }
    out
}

fn render_segments(statements: &[String]) -> String {
    statements
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}\n", i + 1, s))
        .collect()
}

fn render_score(scored: &TieredScore) -> String {
    format!(
        "score:      {:.4}\nconfidence: {}\ntier:       {}\n",
        scored.score,
        classify(scored.score),
        scored.tier.label()
    )
}

fn render_health(report: &HealthReport) -> String {
    format!(
        "status:            {}\nyou_api_key:       {}\ngemini_api_key:    {}\nopenai_api_key:    {}\nsimilarity_method: {}\n",
        report.status,
        report.you_api_key,
        report.gemini_api_key,
        report.openai_api_key,
        report.similarity_method
    )
}
