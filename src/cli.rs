//! Command-line front end for the IRMAP core.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analyzer::MlClient;
use crate::config::Config;
use crate::errors::IrmapError;
use crate::models::{AssessmentMethod, RecordId, RiskAssessment};
use crate::observability::telemetry::{init_tracing, init_tracing_verbose, sanitize_for_log};
use crate::session::SessionStore;

#[derive(Parser)]
#[command(name = "irmap")]
#[command(about = "Asset, threat and risk-analysis tooling for IRMAP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Verbose logging (same as RUST_LOG=irmap=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an asset to the ML scoring service and print the response
    Analyze {
        /// JSON file containing the asset
        asset: PathBuf,

        /// Print the response as returned, without schema checks
        #[arg(long)]
        raw: bool,
    },

    /// Score a risk manually from likelihood and impact
    Assess {
        #[arg(long)]
        asset_id: RecordId,

        #[arg(long, value_enum, default_value = "iso27005")]
        method: AssessmentMethod,

        #[arg(long)]
        threat: String,

        #[arg(long)]
        vulnerability: String,

        /// Likelihood rating, 1-5
        #[arg(long)]
        likelihood: u8,

        /// Impact rating, 1-5
        #[arg(long)]
        impact: u8,
    },

    /// Resolve a session token against the configured seed sessions
    Session {
        token: String,
    },

    /// Print the effective configuration
    Config,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    if cli.verbose {
        init_tracing_verbose();
    } else {
        init_tracing(&config.logging.filter);
    }

    match cli.command {
        Commands::Analyze { asset, raw } => {
            let content = std::fs::read_to_string(&asset)
                .with_context(|| format!("Failed to read asset from {}", asset.display()))?;
            let asset: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", asset.display()))?;

            let client = MlClient::new(&config.analyzer)?;
            let output = if raw {
                serde_json::to_string_pretty(
                    &client.analyze_value(&asset).await.map_err(IrmapError::from)?,
                )?
            } else {
                serde_json::to_string_pretty(
                    &client.analyze_typed(&asset).await.map_err(IrmapError::from)?,
                )?
            };
            println!("{}", output);
        }
        Commands::Assess {
            asset_id,
            method,
            threat,
            vulnerability,
            likelihood,
            impact,
        } => {
            let assessment =
                RiskAssessment::new(asset_id, method, threat, vulnerability, likelihood, impact)?;
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Commands::Session { token } => {
            let store = SessionStore::from_config(&config.session);
            match store.get_user_from_session(&token) {
                Some(user) => println!("{}", sanitize_for_log(&user)),
                None => {
                    return Err(anyhow::anyhow!("Unknown session token"));
                }
            }
        }
        Commands::Config => {
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to render config")?
            );
        }
    }

    Ok(())
}
