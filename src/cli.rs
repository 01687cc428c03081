//! # SBCTL CLI
//!
//! Command-line interface for checking a secret bundle before deploying.
//!
//! Runs the same fetch → parse → validate → decode pipeline as the service,
//! but publishes into a private registry and prints only redacted values.
//!
//! ## Usage
//!
//! ```bash
//! # Check the secret named by SECRETS_NAME in AWS Secrets Manager
//! sbctl check
//!
//! # Check a local secret file ./secrets/prod-secrets.json
//! sbctl check --secret-name prod-secrets --backend file --secrets-dir ./secrets
//!
//! # Show the required keys and their configuration names
//! sbctl mapping
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use secret_bootstrap::config::{BootstrapConfig, StoreBackend};
use secret_bootstrap::runtime::initialization::{init_process, run_bootstrap};
use secret_bootstrap::secrets::{ConfigRegistry, SecretMapping};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Secret Bootstrap CLI
#[derive(Parser)]
#[command(name = "sbctl")]
#[command(about = "Secret Bootstrap CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, validate and decode a secret without starting the service
    Check {
        /// Secret name or ARN (defaults to SECRETS_NAME)
        #[arg(short, long)]
        secret_name: Option<String>,

        /// Secret store backend (defaults to SECRETS_BACKEND or aws)
        #[arg(short, long, value_enum)]
        backend: Option<BackendArg>,

        /// Directory holding <name>.json files for the file backend
        #[arg(long)]
        secrets_dir: Option<PathBuf>,

        /// AWS region override
        #[arg(long)]
        region: Option<String>,

        /// Secrets Manager endpoint override (e.g. http://localhost:4566)
        #[arg(long)]
        endpoint_url: Option<String>,

        /// Fetch timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// List the required secret keys and the names they are published under
    Mapping,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Aws,
    File,
}

impl From<BackendArg> for StoreBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Aws => StoreBackend::Aws,
            BackendArg::File => StoreBackend::File,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport {
    secret_name: String,
    published_at: String,
    entries: Vec<EntryReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryReport {
    name: String,
    preview: String,
    length: usize,
}

fn main() -> Result<()> {
    // `.env` loading sets variables; no runtime threads may exist yet
    init_process();

    let cli = Cli::parse();
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            secret_name,
            backend,
            secrets_dir,
            region,
            endpoint_url,
            timeout_secs,
            output,
        } => {
            let mut config =
                BootstrapConfig::from_env().context("Failed to load bootstrap configuration")?;
            if secret_name.is_some() {
                config.secret_name = secret_name;
            }
            if let Some(backend) = backend {
                config.backend = backend.into();
            }
            if let Some(dir) = secrets_dir {
                config.secrets_dir = dir;
            }
            if region.is_some() {
                config.aws_region = region;
            }
            if endpoint_url.is_some() {
                config.endpoint_url = endpoint_url;
            }
            if let Some(secs) = timeout_secs {
                config.fetch_timeout = Duration::from_secs(secs);
            }
            check_command(&config, output).await
        }
        Commands::Mapping => {
            mapping_command();
            Ok(())
        }
    }
}

/// Run the pipeline into a private registry and print redacted results
async fn check_command(config: &BootstrapConfig, output: OutputFormat) -> Result<()> {
    let registry = ConfigRegistry::new();
    let published = run_bootstrap(config, &SecretMapping::reference(), &registry).await?;

    let report = CheckReport {
        secret_name: config.secret_name.clone().unwrap_or_default(),
        published_at: published.published_at().to_rfc3339(),
        entries: published
            .iter()
            .map(|(name, value)| EntryReport {
                name: name.to_string(),
                preview: redact(value),
                length: value.chars().count(),
            })
            .collect(),
    };

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "Secret '{}' is complete ({} entries):",
                report.secret_name,
                report.entries.len()
            );
            for entry in &report.entries {
                println!(
                    "  {:<36} {} ({} chars)",
                    entry.name, entry.preview, entry.length
                );
            }
        }
    }
    Ok(())
}

fn mapping_command() {
    println!("{:<24} {:<36} ENCODING", "SECRET KEY", "CONFIG NAME");
    for entry in SecretMapping::reference().iter() {
        println!(
            "{:<24} {:<36} {}",
            entry.key,
            entry.config_name,
            entry.encoding.as_str()
        );
    }
}

/// Keep at most the first 4 characters of long values
fn redact(value: &str) -> String {
    const VISIBLE: usize = 4;
    if value.chars().count() <= VISIBLE * 3 {
        return "********".to_string();
    }
    let head: String = value.chars().take(VISIBLE).collect();
    format!("{head}********")
}
