use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use codeassist::{AppConfig, CodeAssist};

/// The console front end drives a single fixed session.
const CONSOLE_USER_ID: &str = "developer_user_01";

#[derive(Parser)]
#[command(name = "codeassist", version)]
#[command(about = "An AI coding assistant pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// LLM provider to use (gemini, anthropic)
    #[arg(long)]
    provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a coding question
    Ask {
        /// The coding question or task
        query: String,
    },
    /// Discard the console session and start a fresh one
    NewSession,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolve which provider name to use.
/// CLI argument takes highest precedence, then config file, then default.
fn resolve_provider<'a>(
    cli_provider: Option<&'a str>,
    config_provider: Option<&'a str>,
) -> &'a str {
    cli_provider.or(config_provider).unwrap_or("gemini")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        debug!(error = %e, "failed to load config, using defaults");
        AppConfig::default()
    });

    let provider_name = resolve_provider(cli.provider.as_deref(), config.provider.as_deref());
    let model_name = cli.model.as_deref().or(config.model.as_deref());

    match cli.command {
        Commands::Ask { query } => {
            info!(provider = %provider_name, "processing query");

            let assistant = build_assistant(provider_name, model_name)?;

            println!("\nUser Query: {}", query);

            match assistant.process_to_text(CONSOLE_USER_ID, &query).await {
                Ok(reply) => {
                    println!("\nCode Assistant Response:");
                    println!("{}", reply);
                }
                Err(e) => {
                    error!(error = %e, "query failed");
                    anyhow::bail!("query failed: {}", e);
                }
            }
        }
        Commands::NewSession => {
            let assistant = build_assistant(provider_name, model_name)?;

            let session_id = assistant
                .new_session(CONSOLE_USER_ID)
                .await
                .context("failed to start a new session")?;
            println!("Created new session: {}", session_id);
        }
    }

    Ok(())
}

fn build_assistant(provider_name: &str, model_name: Option<&str>) -> Result<CodeAssist> {
    CodeAssist::builder()
        .provider_by_name(provider_name, model_name)
        .context("failed to create LLM provider")?
        .build()
        .context("failed to build CodeAssist")
}
