//! HIPAA Guardian CLI, the main entry point.
//!
//! Commands:
//! - `serve`    Serve MCP over stdin/stdout (default)
//! - `gateway`  Serve MCP over HTTP
//! - `tools`    List the tool catalog
//! - `call`     Run one tool locally and print its output
//! - `doctor`   Diagnose config and knowledge base
//! - `config`   Show the effective configuration

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hipaa_guardian_config::{AppConfig, ConfigError};

mod commands;

use commands::config_cmd::ConfigAction;

#[derive(Parser)]
#[command(
    name = "hipaa-guardian",
    about = "HIPAA Compliance Guardian: HIPAA guidance tools over MCP",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config.toml (defaults to ~/.hipaa-guardian/config.toml)
    #[arg(long, global = true, env = "HIPAA_GUARDIAN_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the knowledge base JSON, overriding config and environment
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,

    /// Serve MCP over HTTP
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List available tools
    Tools,

    /// Run a single tool and print its output
    Call {
        /// Tool name, e.g. getBreachResponseChecklist
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },

    /// Diagnose configuration and knowledge base
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let port = match &cli.command {
        Some(Commands::Gateway { port }) => *port,
        _ => None,
    };
    let loaded = load_config(&config_path, cli.knowledge_base.clone(), port);

    let format = loaded
        .as_ref()
        .map(|c| c.logging.format.as_str())
        .unwrap_or("pretty");
    init_tracing(cli.verbose, format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(loaded?).await?,
        Commands::Gateway { .. } => commands::gateway::run(loaded?).await?,
        Commands::Tools => commands::tools::run(loaded?)?,
        Commands::Call { name, args } => {
            commands::call::run(loaded?, &name, args.as_deref()).await?
        }
        Commands::Doctor => commands::doctor::run(&config_path, loaded)?,
        Commands::Config { action } => commands::config_cmd::run(action, &config_path, loaded)?,
    }

    Ok(())
}

/// Command-line flags sit on top of the environment as the highest-priority
/// override layer.
fn load_config(
    path: &Path,
    knowledge_base: Option<PathBuf>,
    port: Option<u16>,
) -> Result<AppConfig, ConfigError> {
    AppConfig::load_with(path, |key| match key {
        "HIPAA_GUARDIAN_KNOWLEDGE_BASE" if knowledge_base.is_some() => {
            knowledge_base.as_ref().map(|p| p.display().to_string())
        }
        "HIPAA_GUARDIAN_PORT" if port.is_some() => port.map(|p| p.to_string()),
        _ => std::env::var(key).ok(),
    })
}

/// Logs go to stderr: stdout carries the stdio protocol.
fn init_tracing(verbose: bool, format: &str) {
    let filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
