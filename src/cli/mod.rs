//! # Command Line Interface
//!
//! Provides the `run`, `steps`, `health` and `config` commands. Running without a
//! subcommand is the same as `run` with default settings.

pub mod config;
pub mod config_cmd;
pub mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::client::{ClientConfig, ZentraClient};
use crate::scenario::fixtures::{validate_suffix, ScenarioData};
use crate::scenario::{probe_health, RunOptions, SmokeRunner, Step};
use config::SmokeConfig;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "zentra-smoke")]
#[command(about = "End-to-end smoke test for the Zentra chat API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the versioned API (e.g. http://localhost:8080/api/v1)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to configuration file (default: ~/.zentra/smoke.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the smoke scenario against the backend
    Run(RunArgs),

    /// Print the planned step sequence without sending requests
    Steps {
        /// Output format: text, json, or yaml
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Include the /health probe
        #[arg(long)]
        preflight: bool,

        /// Include the post-delete fetch
        #[arg(long)]
        verify_delete: bool,
    },

    /// Check that the backend answers on /health
    Health,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Output format: text, json, or yaml
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Password for the throwaway test account
    #[arg(long)]
    pub password: Option<String>,

    /// Fixed unique suffix for usernames and community names
    #[arg(long, value_parser = parse_suffix)]
    pub suffix: Option<String>,

    /// Probe /health before registering
    #[arg(long)]
    pub preflight: bool,

    /// After deleting the message, require that fetching it returns 404
    #[arg(long)]
    pub verify_delete: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            output: "text".to_string(),
            password: None,
            suffix: None,
            preflight: false,
            verify_delete: false,
        }
    }
}

fn parse_suffix(value: &str) -> Result<String, String> {
    validate_suffix(value).map(|_| value.to_string())
}

/// Settings shared by every command that talks to the backend
struct Connection {
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: bool,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let Cli { command, base_url, timeout, config: config_path, verbose } = Cli::parse();

    initialise_logging(verbose)?;

    let connection = Connection { base_url, timeout, verbose };

    match command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let file_config = load_config(config_path.as_ref())?;
            run_scenario(args, &connection, &file_config).await?
        }
        Commands::Steps { output, preflight, verify_delete } => {
            let format: OutputFormat = output.parse()?;
            output::print_plan(&Step::plan(preflight, verify_delete), format)?
        }
        Commands::Health => {
            let file_config = load_config(config_path.as_ref())?;
            check_health(&connection, &file_config).await?
        }
        Commands::Config { command } => config_cmd::handle_config_command(command, config_path)?,
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SmokeConfig> {
    match path {
        Some(path) => SmokeConfig::load_from_path(path),
        None => SmokeConfig::load(),
    }
}

/// Create HTTP client with resolved connection settings
fn create_http_client(
    connection: &Connection,
    file_config: &SmokeConfig,
) -> anyhow::Result<ZentraClient> {
    let base_url = config::resolve_base_url(connection.base_url.clone(), file_config);
    let timeout = config::resolve_timeout(connection.timeout, file_config)?;

    let client_config = ClientConfig { base_url, timeout, verbose: connection.verbose };

    Ok(ZentraClient::new(client_config)?)
}

async fn run_scenario(
    args: RunArgs,
    connection: &Connection,
    file_config: &SmokeConfig,
) -> anyhow::Result<()> {
    let format: OutputFormat = args.output.parse()?;
    let client = create_http_client(connection, file_config)?;

    let password = config::resolve_password(args.password, file_config);
    let data = match args.suffix {
        Some(suffix) => ScenarioData::with_suffix(suffix, password),
        None => ScenarioData::generate(password),
    };

    let options = RunOptions {
        preflight: args.preflight,
        verify_delete: args.verify_delete,
        echo_progress: format.echoes_progress(),
    };

    let runner = SmokeRunner::new(client, data, options);
    let report = runner.run().await?;

    output::print_report(&report, format)
}

async fn check_health(connection: &Connection, file_config: &SmokeConfig) -> anyhow::Result<()> {
    let client = create_http_client(connection, file_config)?;
    let health = probe_health(&client)
        .await
        .with_context(|| format!("Health check against {} failed", client.health_url()))?;

    info!(status = %health.status, "Backend health probe passed");
    match health.timestamp {
        Some(timestamp) => println!("✅ {} is {} ({})", client.health_url(), health.status, timestamp),
        None => println!("✅ {} is {}", client.health_url(), health.status),
    }
    Ok(())
}

/// Log directives used when `RUST_LOG` is unset.
///
/// Verbose runs open this crate up to `trace`, where request and response
/// bodies are logged.
fn default_log_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,zentra_smoke=trace"
    } else {
        "warn"
    }
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directives(verbose)));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}
