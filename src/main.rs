use anyhow::{Context, Result};
use api_client::CompanyInfoClient;
use cache::CachingProvider;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use configuration::{load_config, Config};
use core_types::ExecutiveCompensationResult;
use engine::CompensationEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the executive compensation service.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; settings may come from the config file or the environment.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Serve => web_server::run_server(config).await?,
        Commands::Report(args) => handle_report(args, config).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Finds executives paid well above their industry's average compensation.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the HTTP API.
    Serve,
    /// Runs a single compensation query and prints the matches.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Exchange to query. Defaults to the configured exchange.
    #[arg(long)]
    exchange: Option<String>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

/// The handler for the `report` command.
async fn handle_report(args: ReportArgs, config: Config) -> Result<()> {
    let exchange = args.exchange.unwrap_or_else(|| config.engine.exchange.clone());

    let client = CompanyInfoClient::new(&config.provider)?;
    let cache = Arc::new(CachingProvider::from_settings(client, &config.cache));
    let engine = CompensationEngine::new(cache.clone(), &config.engine);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling the run.");
            on_interrupt.cancel();
        }
    });

    println!("--- Compensation report for {} ---", exchange);
    let results = engine
        .run(&exchange, &cancel)
        .await
        .with_context(|| format!("Compensation run for {} failed", exchange))?;
    tracing::debug!(stats = ?cache.stats().await, "Cache occupancy after the run.");

    if results.is_empty() {
        println!("No executives above the industry benchmark.");
    } else {
        println!("{}", render_table(&results));
        println!("{} executive(s) matched.", results.len());
    }
    Ok(())
}

fn render_table(results: &[ExecutiveCompensationResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Name and position",
        "Compensation",
        "Industry average",
    ]);
    for result in results {
        table.add_row(vec![
            Cell::new(&result.name_and_position),
            Cell::new(format!("{:.2}", result.compensation)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", result.average_industry_compensation))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
