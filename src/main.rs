use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{AppConfig, StorageBackend, load_config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Boxoffice reservation service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load DATABASE_URL and friends from .env when present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// HTTP API for managing events and ticket reservations.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Path to a TOML config file (defaults to ./boxoffice.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,

    /// Overrides `database.backend`.
    #[arg(long, value_enum)]
    backend: Option<StorageBackend>,
}

impl ServeArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.database.backend = backend;
        }
    }
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate()?;

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();

    let state = web_server::build_state(&config.database)
        .await
        .context("Failed to initialize storage")?;
    let app = web_server::build_router(Arc::new(state), &config.server);

    let addr = web_server::resolve_addr(&config.server.host, config.server.port)
        .await
        .with_context(|| format!("Invalid listen address {}", config.server.host))?;
    web_server::run_server(addr, app).await
}
