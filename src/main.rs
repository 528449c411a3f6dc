use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio::config::{FolioConfig, LoggingConfig};
use folio::content::{self, ContentStore};
use folio::gallery::layout_gallery;
use folio::http::{AppState, HttpServer};

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Event photography portfolio backend")]
struct Cli {
    /// YAML configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Override the configured listen address
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// Print the gallery layout of a project as JSON
    Layout {
        /// Project slug
        slug: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = FolioConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.log_json {
        config.logging.json = true;
    }
    init_tracing(&config.logging);

    match cli.command {
        Command::Serve { listen } => {
            if let Some(addr) = listen {
                config.server.listen_addr = addr;
            }
            serve(config).await
        }
        Command::Layout { slug } => print_layout(&config, &slug).await,
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .init();
    }
}

async fn serve(config: FolioConfig) -> anyhow::Result<()> {
    info!("Starting Folio");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config).context("building application state")?;
    info!(
        listen_addr = %config.server.listen_addr,
        rate_limiting = config.rate_limiting.enabled,
        mailer = state.mailer.is_some(),
        "Configuration loaded"
    );

    let sweeper = state.limiter.spawn_sweeper(config.rate_limiting.sweep_interval());

    let server = HttpServer::new(config.server.listen_addr, state);
    let result = server.serve_with_shutdown(shutdown_signal()).await;

    sweeper.abort();
    result?;

    info!("Folio stopped");
    Ok(())
}

async fn print_layout(config: &FolioConfig, slug: &str) -> anyhow::Result<()> {
    let store = content::from_config(&config.content)?;
    let project = store
        .project_by_slug(slug)
        .await?
        .with_context(|| format!("no project with slug {slug:?}"))?;

    let layout = layout_gallery(&project.title, &project.gallery);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
