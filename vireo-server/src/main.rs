//! # Vireo Server
//!
//! HTTP API for the Vireo short-video platform.
//!
//! ## Overview
//!
//! The server fronts a small constellation of services:
//!
//! - **Feed**: personalized, cursor-paginated recommendation feed
//! - **Engagement**: likes, comments, and two-stage view feedback
//! - **Uploads**: signed POST-policy tickets for direct-to-storage uploads
//! - **Search**: full-text video and user search via an external index
//!
//! ## Architecture
//!
//! Built on Axum and uses:
//! - PostgreSQL for persistent storage
//! - Redis for session resolution
//! - A gorse-compatible recommender for ranking
//! - An Elasticsearch-compatible index for search

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use vireo_config::{Config, ConfigLoader};
use vireo_core::Database;
use vireo_server::{routes, AppState};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "vireo-server")]
#[command(about = "API server for the Vireo short-video platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "vireo_server=info,vireo_core=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        return run_db_migrate(&cli.serve).await;
    }

    run_server(cli.serve).await
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let db = Database::connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    db.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;

    let state = AppState::from_config(&config)
        .await
        .map_err(|err| anyhow::anyhow!("failed to initialize application state: {err}"))?;
    state
        .db
        .migrate()
        .await
        .context("database migration failed")?;

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "vireo-server listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}

fn load_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut config = ConfigLoader::from_process_env()
        .load()
        .context("failed to load configuration")?;
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    Ok(config)
}
