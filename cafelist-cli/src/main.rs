//! cafelist CLI - run and seed the café listing service
//!
//! - `cafelist serve` starts the HTTP server (config from environment)
//! - `cafelist seed` loads the starter categories and cafés

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cafelist_server::db::create_pool;
use cafelist_server::db::migrations;
use cafelist_server::http::run_server;
use cafelist_server::ServerConfig;

mod seed;

#[derive(Parser, Debug)]
#[command(
    name = "cafelist",
    author,
    version,
    about = "Café listing service: filtered browsing, JWT-gated writes, similarity recommendations"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve,

    /// Seed the database with starter categories and cafés
    Seed,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = ServerConfig::from_env();
    tracing::info!(
        environment = %config.environment,
        database_url = %config.database_url,
        "Loaded configuration"
    );

    match cli.command {
        Commands::Serve => {
            let pool = create_pool(&config.database_url).await?;
            run_server(pool, config).await?;
        }
        Commands::Seed => {
            let pool = create_pool(&config.database_url).await?;
            migrations::run(&pool).await?;
            seed::run(&pool).await?;
        }
    }

    Ok(())
}
