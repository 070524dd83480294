//! regdeskd — the regdesk daemon.
//!
//! Single binary that opens the record store and serves the REST API,
//! export endpoints and dashboard.
//!
//! # Usage
//!
//! ```text
//! regdeskd serve --config /etc/regdesk.toml --port 8080
//! regdeskd seed --count 40 --data-dir ./data
//! ```

mod config;
mod seed;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "regdeskd", about = "Registration admin daemon")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the API and dashboard.
    Serve {
        /// TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Data directory for persistent state.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Insert sample registrations.
    Seed {
        /// Number of records to create.
        #[arg(
            long,
            default_value = "25",
            value_parser = clap::value_parser!(u32).range(1..=seed::MAX_SEED_COUNT as i64)
        )]
        count: u32,

        /// TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Data directory for persistent state.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,regdeskd=debug,regdesk=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Serve {
            config,
            port,
            bind,
            data_dir,
        } => {
            let config = Config::load(config.as_deref())?.apply(Overrides {
                bind,
                port,
                data_dir,
            });
            run_server(config).await
        }
        Command::Seed {
            count,
            config,
            data_dir,
        } => {
            let config = Config::load(config.as_deref())?.apply(Overrides {
                data_dir,
                ..Default::default()
            });
            let store = open_store(&config)?;
            seed::seed(&store, count as usize)?;
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> anyhow::Result<regdesk_state::StateStore> {
    std::fs::create_dir_all(&config.storage.data_dir)?;
    let db_path = config.db_path();
    let store = regdesk_state::StateStore::open(&db_path)?;
    info!(path = ?db_path, "state store opened");
    Ok(store)
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("regdesk daemon starting");

    let store = open_store(&config)?;
    let router = regdesk_api::build_router(store, config.router_options());
    let addr = config.listen_addr();

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("regdesk daemon stopped");
    Ok(())
}
