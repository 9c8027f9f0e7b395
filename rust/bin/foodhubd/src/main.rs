//! `foodhubd`: the hostel food hub server binary.
//!
//! Usage:
//!   foodhubd -c <context-name-or-path> [--listen <addr>] [--db <path>]
//!
//! The context name resolves to `/etc/foodhub/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use foodhub_core::{Authenticator, Module, SharedPassword};
use tokio::signal::ctrl_c;
use tracing::{error, info};

use config::ServerConfig;

/// Hostel food hub server.
#[derive(Parser, Debug)]
#[command(name = "foodhubd", about = "Hostel food hub server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// redb database file (overrides `[storage] db_path`).
    #[arg(long = "db")]
    db: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let mut server_config = ServerConfig::load(&config_path)?;
    if let Some(db) = cli.db {
        server_config.storage.db_path = Some(db);
    }

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let kv = bootstrap::open_store(&server_config)?;

    let departments = bootstrap::departments(&server_config)?;
    info!("{} departments configured", departments.len());

    let authenticator: Arc<dyn Authenticator> =
        Arc::new(SharedPassword::new(server_config.warden.password.clone()));

    let meal_module = meal::MealModule::new(
        kv,
        departments,
        authenticator,
        bootstrap::gate_timeout(&server_config),
    );
    info!("Meal module initialized");

    let module_routes = vec![(meal_module.name(), meal_module.routes())];
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Food hub server listening on {}", cli.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
