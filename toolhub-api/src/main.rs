//! toolhub-api - AI tools directory content service
//!
//! Startup sequence:
//! 1. tracing + build identification
//! 2. configuration (CLI, environment, TOML, compiled defaults)
//! 3. root folder layout and database
//! 4. admin bootstrap and expired session cleanup
//! 5. serve until Ctrl+C / SIGTERM

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use toolhub_api::{build_router, AppState};
use toolhub_common::config::{
    ConfigOverrides, RootFolderInitializer, RootFolderResolver, ServiceConfig, TomlConfig,
};
use toolhub_common::db::{init_database, users};

/// Command-line arguments for toolhub-api
#[derive(Parser, Debug)]
#[command(name = "toolhub-api")]
#[command(about = "Content API for the AI tools directory")]
#[command(version)]
struct Args {
    /// Root folder holding toolhub.db and media/
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to config.toml
    #[arg(short, long, env = "TOOLHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "TOOLHUB_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "TOOLHUB_BIND_ADDRESS")]
    bind: Option<String>,

    /// Public base URL used to make media URLs absolute
    #[arg(long, env = "TOOLHUB_PUBLIC_BASE_URL")]
    public_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file is read before tracing init so its log level can apply;
    // the outcome is reported once logging is up.
    let (toml_config, config_source) = TomlConfig::load_or_default(args.config.as_deref());
    let default_level = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    // Optional copy of the log in [logging] file
    let log_file = match &toml_config.logging.file {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?,
        ),
        None => None,
    };
    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", default_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    info!(
        "Starting toolhub-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config_source.report();

    let root_folder = RootFolderResolver::new("toolhub-api")
        .with_cli_arg(args.root_folder.clone())
        .with_toml_config(&toml_config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", root_folder.display());

    let overrides = ConfigOverrides {
        bind_address: args.bind.clone(),
        port: args.port,
        public_base_url: args.public_base_url.clone(),
    };
    let config = ServiceConfig::resolve(root_folder, &toml_config, &overrides)
        .context("Invalid configuration")?;

    match &config.public_base_url {
        Some(base) => info!("Public base URL: {}", base),
        None => info!("No public base URL configured; media URLs use the request Host"),
    }

    let db_path = initializer.database_path();
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    if let Some(admin) = &config.admin {
        users::ensure_admin(&pool, admin)
            .await
            .context("Failed to create admin account")?;
    }

    let purged = users::purge_expired_sessions(&pool).await?;
    if purged > 0 {
        info!("Removed {} expired sessions", purged);
    }

    let listen_address = config.listen_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_address)
        .await
        .with_context(|| format!("Failed to bind to {}", listen_address))?;
    info!("toolhub-api listening on http://{}", listen_address);
    info!("Health check: http://{}/health", listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
