//! stagebook-web - booking directory server
//!
//! Resolves configuration, opens (or creates) the SQLite database and serves
//! the HTML pages until Ctrl+C or SIGTERM.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use stagebook_common::config::{load_toml_config, CompiledDefaults, Overrides, ServerConfig};
use stagebook_common::db::init_database;
use stagebook_common::SqliteStore;
use stagebook_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for stagebook-web
#[derive(Parser, Debug)]
#[command(name = "stagebook-web")]
#[command(about = "Booking directory for venues, artists and shows")]
#[command(version)]
struct Args {
    /// TOML config file (default: platform config directory)
    #[arg(short, long, env = "STAGEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Data folder holding the database
    #[arg(short, long, env = "STAGEBOOK_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Database file (default: stagebook.db inside the root folder)
    #[arg(long, env = "STAGEBOOK_DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "STAGEBOOK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "STAGEBOOK_PORT")]
    port: Option<u16>,

    /// Log level or tracing filter directive
    #[arg(long, env = "STAGEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Also append logs to this file
    #[arg(long, env = "STAGEBOOK_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            root_folder: self.root_folder.clone(),
            database_path: self.database_path.clone(),
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config problems are reported before the real subscriber exists
    let bootstrap = tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).finish();
    let file = tracing::subscriber::with_default(bootstrap, || {
        load_toml_config(args.config.as_deref())
    });
    let config = ServerConfig::resolve(
        args.overrides(),
        file,
        CompiledDefaults::for_current_platform(),
    );

    init_tracing(&config)?;

    info!("Starting stagebook-web v{}", env!("CARGO_PKG_VERSION"));

    config
        .ensure_directories()
        .with_context(|| format!("Failed to create {}", config.root_folder.display()))?;
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(Arc::new(SqliteStore::new(pool)));
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("stagebook-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Default filter for a bare level such as `debug`; full directives pass through
fn filter_directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!(
            "stagebook_web={level},stagebook_common={level},tower_http={level}",
            level = level
        )
    }
}

/// Initialize tracing: stderr always, plus the log file when configured
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(&config.log_level)))
        .context("Invalid log level")?;

    let file_layer = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create log folder {}", parent.display())
                    })?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
