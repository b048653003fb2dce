//! Cart App server - REST API for the product catalog and carts.
//!
//! Serves on `127.0.0.1:5000` unless `CARTAPP_HOST` / `CARTAPP_PORT` say
//! otherwise. Storage is Postgres by default; `CARTAPP_STORAGE=memory` runs
//! against a seeded in-process store instead.
//!
//! Migrations are not run here. Use `cartapp-cli migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartapp_server::config::{ConfigError, ServerConfig, StorageBackend};
use cartapp_server::db::{self, MemoryStore};
use cartapp_server::state::AppState;

#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize Sentry when a DSN is configured. The guard flushes on drop.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// WARN and above become Sentry events; INFO and DEBUG become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartapp_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

async fn build_state(config: ServerConfig) -> Result<AppState, StartupError> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            tracing::info!("Database pool created");
            Ok(AppState::postgres(config, pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage with a demo catalog; data is lost on restart");
            Ok(AppState::in_memory(config, Arc::new(MemoryStore::demo())))
        }
    }
}

async fn serve(config: ServerConfig) -> Result<(), StartupError> {
    let addr = config.socket_addr();
    let state = build_state(config).await?;

    // Sentry layers go outermost so they see the whole request.
    let app = cartapp_server::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "cartapp server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet; this is the only place we print.
            #[allow(clippy::print_stderr)]
            {
                eprintln!("cartapp-server: {e}");
            }
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the runtime and the subscriber.
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(config)) {
        tracing::error!(error = %e, "Server stopped with an error");
        std::process::exit(1);
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
