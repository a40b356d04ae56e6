//! # Grocery Inventory
//!
//! Server rendered inventory of grocery items and the categories they belong to.
//!
//! ## Request Flow
//!
//! - Route match, see [`routes::router`]
//! - Form bodies are decoded into ordered pairs so repeated `category` keys survive
//! - Fields are trimmed, checked against an ordered list of rules, then escaped
//! - Valid submissions go to the [`database::Store`] and redirect to the record
//! - Rejected submissions render the same form again with the errors listed
//! - Missing records and storage failures leave through [`error::AppError`]
//!
//! ## Storage
//!
//! Two collections, `categories` and `items`, one JSON document per id. Redis in
//! production, an in-memory map for tests or with `STORE_BACKEND=memory`.
//!
//! ## Configuration
//!
//! | Variable        | Default                  |
//! |-----------------|--------------------------|
//! | `RUST_PORT`     | `3000`                   |
//! | `REDIS_URL`     | `redis://127.0.0.1:6379` |
//! | `STORE_BACKEND` | `redis`                  |
//! | `RUST_LOG`      | unset, errors only       |
//!
//! ## Setup
//!
//! Run against a local Redis.
//! ```sh
//! docker run -p 6379:6379 redis
//! cargo run -p grocery
//! ```
//!
//! Fill it with sample data.
//! ```sh
//! cargo run -p grocery-seed -- --reset
//! ```
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod categories;
pub mod config;
pub mod database;
pub mod error;
pub mod items;
pub mod memory;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod validation;
pub mod views;

use config::Config;
use state::AppState;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");

    let app = routes::router(state.clone()).layer(TraceLayer::new_for_http());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
