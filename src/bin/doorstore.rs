//! # Door Server
//!
//! Serves the door API over HTTP, persisting doors to a JSON document.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin doorstore
//! cargo run --bin doorstore -- ./data/doors.json
//! ```
//!
//! The optional argument overrides `DOORSTORE_DB_PATH`. Other settings come from
//! `DOORSTORE_HOST`, `DOORSTORE_PORT` and `DOORSTORE_ID_STRATEGY` (`counter` or
//! `length`). Log output is controlled with `RUST_LOG` and defaults to `info`.

use doorstore::{DoorHandler, DoorOperationHandler, JsonFileStore, ServerConfig, http};
use log::{error, info};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Some(path) = env::args().nth(1) {
        config.data_path = path.into();
    }

    if let Err(e) = run(config).await {
        error!("Server stopped: {}", e);
        process::exit(1);
    }
}

async fn run(config: ServerConfig) -> std::io::Result<()> {
    let store = JsonFileStore::new(&config.data_path);
    let doors = DoorHandler::with_id_strategy(store, config.id_strategy);
    let app = http::router(DoorOperationHandler::new(doors));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        "Door server listening on http://{} (data: {}, ids: {})",
        listener.local_addr()?,
        config.data_path.display(),
        config.id_strategy
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
