use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogCache;
use crate::db::SnapshotStore;
use crate::evaluation::{EvaluationClient, EvaluationConfig};
use crate::generate::{OracleClient, OracleConfig};
use crate::requirements::ProgramCatalog;
use crate::types::AppState;

mod catalog;
mod db;
mod evaluation;
mod generate;
mod requirements;
mod server;
mod types;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = PathBuf::from(
        env::var("CLASSPLAN_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
    );
    let csv_path = data_dir.join("available_classes.csv");
    let db_path = env::var("SNAPSHOT_DB").unwrap_or_else(|_| "snapshots.db".to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let catalog = CatalogCache::new(&csv_path);
    info!(classes = catalog.load_all().len(), "Catalog loaded");

    let programs = ProgramCatalog::load_from_directory(&data_dir);
    let evaluations = EvaluationClient::new(EvaluationConfig::from_env())
        .context("failed to build evaluation client")?;
    let oracle = OracleClient::new(OracleConfig::from_env())
        .context("failed to build oracle client")?;
    let snapshots =
        SnapshotStore::new(&db_path).context("failed to open snapshot database")?;

    let state = Arc::new(AppState {
        catalog,
        programs,
        evaluations,
        oracle,
        snapshots,
    });

    let router = server::create_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}
