//! Liveness and status endpoints served next to the rotation loop.

use std::net::SocketAddr;

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::scheduler::{RotationSnapshot, SharedSnapshot};

pub fn router(snapshot: SharedSnapshot) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .with_state(snapshot)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn status(State(snapshot): State<SharedSnapshot>) -> Json<RotationSnapshot> {
    Json(snapshot.load_full().as_ref().clone())
}

/// Serves until `shutdown` turns `true` or its sender is dropped.
pub async fn serve(
    addr: SocketAddr,
    snapshot: SharedSnapshot,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "health server listening");

    axum::serve(listener, router(snapshot))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    tracing::info!("health server stopped");
    Ok(())
}
