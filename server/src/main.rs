//! Contact backend: one API route, static site files, liveness probe.

mod contact;
mod db;

use std::path::Path;
use std::sync::Arc;

use axum::{routing, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::db::MessageStore;

async fn healthz() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("SITEFX_DB").unwrap_or_else(|_| "contact.db".to_string());
    let store = match MessageStore::open(Path::new(&db_path)) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("failed to open message store at {db_path}: {e}");
            std::process::exit(1);
        }
    };

    let static_files = ServeDir::new("dist").not_found_service(ServeFile::new("dist/index.html"));

    let app = Router::new()
        .route("/healthz", routing::get(healthz))
        .route("/api/contact", routing::post(contact::submit))
        .with_state(store)
        .fallback_service(static_files);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Server running on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
