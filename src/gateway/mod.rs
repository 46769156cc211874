//! HTTP gateway exposing the batch lifecycle and latest-value reads.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::service::PriceService;
use state::AppState;

/// Build the complete application router.
pub fn router(service: Arc<PriceService>) -> Router {
    let state = Arc::new(AppState::new(service));

    let batch_routes = Router::new()
        .route("/start", post(handlers::start_batch))
        .route("/{batch_id}/upload", post(handlers::upload_chunk))
        .route("/{batch_id}/complete", post(handlers::complete_batch))
        .route("/{batch_id}/cancel", post(handlers::cancel_batch));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/prices/batch", batch_routes)
        .route("/api/v1/prices", get(handlers::get_latest_prices))
        .route("/api/v1/prices/{id}", get(handlers::get_latest_price))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, service: Arc<PriceService>) -> anyhow::Result<()> {
    let app = router(service);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {} (port already in use?)", addr))?;

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    println!("📥 Batch API: /api/v1/prices/batch/*");
    println!("📊 Query API: /api/v1/prices");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
