use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::controller::ControllerHandle;

pub mod handlers;
pub mod models;

pub fn create_router(controller: ControllerHandle, static_dir: &str) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::desk_page))
        .route("/digest", get(handlers::digest_page))
        // Form actions
        .route("/ui/fetch-news", post(handlers::fetch_news_handler))
        .route("/ui/search", post(handlers::search_handler))
        .route("/ui/summarize", post(handlers::summarize_handler))
        .route("/ui/digest", post(handlers::digest_handler))
        .with_state(controller)
        // Static assets for the pages
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
}

pub async fn serve(
    controller: ControllerHandle,
    bind_addr: &str,
    static_dir: &str,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    log::info!("serving pages on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(controller, static_dir))
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}
