use crate::{config::MAX_BODY_SIZE, handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/memes/", get(handlers::list_memes).post(handlers::create_meme))
        .route("/memes", get(handlers::list_memes).post(handlers::create_meme))
        .route(
            "/memes/{id}",
            get(handlers::get_meme)
                .put(handlers::update_meme)
                .delete(handlers::delete_meme),
        )
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}
