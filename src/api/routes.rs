//! API Routes
//!
//! Configures the Axum router with the proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, package_handler, redirect_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Store liveness probe
/// - `GET /:scope` - Metadata for an unscoped package
/// - `GET /:scope/:name` - Metadata for a scoped package
/// - anything else - 307 redirect to the upstream registry
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_handler))
        .route("/:scope", get(package_handler))
        .route("/:scope/:name", get(package_handler))
        .fallback(redirect_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
