//! API Handlers
//!
//! HTTP request handlers for the proxy endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::debug;

use crate::error::Result;
use crate::models::{ErrorResponse, HealthResponse};
use crate::proxy::Proxy;

/// Application state shared across all handlers.
///
/// The engine is read-only per request, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache engine
    pub proxy: Arc<Proxy>,
}

impl AppState {
    /// Creates a new AppState wrapping the given engine.
    pub fn new(proxy: Proxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}

/// Handler for GET /:scope and GET /:scope/:name
///
/// Resolves a package metadata document through the cache engine and
/// serves it as JSON. Any engine failure surfaces as a 500.
pub async fn package_handler(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let scope = params.get("scope").cloned().unwrap_or_default();
    let package = match params.get("name") {
        Some(name) => format!("{scope}/{name}"),
        None => scope,
    };
    debug!(%package, "resolving package metadata");

    let document = state.proxy.cached_document(uri.path(), &headers).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        document,
    )
        .into_response())
}

/// Handler for GET /
///
/// Liveness probe: pings the store and reports 200 with an ok flag, or
/// 503 when the store is unreachable. Bypasses the engine's fetch path
/// entirely.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    match state.proxy.health().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::ok())).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Fallback handler for any unmatched path
///
/// Anything that is not a package metadata request is not ours to
/// serve; redirect the client to the upstream registry.
pub async fn redirect_handler(State(state): State<AppState>, uri: Uri) -> Redirect {
    let target = format!("{}{}", state.proxy.config().upstream_url, uri.path());
    Redirect::temporary(&target)
}
