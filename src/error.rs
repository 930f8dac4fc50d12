//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

// == Proxy Error Enum ==
/// Unified error type for the proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Configuration is missing or invalid
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Store read/write/enumerate/delete failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Upstream registry request failed at the transport level
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Upstream declared a gzip body that could not be decompressed
    #[error("failed to decompress upstream response: {0}")]
    Gzip(#[from] std::io::Error),
}

// == IntoResponse Implementation ==
/// Any error that escapes a handler becomes a 500 with the message in a
/// JSON body. Store misses never reach this point; they drive the
/// upstream fetch path inside the engine instead.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
