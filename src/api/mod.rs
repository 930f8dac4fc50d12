//! API Module
//!
//! HTTP handlers and routing for the proxy surface.
//!
//! # Endpoints
//! - `GET /` - Store liveness probe
//! - `GET /:scope` - Metadata for an unscoped package
//! - `GET /:scope/:name` - Metadata for a scoped package
//! - anything else - 307 redirect to the upstream registry

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
