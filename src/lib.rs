//! Registry Proxy - A caching read-through proxy for npm registry metadata
//!
//! Serves package metadata documents from a key-value store, fetching
//! from the upstream registry on a miss and rewriting tarball URLs to
//! point back at the proxy.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use proxy::Proxy;
pub use tasks::spawn_cleanup_task;
