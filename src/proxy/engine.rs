//! Cache Engine
//!
//! The core read-through logic: resolve a metadata document from the
//! store, fall back to the upstream registry on a miss, populate the
//! store, and rewrite tarball URLs to point back at this proxy.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use flate2::read::GzDecoder;
use regex::bytes::{NoExpand, Regex};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, CONTENT_ENCODING, HOST};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::store::{Store, StoreError};

/// Matches the quoted tarball URL field up to the first `/` after the
/// host. The lazy quantifier stops the match at the host boundary, so
/// only the scheme-and-host prefix is replaced and the tarball path is
/// preserved.
const TARBALL_PATTERN: &str = r#""tarball":"https?://.*?/"#;

// == Proxy ==
/// The cache engine.
///
/// Holds the configuration, the store handle, the upstream HTTP client,
/// and the rewrite pattern (compiled once at construction). No mutable
/// state is kept between requests; everything durable lives in the
/// store, so a `Proxy` can be shared behind an `Arc` without locking.
pub struct Proxy {
    config: Config,
    store: Arc<dyn Store>,
    client: reqwest::Client,
    rewrite_pattern: Regex,
    rewrite_replacement: Vec<u8>,
}

impl Proxy {
    /// Creates a new engine over `store` with the given configuration.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Result<Self> {
        let rewrite_pattern = Regex::new(TARBALL_PATTERN)
            .map_err(|e| ProxyError::Config(format!("invalid rewrite pattern: {e}")))?;
        let rewrite_replacement = format!(r#""dist":"{}/"#, config.local_url).into_bytes();
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            config,
            store,
            client,
            rewrite_pattern,
            rewrite_replacement,
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    // == Resolve ==
    /// Returns the metadata document for a request path, applying
    /// cache-aside semantics.
    ///
    /// A store hit serves the cached copy. A store miss fetches
    /// `upstream_url + path` (forwarding the inbound headers, forcing
    /// `Accept-Encoding: gzip`) and caches the body with the configured
    /// TTL. Any store failure other than a miss propagates immediately
    /// without fetching. Tarball URLs in the returned document are
    /// rewritten to point at this proxy.
    pub async fn cached_document(&self, path: &str, headers: &HeaderMap) -> Result<Vec<u8>> {
        let key = format!("{}{}", self.config.key_prefix, path);

        let document = match self.store.get(&key).await {
            Ok(document) => {
                debug!(%key, "cache hit");
                document
            }
            Err(StoreError::NotFound(_)) => {
                debug!(%key, "cache miss, fetching upstream");
                let document = self.fetch_upstream(path, headers).await?;

                let ttl = Duration::from_secs(self.config.cache_ttl);
                if let Err(e) = self.store.set(&key, &document, ttl).await {
                    // The write is an optimization; serve the fetched
                    // document regardless.
                    warn!(%key, error = %e, "failed to cache fetched document");
                }

                document
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.rewrite(&document))
    }

    // == Fetch ==
    /// Fetches a document from the upstream registry.
    ///
    /// Inbound headers are forwarded except `Host` (the client derives
    /// it from the target URL), and `Accept-Encoding: gzip` is forced
    /// to normalize the transfer. A gzip-encoded body is decompressed
    /// before being returned; a body that cannot be decompressed fails
    /// the request. No retries.
    async fn fetch_upstream(&self, path: &str, headers: &HeaderMap) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.config.upstream_url, path);

        let mut forwarded = headers.clone();
        forwarded.remove(HOST);
        forwarded.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let response = self.client.get(&url).headers(forwarded).send().await?;

        let gzipped = response
            .headers()
            .get(CONTENT_ENCODING)
            .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"gzip"));

        let body = response.bytes().await?;

        if gzipped {
            let mut decoded = Vec::new();
            GzDecoder::new(body.as_ref()).read_to_end(&mut decoded)?;
            Ok(decoded)
        } else {
            Ok(body.to_vec())
        }
    }

    // == Rewrite ==
    /// Replaces every tarball URL prefix with `"dist":"<local_url>/`.
    ///
    /// Operates on bytes so a non-UTF-8 document passes through
    /// untouched rather than failing. A document with no match is
    /// returned unchanged.
    pub(crate) fn rewrite(&self, document: &[u8]) -> Vec<u8> {
        self.rewrite_pattern
            .replace_all(document, NoExpand(&self.rewrite_replacement))
            .into_owned()
    }

    // == Health ==
    /// Liveness of the underlying store.
    pub async fn health(&self) -> Result<()> {
        Ok(self.store.health().await?)
    }
}
