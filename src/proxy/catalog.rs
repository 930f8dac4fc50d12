//! Catalog Operations
//!
//! Bulk enumeration and purge of cached entries. These operate purely
//! on store key enumeration and never touch the upstream registry.

use tracing::info;

use super::Proxy;
use crate::error::Result;

impl Proxy {
    // == List ==
    /// Returns every cached request path, with the key prefix stripped.
    ///
    /// The listing is a finite snapshot in whatever order the store
    /// returns its keys.
    pub async fn cached_paths(&self) -> Result<Vec<String>> {
        let prefix = &self.config().key_prefix;
        let keys = self.store().keys(prefix).await?;

        Ok(keys
            .into_iter()
            .map(|key| strip_prefix_once(prefix, key))
            .collect())
    }

    // == Purge ==
    /// Deletes every cached entry under the key prefix.
    ///
    /// Keys are deleted one at a time and the first failure aborts the
    /// operation: earlier deletions stay deleted, the remainder stays
    /// cached. Returns the number of keys purged on success.
    pub async fn purge_cached_paths(&self) -> Result<usize> {
        let keys = self.store().keys(&self.config().key_prefix).await?;

        for key in &keys {
            self.store().delete(key).await?;
        }

        info!(count = keys.len(), "purged cached entries");
        Ok(keys.len())
    }
}

/// Strips exactly one leading occurrence of `prefix` from `key`.
/// Interior occurrences are left alone.
pub(crate) fn strip_prefix_once(prefix: &str, key: String) -> String {
    match key.strip_prefix(prefix) {
        Some(rest) => rest.to_string(),
        None => key,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::store::{MemoryStore, Store};

    const TTL: Duration = Duration::from_secs(300);

    async fn seeded_proxy(paths: &[&str]) -> Proxy {
        let config = Config::default();
        let store = Arc::new(MemoryStore::new());
        for path in paths {
            let key = format!("{}{}", config.key_prefix, path);
            store.set(&key, b"{}", TTL).await.unwrap();
        }
        Proxy::new(config, store).unwrap()
    }

    #[tokio::test]
    async fn test_cached_paths_strips_prefix() {
        let proxy = seeded_proxy(&["/lodash", "/@scope/pkg"]).await;

        let paths = proxy.cached_paths().await.unwrap();
        assert_eq!(paths, vec!["/@scope/pkg".to_string(), "/lodash".to_string()]);
    }

    #[tokio::test]
    async fn test_cached_paths_keeps_interior_prefix() {
        // A path that happens to contain the prefix string must only
        // lose the leading occurrence.
        let proxy = seeded_proxy(&["/registry-proxy:inner"]).await;

        let paths = proxy.cached_paths().await.unwrap();
        assert_eq!(paths, vec!["/registry-proxy:inner".to_string()]);
    }

    #[tokio::test]
    async fn test_cached_paths_empty_store() {
        let proxy = seeded_proxy(&[]).await;
        assert!(proxy.cached_paths().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_removes_everything() {
        let proxy = seeded_proxy(&["/a", "/b", "/c"]).await;

        let purged = proxy.purge_cached_paths().await.unwrap();
        assert_eq!(purged, 3);
        assert!(proxy.cached_paths().await.unwrap().is_empty());
    }

    #[test]
    fn test_strip_prefix_once() {
        assert_eq!(strip_prefix_once("p:", "p:/lodash".to_string()), "/lodash");
        assert_eq!(strip_prefix_once("p:", "/no-prefix".to_string()), "/no-prefix");
        assert_eq!(strip_prefix_once("p:", "p:p:double".to_string()), "p:double");
    }
}
