//! Persistent TTL cache for raw report text
//!
//! Fetched METAR/TAF text is kept for a short window so repeated checks of
//! the same airport do not hammer the weather service. Computed wind results
//! are never cached.

use anyhow::{Result, anyhow};
use fjall::Keyspace;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::error::RunwayWindError;
use crate::report::ReportKind;

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

/// On-disk cache handle, cheap to clone
#[derive(Clone)]
pub struct ReportCache {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

/// Cache key for one report of one airport
#[must_use]
pub fn report_key(kind: ReportKind, icao: &str) -> String {
    format!("{}:{}", kind.cache_prefix(), icao.to_ascii_uppercase())
}

impl ReportCache {
    /// Open (or create) the cache database in `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open().map_err(|e| {
            RunwayWindError::cache(format!("Failed to open cache database: {e}"))
        })?;
        let items = db.keyspace("reports", fjall::KeyspaceCreateOptions::default)?;
        Ok(ReportCache { store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = SystemTime::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        if now < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_key() {
        assert_eq!(report_key(ReportKind::Metar, "lirf"), "metar:LIRF");
        assert_eq!(report_key(ReportKind::Taf, "LIRF"), "taf:LIRF");
    }

    #[tokio::test]
    async fn test_put_and_get_fresh_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::open(dir.path()).unwrap();

        let text = "METAR LIRF 121150Z 24015KT 9999 FEW030 18/09 Q1015".to_string();
        cache
            .put("metar:LIRF", text.clone(), Duration::from_secs(300))
            .await
            .unwrap();

        let cached: Option<String> = cache.get("metar:LIRF").await.unwrap();
        assert_eq!(cached, Some(text));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::open(dir.path()).unwrap();

        cache
            .put("taf:LIRF", "TAF LIRF ...".to_string(), Duration::ZERO)
            .await
            .unwrap();

        let cached: Option<String> = cache.get("taf:LIRF").await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::open(dir.path()).unwrap();

        let cached: Option<String> = cache.get("metar:LIMC").await.unwrap();
        assert!(cached.is_none());
    }
}
