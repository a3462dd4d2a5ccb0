//! Where cached snapshots live between requests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Duration;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::market::JobMarketSnapshot;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Snapshot serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Normalized (title, location) pair. "Data  Scientist" and "data scientist" share an
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub title: String,
    pub location: String,
}

impl CacheKey {
    pub fn new(title: &str, location: &str) -> Self {
        Self {
            title: normalize(title),
            location: normalize(location),
        }
    }

    pub fn redis_key(&self) -> String {
        format!("job_market:{}:{}", self.title, self.location)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Raw storage. Freshness is decided by `SnapshotCache`, not here.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<JobMarketSnapshot>, CacheError>;
    async fn put(&self, key: &CacheKey, snapshot: &JobMarketSnapshot) -> Result<(), CacheError>;
}

/// Process-local store. The lock is never held across an await on anything else.
///
/// Each `put` drops entries that are at least `ttl` older than the snapshot being
/// written, so the map holds roughly one TTL window of titles.
pub struct MemorySnapshotStore {
    entries: RwLock<HashMap<CacheKey, JobMarketSnapshot>>,
    ttl: Duration,
}

impl MemorySnapshotStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<JobMarketSnapshot>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &CacheKey, snapshot: &JobMarketSnapshot) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, cached| {
            snapshot.fetched_at.signed_duration_since(cached.fetched_at) < self.ttl
        });
        if entries.len() < before {
            debug!("Evicted {} stale snapshots", before - entries.len());
        }
        entries.insert(key.clone(), snapshot.clone());
        Ok(())
    }
}

/// Redis-backed store: JSON values written with `SET .. EX ttl`.
pub struct RedisSnapshotStore {
    client: redis::Client,
    ttl_seconds: u64,
}

impl RedisSnapshotStore {
    pub fn new(client: redis::Client, ttl_seconds: u64) -> Self {
        Self {
            client,
            ttl_seconds,
        }
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<JobMarketSnapshot>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key.redis_key()).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &CacheKey, snapshot: &JobMarketSnapshot) -> Result<(), CacheError> {
        let json = serde_json::to_string(snapshot)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key.redis_key(), json, self.ttl_seconds)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::models::market::{SalaryStats, SnapshotSource};

    fn store() -> MemorySnapshotStore {
        MemorySnapshotStore::new(Duration::hours(24))
    }

    fn snapshot(title: &str) -> JobMarketSnapshot {
        JobMarketSnapshot {
            title: title.to_string(),
            location: "Dallas".to_string(),
            job_count: 1,
            skills: BTreeMap::from([("SQL".to_string(), 1)]),
            salary_stats: SalaryStats::default(),
            trends: vec![],
            fetched_at: Utc::now(),
            source: SnapshotSource::Live,
        }
    }

    #[test]
    fn test_cache_key_normalizes() {
        let a = CacheKey::new("  Data   Scientist ", "Dallas, TX");
        let b = CacheKey::new("data scientist", "dallas,  tx");
        assert_eq!(a, b);
        assert_eq!(a.redis_key(), "job_market:data scientist:dallas, tx");
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = store();
        let key = CacheKey::new("Data Scientist", "Dallas");
        assert!(store.get(&key).await.unwrap().is_none());

        let snap = snapshot("Data Scientist");
        store.put(&key, &snap).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(snap));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_overwrites() {
        let store = store();
        let key = CacheKey::new("analyst", "");
        store.put(&key, &snapshot("first")).await.unwrap();
        store.put(&key, &snapshot("second")).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap().unwrap().title, "second");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_evicts_entries_past_ttl() {
        let store = store();
        let t0 = Utc::now();
        let mut old = snapshot("pastry chef");
        old.fetched_at = t0;
        let mut recent = snapshot("baker");
        recent.fetched_at = t0 + Duration::hours(12);
        store.put(&CacheKey::new("pastry chef", ""), &old).await.unwrap();
        store.put(&CacheKey::new("baker", ""), &recent).await.unwrap();
        assert_eq!(store.len().await, 2);

        let mut later = snapshot("florist");
        later.fetched_at = t0 + Duration::hours(25);
        store.put(&CacheKey::new("florist", ""), &later).await.unwrap();

        assert!(store
            .get(&CacheKey::new("pastry chef", ""))
            .await
            .unwrap()
            .is_none());
        assert!(store.get(&CacheKey::new("baker", "")).await.unwrap().is_some());
        assert_eq!(store.len().await, 2);
    }
}
