//! Job Market Data Cache: fetch-or-reuse snapshots keyed by (title, location).
//!
//! Hit within TTL → cached snapshot, unchanged. Miss or stale → fetch, aggregate, write
//! back. Fetch failures, empty results and store errors all degrade to a synthetic
//! snapshot; nothing here returns an error.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::market::aggregate::build_snapshot;
use crate::market::fallback::synthesize_snapshot;
use crate::market::source::JobDataSource;
use crate::market::store::{CacheKey, SnapshotStore};
use crate::matching::archetypes::ArchetypeTable;
use crate::models::market::JobMarketSnapshot;

#[derive(Clone)]
pub struct SnapshotCache {
    source: Arc<dyn JobDataSource>,
    store: Arc<dyn SnapshotStore>,
    archetypes: Arc<ArchetypeTable>,
    ttl: Duration,
    fetch_limit: u32,
}

impl SnapshotCache {
    pub fn new(
        source: Arc<dyn JobDataSource>,
        store: Arc<dyn SnapshotStore>,
        archetypes: Arc<ArchetypeTable>,
        ttl: Duration,
        fetch_limit: u32,
    ) -> Self {
        Self {
            source,
            store,
            archetypes,
            ttl,
            fetch_limit,
        }
    }

    pub async fn get_or_fetch(&self, title: &str, location: &str) -> JobMarketSnapshot {
        self.get_or_fetch_at(title, location, Utc::now()).await
    }

    /// `get_or_fetch` against an explicit clock.
    pub async fn get_or_fetch_at(
        &self,
        title: &str,
        location: &str,
        now: DateTime<Utc>,
    ) -> JobMarketSnapshot {
        let key = CacheKey::new(title, location);

        match self.store.get(&key).await {
            Ok(Some(cached)) if self.is_fresh(&cached, now) => {
                debug!("Job market cache hit for {:?}", key);
                return cached;
            }
            Ok(Some(_)) => debug!("Job market cache entry for {:?} is stale", key),
            Ok(None) => debug!("Job market cache miss for {:?}", key),
            Err(e) => warn!("Job market cache read failed, treating as miss: {e}"),
        }

        let postings = match self.source.fetch(title, location, self.fetch_limit).await {
            Ok(postings) if !postings.is_empty() => postings,
            Ok(_) => {
                warn!("Job data source returned no postings for '{title}', using synthetic data");
                return synthesize_snapshot(&self.archetypes, title, location, now);
            }
            Err(e) => {
                warn!("Job data fetch failed for '{title}', using synthetic data: {e}");
                return synthesize_snapshot(&self.archetypes, title, location, now);
            }
        };

        let snapshot = build_snapshot(title, location, &postings, now);
        if snapshot.skills.is_empty() {
            warn!(
                "{} postings for '{title}' yielded no skills, using synthetic data",
                postings.len()
            );
            return synthesize_snapshot(&self.archetypes, title, location, now);
        }

        if let Err(e) = self.store.put(&key, &snapshot).await {
            warn!("Failed to cache job market snapshot: {e}");
        }
        info!(
            "Cached live snapshot for '{title}' ({} postings, {} skills)",
            snapshot.job_count,
            snapshot.skills.len()
        );
        snapshot
    }

    /// Strictly younger than the TTL.
    fn is_fresh(&self, snapshot: &JobMarketSnapshot, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(snapshot.fetched_at) < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::CollaboratorError;
    use crate::market::store::{CacheError, MemorySnapshotStore};
    use crate::models::market::{JobPosting, SnapshotSource};

    /// Serves queued responses in order and counts calls.
    struct ScriptedSource {
        responses: Mutex<Vec<Result<Vec<JobPosting>, CollaboratorError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(mut responses: Vec<Result<Vec<JobPosting>, CollaboratorError>>) -> Arc<Self> {
            responses.reverse();
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobDataSource for ScriptedSource {
        async fn fetch(
            &self,
            _title: &str,
            _location: &str,
            _limit: u32,
        ) -> Result<Vec<JobPosting>, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(CollaboratorError::Unavailable("script exhausted".into())))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl SnapshotStore for BrokenStore {
        async fn get(&self, _key: &CacheKey) -> Result<Option<JobMarketSnapshot>, CacheError> {
            Err(CacheError::Serde(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            ))
        }

        async fn put(&self, _key: &CacheKey, _s: &JobMarketSnapshot) -> Result<(), CacheError> {
            Err(CacheError::Serde(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            ))
        }
    }

    fn postings(skills: &[&str]) -> Vec<JobPosting> {
        vec![JobPosting {
            title: "Data Scientist".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            salary: Some("$90k - $120k".to_string()),
            ..Default::default()
        }]
    }

    fn cache(source: Arc<ScriptedSource>, store: Arc<dyn SnapshotStore>) -> SnapshotCache {
        SnapshotCache::new(
            source,
            store,
            Arc::new(ArchetypeTable::builtin()),
            Duration::hours(24),
            10,
        )
    }

    #[tokio::test]
    async fn test_hits_within_ttl_do_not_refetch() {
        let source = ScriptedSource::new(vec![Ok(postings(&["Python", "SQL"]))]);
        let cache = cache(source.clone(), Arc::new(MemorySnapshotStore::new(Duration::hours(24))));
        let t0 = Utc::now();

        let first = cache.get_or_fetch_at("Data Scientist", "Dallas", t0).await;
        let second = cache
            .get_or_fetch_at("data  scientist", "dallas", t0 + Duration::hours(23))
            .await;

        assert_eq!(source.calls(), 1);
        assert_eq!(first, second);
        assert_eq!(first.source, SnapshotSource::Live);
        assert_eq!(first.fetched_at, t0);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let source = ScriptedSource::new(vec![
            Ok(postings(&["Python"])),
            Ok(postings(&["Rust"])),
        ]);
        let cache = cache(source.clone(), Arc::new(MemorySnapshotStore::new(Duration::hours(24))));
        let t0 = Utc::now();

        cache.get_or_fetch_at("Data Scientist", "", t0).await;
        let refreshed = cache
            .get_or_fetch_at("Data Scientist", "", t0 + Duration::hours(24))
            .await;

        assert_eq!(source.calls(), 2);
        assert!(refreshed.skills.contains_key("Rust"));
        assert_eq!(refreshed.fetched_at, t0 + Duration::hours(24));
    }

    #[tokio::test]
    async fn test_fetch_failure_synthesizes_and_skips_write_back() {
        let source = ScriptedSource::new(vec![
            Err(CollaboratorError::Unavailable("down".into())),
            Ok(postings(&["Python"])),
        ]);
        let store = Arc::new(MemorySnapshotStore::new(Duration::hours(24)));
        let cache = cache(source.clone(), store.clone());
        let now = Utc::now();

        let snapshot = cache.get_or_fetch_at("Financial Analyst", "NYC", now).await;
        assert_eq!(snapshot.source, SnapshotSource::Synthetic);
        assert!(snapshot.skills.contains_key("Financial Modeling"));
        assert_eq!(store.len().await, 0);

        let live = cache.get_or_fetch_at("Financial Analyst", "NYC", now).await;
        assert_eq!(live.source, SnapshotSource::Live);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_and_skill_less_results_synthesize() {
        let source = ScriptedSource::new(vec![Ok(vec![]), Ok(postings(&[]))]);
        let cache = cache(source, Arc::new(MemorySnapshotStore::new(Duration::hours(24))));

        let empty = cache.get_or_fetch("devops engineer", "").await;
        assert_eq!(empty.source, SnapshotSource::Synthetic);

        let skill_less = cache.get_or_fetch("devops engineer", "").await;
        assert_eq!(skill_less.source, SnapshotSource::Synthetic);
        assert!(skill_less.skills.contains_key("Docker"));
    }

    #[tokio::test]
    async fn test_store_errors_are_downgraded() {
        let source = ScriptedSource::new(vec![Ok(postings(&["SQL"]))]);
        let cache = cache(source.clone(), Arc::new(BrokenStore));

        let snapshot = cache.get_or_fetch("business analyst", "").await;
        assert_eq!(snapshot.source, SnapshotSource::Live);
        assert_eq!(source.calls(), 1);
    }
}
