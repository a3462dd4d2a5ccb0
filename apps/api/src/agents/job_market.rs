//! Serves job-market snapshots through the TTL cache.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::agents::{require_text, unsupported, Agent, AgentRequest, AgentResponse};
use crate::errors::AppError;
use crate::market::SnapshotCache;
use crate::matching::archetypes::ArchetypeTable;
use crate::models::market::JobMarketSnapshot;

pub struct JobMarketProvider {
    cache: SnapshotCache,
    archetypes: Arc<ArchetypeTable>,
}

impl JobMarketProvider {
    pub fn new(cache: SnapshotCache, archetypes: Arc<ArchetypeTable>) -> Self {
        Self { cache, archetypes }
    }

    /// Cached or freshly aggregated snapshot. Never fails; synthetic data stands in for
    /// an unavailable source.
    pub async fn snapshot_for(&self, title: &str, location: &str) -> JobMarketSnapshot {
        self.cache.get_or_fetch(title.trim(), location.trim()).await
    }

    /// Snapshot for a career goal, looked up under the goal's canonical job title.
    pub async fn snapshot_for_goal(&self, career_goal: &str, location: &str) -> JobMarketSnapshot {
        let title = self.archetypes.job_title_for(career_goal);
        info!("Looking up job market for '{career_goal}' as '{title}'");
        self.snapshot_for(&title, location).await
    }
}

#[async_trait]
impl Agent for JobMarketProvider {
    fn name(&self) -> &'static str {
        "job_market"
    }

    fn description(&self) -> &'static str {
        "Aggregates job postings into skill frequencies, salary statistics and trends"
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "job_market_snapshot".to_string(),
            "skill_frequencies".to_string(),
            "salary_statistics".to_string(),
            "skill_trends".to_string(),
        ]
    }

    fn handles(&self, request: &AgentRequest) -> bool {
        matches!(request, AgentRequest::JobMarket(_))
    }

    async fn process_request(&self, request: AgentRequest) -> Result<AgentResponse, AppError> {
        let AgentRequest::JobMarket(query) = request else {
            return Err(unsupported(self.name(), &request));
        };
        require_text("title", &query.title)?;

        let snapshot = self.snapshot_for(&query.title, &query.location).await;
        Ok(AgentResponse::JobMarket(Box::new(snapshot)))
    }
}
