//! Sequences the agents for one career-guidance request and routes
//! single-agent requests.

pub mod handlers;
pub mod pipeline;

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::{
    Agent, AgentInfo, AgentRequest, AgentResponse, CourseCatalogProvider, JobMarketProvider,
    MatchingEngine, ProjectAdvisor,
};
use crate::errors::AppError;
use crate::models::market::SnapshotSource;

use pipeline::{next_steps, CareerGuidance, CareerRequest, PipelineStage};

pub struct CareerOrchestrator {
    job_market: Arc<JobMarketProvider>,
    catalog: Arc<CourseCatalogProvider>,
    matching: Arc<MatchingEngine>,
    projects: Arc<ProjectAdvisor>,
}

impl CareerOrchestrator {
    pub fn new(
        job_market: Arc<JobMarketProvider>,
        catalog: Arc<CourseCatalogProvider>,
        matching: Arc<MatchingEngine>,
        projects: Arc<ProjectAdvisor>,
    ) -> Self {
        Self {
            job_market,
            catalog,
            matching,
            projects,
        }
    }

    fn agents(&self) -> [&dyn Agent; 4] {
        [
            self.job_market.as_ref(),
            self.catalog.as_ref(),
            self.matching.as_ref(),
            self.projects.as_ref(),
        ]
    }

    /// Runs the full pipeline. Only a blank career goal fails; every collaborator failure
    /// is replaced by fallback data and listed in `degraded`.
    pub async fn analyze_career(&self, request: CareerRequest) -> Result<CareerGuidance, AppError> {
        info!("[{}] career goal '{}'", PipelineStage::Receive, request.career_goal);
        let career_goal = request.career_goal.trim();
        if career_goal.is_empty() {
            return Err(AppError::Validation("career_goal cannot be empty".to_string()));
        }
        let location = request.location.trim();
        let mut degraded = Vec::new();

        info!("[{}]", PipelineStage::FetchMarketData);
        let snapshot = self.job_market.snapshot_for_goal(career_goal, location).await;
        if snapshot.source == SnapshotSource::Synthetic {
            warn!(
                "[{}] using synthetic market data for '{}'",
                PipelineStage::FetchMarketData,
                snapshot.title
            );
            degraded.push("job_market".to_string());
        }

        info!("[{}] source: {}", PipelineStage::FetchCatalog, self.catalog.source_name());
        let catalog = self.catalog.courses().await;
        if catalog.degraded {
            warn!("[{}] using built-in course catalog", PipelineStage::FetchCatalog);
            degraded.push("course_catalog".to_string());
        }

        let outcome = self
            .matching
            .evaluate(
                career_goal,
                &snapshot,
                &catalog.courses,
                &request.current_skills,
                &request.completed_courses,
            )
            .await;

        info!("[{}]", PipelineStage::Assemble);
        let steps = next_steps(
            &outcome.skill_gap,
            &outcome.recommendations,
            &outcome.learning_path,
        );
        let guidance = CareerGuidance {
            analysis_id: Uuid::new_v4(),
            career_goal: career_goal.to_string(),
            location: location.to_string(),
            total_recommended_courses: outcome.recommendations.len(),
            estimated_completion: outcome.learning_path.estimated_completion.clone(),
            next_steps: steps,
            job_market_analysis: snapshot,
            skill_gap_analysis: outcome.skill_gap,
            course_recommendations: outcome.recommendations,
            learning_path: outcome.learning_path,
            market_insights: outcome.market_insights,
            curriculum_comparison: outcome.curriculum_comparison,
            career_summary: outcome.career_summary,
            degraded,
            generated_at: Utc::now(),
        };

        info!(
            "[{}] analysis {} with {} recommendations",
            PipelineStage::Respond,
            guidance.analysis_id,
            guidance.total_recommended_courses
        );
        Ok(guidance)
    }

    /// Routes a single-agent request to the agent that handles it.
    pub async fn dispatch(&self, request: AgentRequest) -> Result<AgentResponse, AppError> {
        let Some(agent) = self.agents().into_iter().find(|a| a.handles(&request)) else {
            return Err(AppError::NotFound(format!(
                "No agent handles '{}' requests",
                request.kind()
            )));
        };
        info!("Dispatching '{}' request to {}", request.kind(), agent.name());
        agent.process_request(request).await
    }

    pub fn capabilities(&self) -> Vec<AgentInfo> {
        self.agents().iter().map(|a| a.info()).collect()
    }
}
