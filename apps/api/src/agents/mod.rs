//! Agents: the four specialised services behind one polymorphic interface.
//!
//! Each agent is constructed once in `main`, injected into the `CareerOrchestrator`,
//! and reached either directly by the pipeline or through `AgentRequest` dispatch.

pub mod course_catalog;
pub mod job_market;
pub mod matching;
pub mod project_advisor;
pub mod prompts;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::search::{CatalogQuery, CatalogSearchResult};
use crate::errors::AppError;
use crate::models::course::Course;
use crate::models::market::JobMarketSnapshot;

pub use course_catalog::CourseCatalogProvider;
pub use job_market::JobMarketProvider;
pub use matching::{MatchOutcome, MatchingEngine};
pub use project_advisor::{ProjectAdvisor, ProjectPlan, ProjectQuery};

// ────────────────────────────────────────────────────────────────────────────
// Requests / responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMarketQuery {
    #[serde(alias = "job_title")]
    pub title: String,
    #[serde(default)]
    pub location: String,
}

/// Offline career advice: required skills come from the caller (or the goal's archetype),
/// courses from the caller (or the built-in catalog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerAdviceQuery {
    pub career_goal: String,
    #[serde(default)]
    pub required_skills: BTreeMap<String, u32>,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub completed_courses: Vec<String>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum AgentRequest {
    JobMarket(JobMarketQuery),
    CourseSearch(CatalogQuery),
    CareerAdvice(CareerAdviceQuery),
    Projects(ProjectQuery),
}

impl AgentRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            AgentRequest::JobMarket(_) => "job_market",
            AgentRequest::CourseSearch(_) => "course_search",
            AgentRequest::CareerAdvice(_) => "career_advice",
            AgentRequest::Projects(_) => "projects",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AgentResponse {
    JobMarket(Box<JobMarketSnapshot>),
    CourseSearch(CatalogSearchResult),
    CareerAdvice(Box<MatchOutcome>),
    Projects(ProjectPlan),
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn capabilities(&self) -> Vec<String>;

    /// Whether `process_request` accepts this request variant.
    fn handles(&self, request: &AgentRequest) -> bool;

    async fn process_request(&self, request: AgentRequest) -> Result<AgentResponse, AppError>;

    fn info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name(),
            description: self.description(),
            capabilities: self.capabilities(),
        }
    }
}

/// Error for a request routed to the wrong agent.
pub(crate) fn unsupported(agent: &str, request: &AgentRequest) -> AppError {
    AppError::Internal(anyhow::anyhow!(
        "{agent} cannot handle '{}' requests",
        request.kind()
    ))
}

/// Rejects blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
