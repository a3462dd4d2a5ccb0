//! Axum route handlers for the career guidance API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::agents::project_advisor::{ProjectPlan, ProjectQuery};
use crate::agents::{AgentInfo, AgentRequest, AgentResponse, JobMarketQuery};
use crate::catalog::search::{CatalogQuery, CatalogSearchResult};
use crate::errors::AppError;
use crate::models::market::JobMarketSnapshot;
use crate::orchestrator::pipeline::{CareerGuidance, CareerRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub agents: Vec<AgentInfo>,
}

fn unexpected(response: AgentResponse) -> AppError {
    AppError::Internal(anyhow::anyhow!(
        "agent returned an unexpected response: {response:?}"
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/career-guidance
///
/// Full pipeline: market data → catalog → gaps → courses → path → insights → alignment.
pub async fn handle_career_guidance(
    State(state): State<AppState>,
    Json(request): Json<CareerRequest>,
) -> Result<Json<CareerGuidance>, AppError> {
    if request.career_goal.trim().is_empty() {
        return Err(AppError::Validation("career_goal cannot be empty".to_string()));
    }

    let guidance = state.orchestrator.analyze_career(request).await?;
    Ok(Json(guidance))
}

/// POST /api/v1/job-market
pub async fn handle_job_market(
    State(state): State<AppState>,
    Json(query): Json<JobMarketQuery>,
) -> Result<Json<JobMarketSnapshot>, AppError> {
    match state
        .orchestrator
        .dispatch(AgentRequest::JobMarket(query))
        .await?
    {
        AgentResponse::JobMarket(snapshot) => Ok(Json(*snapshot)),
        other => Err(unexpected(other)),
    }
}

/// POST /api/v1/courses/search
///
/// One of term, department or skill. 400 when none is given, 404 when nothing matches.
pub async fn handle_course_search(
    State(state): State<AppState>,
    Json(query): Json<CatalogQuery>,
) -> Result<Json<CatalogSearchResult>, AppError> {
    match state
        .orchestrator
        .dispatch(AgentRequest::CourseSearch(query))
        .await?
    {
        AgentResponse::CourseSearch(result) => Ok(Json(result)),
        other => Err(unexpected(other)),
    }
}

/// POST /api/v1/projects
pub async fn handle_projects(
    State(state): State<AppState>,
    Json(query): Json<ProjectQuery>,
) -> Result<Json<ProjectPlan>, AppError> {
    if query.career_goal.trim().is_empty() {
        return Err(AppError::Validation("career_goal cannot be empty".to_string()));
    }

    match state
        .orchestrator
        .dispatch(AgentRequest::Projects(query))
        .await?
    {
        AgentResponse::Projects(plan) => Ok(Json(plan)),
        other => Err(unexpected(other)),
    }
}

/// GET /api/v1/agents/capabilities
pub async fn handle_capabilities(State(state): State<AppState>) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        agents: state.orchestrator.capabilities(),
    })
}
