pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::orchestrator::handlers;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/career-guidance",
            post(handlers::handle_career_guidance),
        )
        .route("/api/v1/job-market", post(handlers::handle_job_market))
        .route("/api/v1/courses/search", post(handlers::handle_course_search))
        .route("/api/v1/projects", post(handlers::handle_projects))
        .route(
            "/api/v1/agents/capabilities",
            get(handlers::handle_capabilities),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::agents::{CourseCatalogProvider, JobMarketProvider, MatchingEngine, ProjectAdvisor};
    use crate::catalog::StaticCatalog;
    use crate::config::Config;
    use crate::market::{MemorySnapshotStore, NoJobDataSource, SnapshotCache};
    use crate::matching::archetypes::ArchetypeTable;
    use crate::orchestrator::CareerOrchestrator;

    fn app() -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        let archetypes = Arc::new(ArchetypeTable::builtin());
        let cache = SnapshotCache::new(
            Arc::new(NoJobDataSource),
            Arc::new(MemorySnapshotStore::new(chrono::Duration::hours(config.cache_ttl_hours))),
            archetypes.clone(),
            chrono::Duration::hours(config.cache_ttl_hours),
            config.job_fetch_limit,
        );
        let orchestrator = CareerOrchestrator::new(
            Arc::new(JobMarketProvider::new(cache, archetypes.clone())),
            Arc::new(CourseCatalogProvider::new(Arc::new(StaticCatalog::new()))),
            Arc::new(MatchingEngine::new(
                config.scoring_config(),
                archetypes.clone(),
                None,
            )),
            Arc::new(ProjectAdvisor::new(None, archetypes)),
        );
        build_router(AppState {
            config,
            orchestrator: Arc::new(orchestrator),
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "advisor-api");
        assert_eq!(body["collaborators"]["course_catalog"], "static");
    }

    #[tokio::test]
    async fn test_career_guidance_round_trip() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/v1/career-guidance",
            Some(json!({
                "career_goal": "Data Scientist",
                "location": "Dallas, TX",
                "current_skills": ["Python"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["career_goal"], "Data Scientist");
        assert_eq!(body["degraded"], json!(["job_market"]));
        assert!(body["course_recommendations"].as_array().unwrap().len() <= 6);
        assert!(body["learning_path"]["semesters"].is_array());
        assert!(body["analysis_id"].is_string());
    }

    #[tokio::test]
    async fn test_empty_goal_is_bad_request() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/v1/career-guidance",
            Some(json!({ "career_goal": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_course_search_requires_a_criterion() {
        let (status, _) = send(app(), "POST", "/api/v1/courses/search", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            app(),
            "POST",
            "/api/v1/courses/search",
            Some(json!({ "department": "FIN" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["courses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_projects_and_capabilities() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/v1/projects",
            Some(json!({ "career_goal": "Software Engineer", "skill_level": "beginner" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_projects"], 3);

        let (status, body) = send(app(), "GET", "/api/v1/agents/capabilities", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agents"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, body) = send(app(), "GET", "/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
