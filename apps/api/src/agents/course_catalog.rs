//! Catalog reads with fallback, search and relationships.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::agents::{unsupported, Agent, AgentRequest, AgentResponse};
use crate::catalog::search::{self, CatalogQuery, CatalogSearchResult, SkillIndex};
use crate::catalog::{CourseCatalogSource, StaticCatalog};
use crate::errors::AppError;
use crate::models::course::Course;

/// Courses as served to the pipeline.
#[derive(Debug, Clone)]
pub struct CatalogFetch {
    pub courses: Vec<Course>,
    /// True when the configured source failed and the built-in list was substituted.
    pub degraded: bool,
}

pub struct CourseCatalogProvider {
    source: Arc<dyn CourseCatalogSource>,
    fallback: StaticCatalog,
}

impl CourseCatalogProvider {
    pub fn new(source: Arc<dyn CourseCatalogSource>) -> Self {
        Self {
            source,
            fallback: StaticCatalog::new(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.describe()
    }

    /// All courses. An erroring or empty source is replaced by the built-in catalog.
    pub async fn courses(&self) -> CatalogFetch {
        match self.source.all().await {
            Ok(courses) if !courses.is_empty() => {
                info!(
                    "Loaded {} courses from {} catalog",
                    courses.len(),
                    self.source.describe()
                );
                CatalogFetch {
                    courses,
                    degraded: false,
                }
            }
            Ok(_) => {
                warn!(
                    "{} catalog returned no courses, using built-in catalog",
                    self.source.describe()
                );
                self.fallback_fetch()
            }
            Err(e) => {
                warn!(
                    "{} catalog unavailable, using built-in catalog: {e}",
                    self.source.describe()
                );
                self.fallback_fetch()
            }
        }
    }

    fn fallback_fetch(&self) -> CatalogFetch {
        CatalogFetch {
            courses: self.fallback.courses().to_vec(),
            degraded: true,
        }
    }

    pub async fn search(&self, query: &CatalogQuery) -> Result<CatalogSearchResult, AppError> {
        if query.is_empty() {
            return Err(AppError::Validation(
                "search term, department or skill must be provided".to_string(),
            ));
        }

        let fetch = self.courses().await;
        let index = SkillIndex::build(&fetch.courses);
        debug!("Skill index covers {} skills", index.len());
        let result = search::search(&fetch.courses, &index, query);

        if result.courses.is_empty() {
            return Err(AppError::NotFound("No courses match the search".to_string()));
        }
        info!("Catalog search matched {} courses", result.courses.len());
        Ok(result)
    }
}

#[async_trait]
impl Agent for CourseCatalogProvider {
    fn name(&self) -> &'static str {
        "course_catalog"
    }

    fn description(&self) -> &'static str {
        "Searches the course catalog by term, department or skill and maps course relationships"
    }

    fn capabilities(&self) -> Vec<String> {
        vec![
            "course_search".to_string(),
            "skill_index".to_string(),
            "course_relationships".to_string(),
            format!("catalog_source:{}", self.source.describe()),
        ]
    }

    fn handles(&self, request: &AgentRequest) -> bool {
        matches!(request, AgentRequest::CourseSearch(_))
    }

    async fn process_request(&self, request: AgentRequest) -> Result<AgentResponse, AppError> {
        let AgentRequest::CourseSearch(query) = request else {
            return Err(unsupported(self.name(), &request));
        };
        Ok(AgentResponse::CourseSearch(self.search(&query).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CollaboratorError;

    struct FailingCatalog;

    #[async_trait]
    impl CourseCatalogSource for FailingCatalog {
        async fn all(&self) -> Result<Vec<Course>, CollaboratorError> {
            Err(CollaboratorError::Unavailable("connection refused".to_string()))
        }

        fn describe(&self) -> &'static str {
            "failing"
        }
    }

    struct EmptyCatalog;

    #[async_trait]
    impl CourseCatalogSource for EmptyCatalog {
        async fn all(&self) -> Result<Vec<Course>, CollaboratorError> {
            Ok(vec![])
        }

        fn describe(&self) -> &'static str {
            "empty"
        }
    }

    #[tokio::test]
    async fn test_failing_source_falls_back_to_builtin() {
        let fetch = CourseCatalogProvider::new(Arc::new(FailingCatalog))
            .courses()
            .await;
        assert!(fetch.degraded);
        assert_eq!(fetch.courses.len(), StaticCatalog::new().courses().len());
    }

    #[tokio::test]
    async fn test_empty_source_falls_back_to_builtin() {
        let fetch = CourseCatalogProvider::new(Arc::new(EmptyCatalog)).courses().await;
        assert!(fetch.degraded);
        assert!(!fetch.courses.is_empty());
    }

    #[tokio::test]
    async fn test_configured_source_is_not_degraded() {
        let fetch = CourseCatalogProvider::new(Arc::new(StaticCatalog::new()))
            .courses()
            .await;
        assert!(!fetch.degraded);
    }

    #[tokio::test]
    async fn test_empty_query_is_validation_error() {
        let provider = CourseCatalogProvider::new(Arc::new(StaticCatalog::new()));
        let err = provider.search(&CatalogQuery::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_hits_is_not_found() {
        let provider = CourseCatalogProvider::new(Arc::new(StaticCatalog::new()));
        let query = CatalogQuery {
            department: Some("ZZZ".to_string()),
            ..Default::default()
        };
        let err = provider.search(&query).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_by_skill_through_agent() {
        let provider = CourseCatalogProvider::new(Arc::new(StaticCatalog::new()));
        let request = AgentRequest::CourseSearch(CatalogQuery {
            skill: Some("python".to_string()),
            ..Default::default()
        });
        assert!(provider.handles(&request));

        let AgentResponse::CourseSearch(result) = provider.process_request(request).await.unwrap()
        else {
            panic!("expected a course search response");
        };
        assert!(!result.courses.is_empty());
        assert!(result
            .skills
            .values()
            .any(|skills| skills.iter().any(|s| s.eq_ignore_ascii_case("python"))));
    }
}
