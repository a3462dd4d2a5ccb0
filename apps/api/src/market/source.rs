//! Job data sources: where live postings come from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::CollaboratorError;
use crate::models::market::JobPosting;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// External job-posting provider. Timeouts and retries are the implementor's concern.
#[async_trait]
pub trait JobDataSource: Send + Sync {
    async fn fetch(
        &self,
        title: &str,
        location: &str,
        limit: u32,
    ) -> Result<Vec<JobPosting>, CollaboratorError>;
}

/// Used when no job data service is configured. Every fetch reports unavailable, so
/// callers go straight to synthetic data.
pub struct NoJobDataSource;

#[async_trait]
impl JobDataSource for NoJobDataSource {
    async fn fetch(
        &self,
        _title: &str,
        _location: &str,
        _limit: u32,
    ) -> Result<Vec<JobPosting>, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "no job data source configured".to_string(),
        ))
    }
}

/// The service answers with either a bare array or `{"jobs": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobsResponse {
    Bare(Vec<JobPosting>),
    Wrapped { jobs: Vec<JobPosting> },
}

impl JobsResponse {
    fn into_postings(self) -> Vec<JobPosting> {
        match self {
            JobsResponse::Bare(jobs) | JobsResponse::Wrapped { jobs } => jobs,
        }
    }
}

/// `GET {base_url}/jobs?title=..&location=..&limit=..` with exponential backoff on
/// transport errors, 429 and 5xx.
#[derive(Clone)]
pub struct HttpJobDataSource {
    client: Client,
    base_url: String,
}

impl HttpJobDataSource {
    pub fn new(base_url: &str) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CollaboratorError::Unavailable(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JobDataSource for HttpJobDataSource {
    async fn fetch(
        &self,
        title: &str,
        location: &str,
        limit: u32,
    ) -> Result<Vec<JobPosting>, CollaboratorError> {
        let url = format!("{}/jobs", self.base_url);
        let limit = limit.to_string();
        let mut last_error: Option<CollaboratorError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Job data fetch attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .get(&url)
                .query(&[("title", title), ("location", location), ("limit", limit.as_str())])
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CollaboratorError::Unavailable(e.to_string()));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                last_error = Some(CollaboratorError::Unavailable(format!(
                    "job data service returned {status}"
                )));
                continue;
            }
            if !status.is_success() {
                return Err(CollaboratorError::Unavailable(format!(
                    "job data service returned {status}"
                )));
            }

            let body = response
                .text()
                .await
                .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
            let postings = serde_json::from_str::<JobsResponse>(&body)
                .map_err(|e| CollaboratorError::Malformed(e.to_string()))?
                .into_postings();

            debug!("Fetched {} postings for '{title}' in '{location}'", postings.len());
            return Ok(postings);
        }

        Err(last_error.unwrap_or_else(|| {
            CollaboratorError::Unavailable(format!("gave up after {MAX_RETRIES} attempts"))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_response_accepts_both_shapes() {
        let bare: JobsResponse =
            serde_json::from_str(r#"[{"title":"Analyst","skills":["SQL"]}]"#).unwrap();
        assert_eq!(bare.into_postings().len(), 1);

        let wrapped: JobsResponse =
            serde_json::from_str(r#"{"jobs":[{"title":"A"},{"title":"B"}]}"#).unwrap();
        assert_eq!(wrapped.into_postings().len(), 2);
    }

    #[tokio::test]
    async fn test_no_source_is_unavailable() {
        let result = NoJobDataSource.fetch("data scientist", "", 10).await;
        assert!(matches!(result, Err(CollaboratorError::Unavailable(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = HttpJobDataSource::new("http://jobs.internal/").unwrap();
        assert_eq!(source.base_url, "http://jobs.internal");
    }
}
