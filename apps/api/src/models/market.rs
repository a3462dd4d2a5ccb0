use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single job posting as returned by the job data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "job_description")]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, alias = "salary_range")]
    pub salary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Salary figures averaged across postings that advertised one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    pub count: u32,
    pub average_min: f64,
    pub average_max: f64,
    pub overall_average: f64,
}

/// A skill ranked by how often it appeared in the snapshot's postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub skill: String,
    pub count: u32,
    pub score: u32, // min(10, count)
}

/// Where a snapshot's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Live,
    Synthetic,
    /// Built from skill frequencies supplied by the caller.
    Provided,
}

/// Aggregated job-market statistics for one (title, location) pair.
///
/// Immutable once cached. A newer snapshot only replaces it after the TTL expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMarketSnapshot {
    pub title: String,
    pub location: String,
    pub job_count: u32,
    pub skills: BTreeMap<String, u32>,
    pub salary_stats: SalaryStats,
    pub trends: Vec<TrendEntry>,
    pub fetched_at: DateTime<Utc>,
    pub source: SnapshotSource,
}

impl JobMarketSnapshot {
    /// Skills ordered by descending frequency, then name.
    pub fn ranked_skills(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> = self
            .skills
            .iter()
            .map(|(skill, freq)| (skill.as_str(), *freq))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_skills_orders_by_frequency_then_name() {
        let snapshot = JobMarketSnapshot {
            title: "data scientist".to_string(),
            location: String::new(),
            job_count: 3,
            skills: BTreeMap::from([
                ("SQL".to_string(), 3),
                ("Docker".to_string(), 3),
                ("Python".to_string(), 5),
            ]),
            salary_stats: SalaryStats::default(),
            trends: vec![],
            fetched_at: Utc::now(),
            source: SnapshotSource::Live,
        };

        let ranked = snapshot.ranked_skills();
        assert_eq!(ranked, vec![("Python", 5), ("Docker", 3), ("SQL", 3)]);
    }

    #[test]
    fn test_posting_accepts_legacy_field_names() {
        let json = r#"{"title":"Analyst","job_description":"SQL daily","salary_range":"$60k - $80k"}"#;
        let posting: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.description, "SQL daily");
        assert_eq!(posting.salary.as_deref(), Some("$60k - $80k"));
        assert!(posting.skills.is_empty());
    }
}
