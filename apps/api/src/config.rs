use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::config::{PriorityThresholds, PriorityWeights, ScoringConfig};

/// Application configuration loaded from environment variables.
/// Every collaborator is optional; a missing one falls back to built-in data.
/// Fails at startup if a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Postgres course catalog.
    pub database_url: Option<String>,
    /// JSON course catalog, used when no database is configured.
    pub course_catalog_path: Option<String>,
    pub redis_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub job_data_url: Option<String>,
    pub archetypes_path: Option<String>,
    pub job_fetch_limit: u32,
    pub cache_ttl_hours: i64,
    pub priority_weights: PriorityWeights,
    pub priority_thresholds: PriorityThresholds,
    pub max_recommendations: usize,
    pub min_recommendations: usize,
    pub courses_per_semester: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let weights = PriorityWeights::default();
        let thresholds = PriorityThresholds::default();

        let config = Config {
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            database_url: get("DATABASE_URL"),
            course_catalog_path: get("COURSE_CATALOG_PATH"),
            redis_url: get("REDIS_URL"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            job_data_url: get("JOB_DATA_URL"),
            archetypes_path: get("ARCHETYPES_PATH"),
            job_fetch_limit: parse_or(&get, "JOB_FETCH_LIMIT", 10)?,
            cache_ttl_hours: parse_or(&get, "CACHE_TTL_HOURS", 24)?,
            priority_weights: PriorityWeights {
                critical: parse_or(&get, "PRIORITY_WEIGHT_CRITICAL", weights.critical)?,
                high: parse_or(&get, "PRIORITY_WEIGHT_HIGH", weights.high)?,
                medium: parse_or(&get, "PRIORITY_WEIGHT_MEDIUM", weights.medium)?,
                low: parse_or(&get, "PRIORITY_WEIGHT_LOW", weights.low)?,
            },
            priority_thresholds: PriorityThresholds {
                critical: parse_or(&get, "PRIORITY_THRESHOLD_CRITICAL", thresholds.critical)?,
                high: parse_or(&get, "PRIORITY_THRESHOLD_HIGH", thresholds.high)?,
                medium: parse_or(&get, "PRIORITY_THRESHOLD_MEDIUM", thresholds.medium)?,
            },
            max_recommendations: parse_or(&get, "MAX_RECOMMENDATIONS", 6)?,
            min_recommendations: parse_or(&get, "MIN_RECOMMENDATIONS", 3)?,
            courses_per_semester: parse_or(&get, "COURSES_PER_SEMESTER", 2)?,
        };

        anyhow::ensure!(config.cache_ttl_hours > 0, "CACHE_TTL_HOURS must be positive");
        let t = config.priority_thresholds;
        anyhow::ensure!(
            t.critical >= t.high && t.high >= t.medium,
            "priority thresholds must satisfy CRITICAL >= HIGH >= MEDIUM"
        );
        anyhow::ensure!(
            config.min_recommendations <= config.max_recommendations,
            "MIN_RECOMMENDATIONS must not exceed MAX_RECOMMENDATIONS"
        );
        Ok(config)
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            weights: self.priority_weights,
            thresholds: self.priority_thresholds,
            max_recommendations: self.max_recommendations,
            min_recommendations: self.min_recommendations,
            courses_per_semester: self.courses_per_semester,
            ..ScoringConfig::default()
        }
    }

    /// Which catalog source `main` wires up.
    pub fn catalog_source_label(&self) -> &'static str {
        if self.database_url.is_some() {
            "postgres"
        } else if self.course_catalog_path.is_some() {
            "json_file"
        } else {
            "static"
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.job_fetch_limit, 10);
        assert_eq!(config.cache_ttl_hours, 24);
        assert!(config.database_url.is_none());
        assert_eq!(config.catalog_source_label(), "static");
        assert_eq!(config.scoring_config(), ScoringConfig::default());
    }

    #[test]
    fn test_overrides_flow_into_scoring_config() {
        let config = config(&[
            ("PRIORITY_WEIGHT_CRITICAL", "12"),
            ("MAX_RECOMMENDATIONS", "8"),
            ("COURSES_PER_SEMESTER", "3"),
            ("PRIORITY_THRESHOLD_CRITICAL", "5"),
            ("COURSE_CATALOG_PATH", "/srv/courses.json"),
        ])
        .unwrap();
        let scoring = config.scoring_config();
        assert_eq!(scoring.weights.critical, 12);
        assert_eq!(scoring.weights.high, 7);
        assert_eq!(scoring.max_recommendations, 8);
        assert_eq!(scoring.courses_per_semester, 3);
        assert_eq!(scoring.thresholds.critical, 5);
        assert_eq!(scoring.thresholds.high, 3);
        assert_eq!(config.catalog_source_label(), "json_file");
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = config(&[("JOB_FETCH_LIMIT", "lots")]).unwrap_err();
        assert!(err.to_string().contains("JOB_FETCH_LIMIT"));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config(&[("REDIS_URL", "  "), ("PORT", "")]).unwrap();
        assert!(config.redis_url.is_none());
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        assert!(config(&[("MIN_RECOMMENDATIONS", "7")]).is_err());
    }

    #[test]
    fn test_inverted_thresholds_are_rejected() {
        assert!(config(&[("PRIORITY_THRESHOLD_HIGH", "9")]).is_err());
    }
}
