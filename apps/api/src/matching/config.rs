use serde::{Deserialize, Serialize};

/// Points per unit of market frequency, by priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            critical: 10,
            high: 7,
            medium: 4,
            low: 2,
        }
    }
}

/// Minimum market frequency for each priority tier. Anything below `medium` is low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            critical: 4,
            high: 3,
            medium: 2,
        }
    }
}

/// Tunables for gap analysis, course scoring and path building.
///
/// The defaults are empirical and kept as plain values so deployments can override
/// them (see `Config::from_env`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: PriorityWeights,
    pub thresholds: PriorityThresholds,
    /// Upper bound on returned recommendations.
    pub max_recommendations: usize,
    /// Below this many skill-matched courses the archetype fallback tier kicks in.
    pub min_recommendations: usize,
    /// relevance_score = min(relevance_cap, score / relevance_divisor)
    pub relevance_divisor: f64,
    pub relevance_cap: f64,
    pub courses_per_semester: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            thresholds: PriorityThresholds::default(),
            max_recommendations: 6,
            min_recommendations: 3,
            relevance_divisor: 5.0,
            relevance_cap: 10.0,
            courses_per_semester: 2,
        }
    }
}

impl ScoringConfig {
    pub fn relevance(&self, score: u32) -> f64 {
        if self.relevance_divisor <= 0.0 {
            return self.relevance_cap;
        }
        (score as f64 / self.relevance_divisor).min(self.relevance_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_is_capped() {
        let config = ScoringConfig::default();
        assert_eq!(config.relevance(50), 10.0);
        assert_eq!(config.relevance(80), 10.0);
        assert_eq!(config.relevance(14), 2.8);
    }
}
