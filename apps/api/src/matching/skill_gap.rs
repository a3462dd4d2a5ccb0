//! Skill Gap Analyzer: splits market-required skills into those the user already has
//! and a prioritized list of missing ones.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::matching::config::{PriorityThresholds, PriorityWeights};
use crate::matching::round1;

/// Market urgency of a missing skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Most urgent first.
    pub const ORDERED: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn from_frequency(frequency: u32, thresholds: &PriorityThresholds) -> Self {
        if frequency >= thresholds.critical {
            Priority::Critical
        } else if frequency >= thresholds.high {
            Priority::High
        } else if frequency >= thresholds.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 3,
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Low => 0,
        }
    }

    pub fn weight(self, weights: &PriorityWeights) -> u32 {
        match self {
            Priority::Critical => weights.critical,
            Priority::High => weights.high,
            Priority::Medium => weights.medium,
            Priority::Low => weights.low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill: String,
    pub frequency: u32,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Developing,
    Beginner,
}

impl ReadinessLevel {
    pub fn from_coverage(coverage: f64) -> Self {
        if coverage >= 80.0 {
            ReadinessLevel::Excellent
        } else if coverage >= 60.0 {
            ReadinessLevel::Good
        } else if coverage >= 40.0 {
            ReadinessLevel::Developing
        } else {
            ReadinessLevel::Beginner
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapReport {
    /// Sorted by descending frequency, then name.
    pub missing_skills: Vec<MissingSkill>,
    /// Sorted the same way as `missing_skills`.
    pub existing_skills: Vec<String>,
    pub coverage_percentage: f64,
    pub readiness_level: ReadinessLevel,
    pub total_required: usize,
}

/// A required skill after case-normalization.
struct RequiredSkill {
    display: String,
    display_frequency: u32,
    frequency: u32,
}

/// Compares required skill frequencies against the user's current skills.
///
/// Membership is case-insensitive. Required skills that differ only by case are merged
/// (frequencies summed, most frequent spelling kept).
pub fn analyze(
    required_skills: &BTreeMap<String, u32>,
    current_skills: &[String],
    thresholds: &PriorityThresholds,
) -> SkillGapReport {
    let current: HashSet<String> = current_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut normalized: BTreeMap<String, RequiredSkill> = BTreeMap::new();
    for (skill, frequency) in required_skills {
        let display = skill.trim();
        if display.is_empty() {
            continue;
        }
        let entry = normalized
            .entry(display.to_lowercase())
            .or_insert_with(|| RequiredSkill {
                display: display.to_string(),
                display_frequency: *frequency,
                frequency: 0,
            });
        entry.frequency += frequency;
        if *frequency > entry.display_frequency
            || (*frequency == entry.display_frequency && display < entry.display.as_str())
        {
            entry.display = display.to_string();
            entry.display_frequency = *frequency;
        }
    }

    let mut existing: Vec<(String, u32)> = Vec::new();
    let mut missing: Vec<MissingSkill> = Vec::new();

    for (key, skill) in normalized {
        if current.contains(&key) {
            existing.push((skill.display, skill.frequency));
        } else {
            missing.push(MissingSkill {
                priority: Priority::from_frequency(skill.frequency, thresholds),
                skill: skill.display,
                frequency: skill.frequency,
            });
        }
    }

    existing.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    missing.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.skill.cmp(&b.skill))
    });

    let total_required = existing.len() + missing.len();
    let coverage_percentage = if total_required == 0 {
        0.0
    } else {
        round1(existing.len() as f64 / total_required as f64 * 100.0)
    };

    SkillGapReport {
        missing_skills: missing,
        existing_skills: existing.into_iter().map(|(skill, _)| skill).collect(),
        coverage_percentage,
        readiness_level: ReadinessLevel::from_coverage(coverage_percentage),
        total_required,
    }
}
