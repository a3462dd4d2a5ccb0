//! Market Insight Extractor: hot skills, trends, market health and salary outlook
//! derived from one snapshot.

use serde::{Deserialize, Serialize};

use crate::matching::archetypes::{ArchetypeTable, CareerFamily};
use crate::matching::contains_term;
use crate::matching::skill_gap::{Priority, ReadinessLevel, SkillGapReport};
use crate::models::market::{JobMarketSnapshot, TrendEntry};

const MAX_HOT_SKILLS: usize = 10;
const MAX_FOCUS_SKILLS: usize = 3;

/// Skills (or skill fragments) treated as emerging technology.
const EMERGING_TERMS: &[&str] = &[
    "ai",
    "ml",
    "machine learning",
    "deep learning",
    "artificial intelligence",
    "llm",
    "cloud",
    "aws",
    "azure",
    "gcp",
    "docker",
    "containers",
    "kubernetes",
    "react",
    "vue",
    "angular",
    "blockchain",
    "devops",
    "ci/cd",
    "terraform",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
}

impl DemandLevel {
    pub fn from_frequency(frequency: u32) -> Self {
        if frequency >= 4 {
            DemandLevel::VeryHigh
        } else if frequency >= 3 {
            DemandLevel::High
        } else {
            DemandLevel::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketHealth {
    Excellent,
    Good,
    Fair,
    Limited,
}

impl MarketHealth {
    pub fn from_job_count(job_count: u32) -> Self {
        if job_count >= 100 {
            MarketHealth::Excellent
        } else if job_count >= 50 {
            MarketHealth::Good
        } else if job_count >= 10 {
            MarketHealth::Fair
        } else {
            MarketHealth::Limited
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    Snapshot,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotSkill {
    pub skill: String,
    pub frequency: u32,
    pub demand: DemandLevel,
    pub emerging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryOutlook {
    pub sample_size: u32,
    pub average_min: f64,
    pub average_max: f64,
    pub overall_average: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsights {
    pub career_goal: String,
    pub hot_skills: Vec<HotSkill>,
    pub trends: Vec<TrendEntry>,
    pub trend_source: TrendSource,
    pub job_count: u32,
    pub market_health: MarketHealth,
    pub emerging_skills: Vec<String>,
    pub established_skills: Vec<String>,
    pub salary_outlook: SalaryOutlook,
    /// Most urgent missing skills, at most three.
    pub focus_skills: Vec<String>,
    pub readiness_level: ReadinessLevel,
}

pub fn extract(
    archetypes: &ArchetypeTable,
    snapshot: &JobMarketSnapshot,
    report: &SkillGapReport,
    career_goal: &str,
) -> MarketInsights {
    let hot_skills: Vec<HotSkill> = snapshot
        .ranked_skills()
        .into_iter()
        .take(MAX_HOT_SKILLS)
        .map(|(skill, frequency)| HotSkill {
            skill: skill.to_string(),
            frequency,
            demand: DemandLevel::from_frequency(frequency),
            emerging: is_emerging(skill),
        })
        .collect();

    let (emerging_skills, established_skills): (Vec<&HotSkill>, Vec<&HotSkill>) =
        hot_skills.iter().partition(|h| h.emerging);

    let (trends, trend_source) = if snapshot.trends.is_empty() {
        (
            reference_trends(archetypes.family_of(career_goal)),
            TrendSource::Reference,
        )
    } else {
        (snapshot.trends.clone(), TrendSource::Snapshot)
    };

    let focus_skills = report
        .missing_skills
        .iter()
        .filter(|m| matches!(m.priority, Priority::Critical | Priority::High))
        .take(MAX_FOCUS_SKILLS)
        .map(|m| m.skill.clone())
        .collect();

    MarketInsights {
        career_goal: career_goal.trim().to_string(),
        emerging_skills: emerging_skills.iter().map(|h| h.skill.clone()).collect(),
        established_skills: established_skills.iter().map(|h| h.skill.clone()).collect(),
        hot_skills,
        trends,
        trend_source,
        job_count: snapshot.job_count,
        market_health: MarketHealth::from_job_count(snapshot.job_count),
        salary_outlook: salary_outlook(snapshot),
        focus_skills,
        readiness_level: report.readiness_level,
    }
}

pub fn is_emerging(skill: &str) -> bool {
    EMERGING_TERMS.iter().any(|term| contains_term(skill, term))
}

fn salary_outlook(snapshot: &JobMarketSnapshot) -> SalaryOutlook {
    let stats = &snapshot.salary_stats;
    let summary = if stats.count == 0 {
        "No salary figures were advertised for this role.".to_string()
    } else {
        format!(
            "Advertised salaries range from {} to {}, averaging {}.",
            format_usd(stats.average_min),
            format_usd(stats.average_max),
            format_usd(stats.overall_average)
        )
    };

    SalaryOutlook {
        sample_size: stats.count,
        average_min: stats.average_min,
        average_max: stats.average_max,
        overall_average: stats.overall_average,
        summary,
    }
}

/// "$65,000"
fn format_usd(amount: f64) -> String {
    let whole = amount.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

/// Long-run trend reference per career family, used when a snapshot carries none.
fn reference_trends(family: CareerFamily) -> Vec<TrendEntry> {
    let table: &[(&str, u32)] = match family {
        CareerFamily::DataMl => &[
            ("Machine Learning", 10),
            ("Python", 9),
            ("Cloud Data Platforms", 8),
            ("MLOps", 7),
            ("Data Visualization", 6),
        ],
        CareerFamily::Software => &[
            ("Cloud Native Development", 10),
            ("Kubernetes", 9),
            ("TypeScript", 8),
            ("AI-Assisted Development", 7),
            ("Security Engineering", 6),
        ],
        CareerFamily::Finance => &[
            ("Financial Modeling", 10),
            ("Python for Finance", 8),
            ("Data Visualization", 7),
            ("ESG Analysis", 6),
            ("Blockchain", 5),
        ],
        CareerFamily::Science => &[
            ("Computational Methods", 9),
            ("Python", 8),
            ("Machine Learning", 7),
            ("Neuroimaging", 6),
            ("Research Data Management", 5),
        ],
        CareerFamily::Marketing => &[
            ("Marketing Analytics", 10),
            ("SEO", 8),
            ("Marketing Automation", 7),
            ("A/B Testing", 6),
            ("Social Media Strategy", 5),
        ],
        CareerFamily::Generic => &[
            ("Data Analysis", 9),
            ("Project Management", 8),
            ("Communication", 7),
            ("Digital Literacy", 6),
            ("Process Improvement", 5),
        ],
    };

    table
        .iter()
        .map(|(skill, score)| TrendEntry {
            skill: skill.to_string(),
            count: 0,
            score: *score,
        })
        .collect()
}
