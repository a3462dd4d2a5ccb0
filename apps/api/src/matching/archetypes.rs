//! Career archetypes: the single keyword table behind synthetic market data and the
//! archetype fallback tier of course scoring.
//!
//! Loaded once at startup (built-in, or from `ARCHETYPES_PATH`) and shared as
//! `Arc<ArchetypeTable>`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matching::contains_term;

/// Keyword family of a career goal. Drives trend tables and explanation wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerFamily {
    DataMl,
    Software,
    Finance,
    Science,
    Marketing,
    Generic,
}

impl CareerFamily {
    /// Keyword detection for goals that match no archetype.
    pub fn detect(goal: &str) -> Self {
        let goal = goal.to_lowercase();
        let has = |terms: &[&str]| terms.iter().any(|t| contains_term(&goal, t));

        if has(&["data", "machine learning", "ml", "ai", "analytics", "statistician"]) {
            CareerFamily::DataMl
        } else if has(&["software", "developer", "devops", "programmer", "engineer", "web"]) {
            CareerFamily::Software
        } else if has(&["finance", "financial", "investment", "accountant", "accounting", "banking"]) {
            CareerFamily::Finance
        } else if goal.contains("neuro") || has(&["scientist", "science", "research", "biology", "chemist"]) {
            CareerFamily::Science
        } else if has(&["marketing", "brand", "advertising", "seo"]) {
            CareerFamily::Marketing
        } else {
            CareerFamily::Generic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSkill {
    pub name: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub min: f64,
    pub max: f64,
}

/// One career archetype: how to recognise it and what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Canonical job title, also used as the market-data lookup title.
    pub name: String,
    /// Lowercase substrings that identify this archetype inside a free-form goal.
    pub patterns: Vec<String>,
    pub family: CareerFamily,
    /// Catalog department prefixes that serve this career (e.g. "CS", "STAT").
    pub prefixes: Vec<String>,
    /// Keywords searched in course titles and descriptions.
    pub keywords: Vec<String>,
    pub skills: Vec<WeightedSkill>,
    pub salary: SalaryBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeTable {
    pub archetypes: Vec<Archetype>,
    /// Used when no archetype matches.
    pub default: Archetype,
    /// Broad keywords that earn a course the lowest fallback score.
    pub generic_keywords: Vec<String>,
}

impl ArchetypeTable {
    /// Loads a table from a JSON file with the same shape as `ArchetypeTable`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read archetype table {}", path.display()))?;
        let table: ArchetypeTable = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid archetype table {}", path.display()))?;
        if table.archetypes.is_empty() {
            anyhow::bail!("Archetype table {} has no archetypes", path.display());
        }
        if let Some(empty) = table
            .archetypes
            .iter()
            .chain(std::iter::once(&table.default))
            .find(|a| a.skills.is_empty())
        {
            anyhow::bail!(
                "Archetype '{}' in {} has no skills",
                empty.name,
                path.display()
            );
        }
        Ok(table)
    }

    /// Finds the archetype for a goal: exact name first, then the first pattern hit in
    /// table order.
    pub fn match_goal(&self, goal: &str) -> Option<&Archetype> {
        let goal = normalize(goal);
        if goal.is_empty() {
            return None;
        }

        self.archetypes
            .iter()
            .find(|a| normalize(&a.name) == goal)
            .or_else(|| {
                self.archetypes
                    .iter()
                    .find(|a| a.patterns.iter().any(|p| goal.contains(&normalize(p))))
            })
    }

    /// Like `match_goal`, but never comes back empty-handed.
    pub fn resolve(&self, goal: &str) -> &Archetype {
        self.match_goal(goal).unwrap_or(&self.default)
    }

    /// Family of a goal: the matched archetype's, or keyword detection.
    pub fn family_of(&self, goal: &str) -> CareerFamily {
        self.match_goal(goal)
            .map(|a| a.family)
            .unwrap_or_else(|| CareerFamily::detect(goal))
    }

    /// Title used for job-market lookups: the archetype name when the goal names one,
    /// otherwise the trimmed goal.
    pub fn job_title_for(&self, goal: &str) -> String {
        self.match_goal(goal)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| goal.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn builtin() -> Self {
        Self {
            archetypes: vec![
                archetype(
                    "financial analyst",
                    &["financial analyst", "finance analyst"],
                    CareerFamily::Finance,
                    &["FIN", "ACCT", "ECON", "STAT", "BA"],
                    &["finance", "accounting", "economics", "financial", "investment", "business", "statistics", "portfolio", "valuation"],
                    &[("Financial Analysis", 5), ("Excel", 5), ("Financial Modeling", 4), ("Accounting", 3), ("SQL", 3), ("Valuation", 2), ("Power BI", 2), ("Python", 1)],
                    (65_000.0, 105_000.0),
                ),
                archetype(
                    "investment analyst",
                    &["investment", "portfolio manager", "equity research"],
                    CareerFamily::Finance,
                    &["FIN", "ECON", "ACCT", "STAT"],
                    &["investment", "finance", "portfolio", "securities", "valuation", "financial markets", "risk"],
                    &[("Financial Modeling", 5), ("Valuation", 4), ("Excel", 4), ("Portfolio Analysis", 3), ("Risk Management", 3), ("Bloomberg", 2), ("Python", 2)],
                    (70_000.0, 120_000.0),
                ),
                archetype(
                    "data engineer",
                    &["data engineer", "etl developer", "big data"],
                    CareerFamily::DataMl,
                    &["CS", "DATA", "MIS", "ENGR"],
                    &["data", "database", "engineering", "pipeline", "etl", "sql", "nosql", "cloud", "distributed"],
                    &[("Python", 5), ("SQL", 5), ("Spark", 4), ("ETL", 4), ("Cloud", 3), ("Data Warehousing", 3), ("Airflow", 2), ("Kafka", 2)],
                    (85_000.0, 130_000.0),
                ),
                archetype(
                    "data scientist",
                    &["data scientist", "data science", "machine learning", "ml engineer", "ai engineer", "data analyst"],
                    CareerFamily::DataMl,
                    &["CS", "STAT", "MATH", "BA", "DATA"],
                    &["statistics", "data", "analytics", "machine learning", "programming", "mathematics", "mining", "modeling", "python", "r"],
                    &[("Python", 5), ("SQL", 4), ("Machine Learning", 4), ("Statistics", 3), ("Data Analysis", 3), ("Data Visualization", 2), ("Spark", 2), ("R", 1)],
                    (80_000.0, 130_000.0),
                ),
                archetype(
                    "devops engineer",
                    &["devops", "site reliability", "sre", "platform engineer", "cloud engineer"],
                    CareerFamily::Software,
                    &["CS", "SE", "SYSM", "ENGR"],
                    &["devops", "cloud", "infrastructure", "automation", "ci/cd", "kubernetes", "docker", "aws", "systems"],
                    &[("Docker", 5), ("Kubernetes", 4), ("AWS", 4), ("CI/CD", 4), ("Linux", 3), ("Terraform", 3), ("Python", 2), ("Monitoring", 2)],
                    (90_000.0, 145_000.0),
                ),
                archetype(
                    "software engineer",
                    &["software", "developer", "programmer", "backend", "frontend", "full stack", "web"],
                    CareerFamily::Software,
                    &["CS", "SE", "ENGR"],
                    &["programming", "software", "computer", "algorithms", "data structures", "java", "python", "web", "systems"],
                    &[("Python", 5), ("Java", 4), ("JavaScript", 4), ("Git", 3), ("Algorithms", 3), ("SQL", 3), ("Docker", 2), ("Agile", 2)],
                    (85_000.0, 135_000.0),
                ),
                archetype(
                    "business analyst",
                    &["business analyst", "business intelligence", "bi analyst"],
                    CareerFamily::Generic,
                    &["BA", "STAT", "ECON", "ACCT", "MIS"],
                    &["business", "analytics", "statistics", "economics", "analysis", "intelligence", "data", "reporting"],
                    &[("SQL", 5), ("Excel", 4), ("Data Analysis", 4), ("Tableau", 3), ("Requirements Gathering", 3), ("Communication", 2)],
                    (65_000.0, 100_000.0),
                ),
                archetype(
                    "marketing analyst",
                    &["marketing", "digital marketing", "growth"],
                    CareerFamily::Marketing,
                    &["MKTG", "BA", "STAT", "COMM"],
                    &["marketing", "business", "analytics", "statistics", "analysis", "consumer", "digital", "social media"],
                    &[("Marketing Analytics", 4), ("Google Analytics", 4), ("SQL", 3), ("SEO", 3), ("A/B Testing", 2), ("Tableau", 2), ("Excel", 2)],
                    (55_000.0, 95_000.0),
                ),
                archetype(
                    "neuroscientist",
                    &["neuroscien", "neuro scien", "neuro"],
                    CareerFamily::Science,
                    &["NSC", "BIOL", "PSYC", "CHEM", "PHYS"],
                    &["neuroscience", "brain", "cognitive", "neural", "biology", "psychology", "neurology", "behavior", "perception"],
                    &[("Neuroscience", 5), ("Research Methods", 4), ("Data Analysis", 3), ("MATLAB", 3), ("Statistical Analysis", 3), ("Python", 2), ("EEG", 2), ("fMRI", 1)],
                    (60_000.0, 100_000.0),
                ),
                archetype(
                    "operations manager",
                    &["operations", "supply chain", "logistics"],
                    CareerFamily::Generic,
                    &["OPRE", "MGMT", "BA", "STAT"],
                    &["operations", "management", "supply chain", "logistics", "process", "optimization", "quality"],
                    &[("Process Improvement", 4), ("Supply Chain Management", 4), ("Project Management", 3), ("Excel", 3), ("Leadership", 2), ("Lean Six Sigma", 2)],
                    (65_000.0, 110_000.0),
                ),
                archetype(
                    "management consultant",
                    &["consultant", "consulting", "strategy"],
                    CareerFamily::Generic,
                    &["MGMT", "BA", "ECON", "STAT"],
                    &["management", "consulting", "strategy", "business", "analytics", "organizational", "leadership"],
                    &[("Business Strategy", 5), ("Data Analysis", 4), ("Presentation", 3), ("Excel", 3), ("Project Management", 2), ("Leadership", 2)],
                    (75_000.0, 130_000.0),
                ),
            ],
            default: archetype(
                "general professional",
                &[],
                CareerFamily::Generic,
                &["BA", "STAT", "ECON"],
                &["business", "statistics", "economics"],
                &[("Communication", 4), ("Data Analysis", 4), ("Project Management", 3), ("Excel", 3), ("Problem Solving", 2), ("SQL", 2), ("Leadership", 1)],
                (60_000.0, 95_000.0),
            ),
            generic_keywords: ["business", "statistics", "analysis", "economics"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn archetype(
    name: &str,
    patterns: &[&str],
    family: CareerFamily,
    prefixes: &[&str],
    keywords: &[&str],
    skills: &[(&str, u32)],
    salary: (f64, f64),
) -> Archetype {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Archetype {
        name: name.to_string(),
        patterns: owned(patterns),
        family,
        prefixes: owned(prefixes),
        keywords: owned(keywords),
        skills: skills
            .iter()
            .map(|(name, frequency)| WeightedSkill {
                name: name.to_string(),
                frequency: *frequency,
            })
            .collect(),
        salary: SalaryBand {
            min: salary.0,
            max: salary.1,
        },
    }
}
