//! Optional generated prose for course recommendations.
//!
//! Every recommendation already carries a rule-based explanation from
//! `template_explanation`. When an `ExplanationGenerator` is configured, `enrich` asks it
//! for better wording; any failure keeps the templates.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::strip_json_fences;
use crate::matching::archetypes::{ArchetypeTable, CareerFamily};
use crate::matching::course_scoring::CourseRecommendation;
use crate::matching::prompts::{build_explanation_prompt, EXPLANATION_SYSTEM};
use crate::models::course::normalize_course_code;

// ────────────────────────────────────────────────────────────────────────────
// Generator seam
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("explanation generator unavailable: {0}")]
    Unavailable(String),

    #[error("explanation generator returned no content")]
    Empty,

    #[error("malformed generator output: {0}")]
    Malformed(String),
}

/// Free-text generation. Implemented by `LlmClient`; mocked in tests.
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseExplanation {
    pub course_code: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecommendations {
    #[serde(default)]
    pub explanations: Vec<CourseExplanation>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Parses generator output, tolerating code fences and prose around the JSON object.
pub fn parse_recommendations(text: &str) -> Result<ParsedRecommendations, GenerationError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(GenerationError::Empty);
    }

    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Err(GenerationError::Malformed("no JSON object found".to_string())),
    };

    let parsed: ParsedRecommendations =
        serde_json::from_str(json).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    if parsed.explanations.is_empty() && parsed.summary.is_none() {
        return Err(GenerationError::Empty);
    }
    Ok(parsed)
}

/// Replaces template explanations with generated ones where the generator produced
/// them. Returns the generated summary, if any.
///
/// Never fails: generator errors are logged and the templates stay in place.
pub async fn enrich(
    generator: &dyn ExplanationGenerator,
    career_goal: &str,
    market_skills: &[&str],
    recommendations: &mut [CourseRecommendation],
) -> Option<String> {
    if recommendations.is_empty() {
        return None;
    }

    let prompt = build_explanation_prompt(career_goal, market_skills, recommendations);
    let parsed = match generator
        .generate(&prompt, EXPLANATION_SYSTEM)
        .await
        .and_then(|text| parse_recommendations(&text))
    {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Explanation enrichment failed, keeping template explanations: {e}");
            return None;
        }
    };

    let by_code: HashMap<String, String> = parsed
        .explanations
        .into_iter()
        .filter(|e| !e.explanation.trim().is_empty())
        .map(|e| (normalize_course_code(&e.course_code), e.explanation.trim().to_string()))
        .collect();

    let mut replaced = 0;
    for rec in recommendations.iter_mut() {
        if let Some(text) = by_code.get(&normalize_course_code(&rec.course_code)) {
            rec.explanation = text.clone();
            replaced += 1;
        }
    }
    debug!("Generated explanations applied to {replaced} courses");

    parsed
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Rule-based templates
// ────────────────────────────────────────────────────────────────────────────

pub fn career_summary(career_goal: &str) -> String {
    format!(
        "These courses provide essential skills and knowledge for pursuing a career as a {career_goal}."
    )
}

/// Career-family-aware explanation keyed on the course's department prefix and title.
pub fn template_explanation(
    archetypes: &ArchetypeTable,
    career_goal: &str,
    rec: &CourseRecommendation,
) -> String {
    let prefix: String = rec
        .course_code
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    let title = rec.title.to_lowercase();
    let is = |p: &str, words: &[&str]| prefix == p || words.iter().any(|w| title.contains(w));
    let goal = career_goal.trim();

    let text = match archetypes.family_of(goal) {
        CareerFamily::Finance => {
            if is("fin", &["finance"]) {
                format!("Core finance course for {goal}, covering financial analysis and corporate finance.")
            } else if is("acct", &["accounting"]) {
                format!("Accounting foundation for {goal}, needed to read and analyze financial statements.")
            } else if is("econ", &["economic"]) {
                format!("Economics course for {goal}, grounding market and industry analysis.")
            } else if is("stat", &["statistic"]) {
                format!("Statistics course for {goal}, supporting data-driven financial decisions.")
            } else {
                format!("Business course for {goal}, building analytical and business skills.")
            }
        }
        CareerFamily::Science => {
            if is("nsc", &["neuroscience"]) {
                format!("Core neuroscience course for {goal}, covering brain function and neural systems.")
            } else if is("biol", &["biology"]) {
                format!("Biology foundation for {goal}, covering cellular and molecular mechanisms.")
            } else if is("psyc", &["psychology"]) {
                format!("Psychology course for {goal}, linking brain and behavior.")
            } else if is("chem", &["chemistry"]) {
                format!("Chemistry foundation for {goal}, needed for molecular-level work.")
            } else if is("phys", &["physics"]) {
                format!("Physics course for {goal}, supporting signal and biophysics work.")
            } else {
                format!("Science course for {goal}, broadening the research foundation.")
            }
        }
        CareerFamily::DataMl => {
            if is("stat", &["statistic"]) {
                format!("Statistics course for {goal}, central to data analysis and modeling.")
            } else if title.contains("machine learning") || title.contains("artificial intelligence") {
                format!("Machine learning course for {goal}, a core competency for advanced analysis.")
            } else if title.contains("database") || title.contains("data") {
                format!("Data management course for {goal}, for working with large datasets.")
            } else if is("cs", &["programming", "software"]) {
                format!("Programming foundation for {goal}, used for data manipulation and algorithm implementation.")
            } else {
                format!("Technical course for {goal}, building analytical and computational skills.")
            }
        }
        CareerFamily::Software => {
            if title.contains("algorithm") || title.contains("data structure") {
                format!("Algorithms course for {goal}, the basis of efficient software design.")
            } else if title.contains("system") || title.contains("cloud") {
                format!("Systems course for {goal}, covering infrastructure and deployment.")
            } else if is("cs", &["programming"]) || prefix == "se" {
                format!("Core programming course for {goal}, building software development skills.")
            } else {
                format!("Technical course for {goal}, strengthening software engineering ability.")
            }
        }
        CareerFamily::Marketing => {
            if is("mktg", &["marketing"]) {
                format!("Marketing course for {goal}, covering core marketing principles and strategy.")
            } else if is("stat", &["analytics"]) {
                format!("Analytics course for {goal}, for data-driven marketing decisions.")
            } else if is("comm", &["communication"]) {
                format!("Communication course for {goal}, for clear marketing messaging.")
            } else {
                format!("Business course for {goal}, supporting marketing strategy and analysis.")
            }
        }
        CareerFamily::Generic => generic_explanation(goal, &prefix, &title),
    };

    if rec.matched_skills.is_empty() {
        text
    } else {
        format!("{text} Builds: {}.", rec.matched_skills.join(", "))
    }
}

fn generic_explanation(goal: &str, prefix: &str, title: &str) -> String {
    let goal_lower = goal.to_lowercase();
    let business_role = ["business", "management", "operations", "consultant", "analyst"]
        .iter()
        .any(|t| goal_lower.contains(t));
    if !business_role {
        return format!("This course provides foundational knowledge relevant to {goal}.");
    }

    if prefix == "mgmt" || title.contains("management") {
        format!("Management course for {goal}, developing leadership and organizational skills.")
    } else if prefix == "opre" || title.contains("operations") {
        format!("Operations course for {goal}, focused on process improvement and efficiency.")
    } else if prefix == "ba" || title.contains("analytics") {
        format!("Business analytics course for {goal}, supporting data-driven decisions.")
    } else if prefix == "econ" || title.contains("economic") {
        format!("Economics course for {goal}, explaining the market and business environment.")
    } else {
        format!("Business course for {goal}, building professional and analytical capabilities.")
    }
}
