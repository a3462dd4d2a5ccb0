//! Ranks catalog courses against a user's missing skills.
//!
//! Two tiers:
//! 1. Skill match: Σ priority_weight × frequency over missing skills a course covers.
//! 2. Archetype fallback: department prefix (10) > keyword (8) > generic keyword (6),
//!    used when tier 1 yields too few courses or the catalog carries no skills at all.
//!
//! If both tiers together still come up short, the remaining courses fill in by code
//! at the general tier.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::archetypes::{Archetype, ArchetypeTable};
use crate::matching::config::ScoringConfig;
use crate::matching::explain::template_explanation;
use crate::matching::skill_gap::{MissingSkill, Priority};
use crate::matching::{contains_term, fuzzy_match};
use crate::models::course::{normalize_course_code, Course};

/// Relevance points for each archetype fallback tier.
const PREFIX_MATCH_RELEVANCE: u32 = 10;
const KEYWORD_MATCH_RELEVANCE: u32 = 8;
const GENERAL_MATCH_RELEVANCE: u32 = 6;
const FILL_RELEVANCE: u32 = 1;

/// How a recommendation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    SkillMatch,
    DepartmentPrefix,
    Keyword,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub course_code: String,
    pub title: String,
    pub matched_skills: Vec<String>,
    pub priority: Priority,
    /// Raw weighted score. Fallback-tier courses carry relevance × divisor so both tiers
    /// sort on one scale.
    pub score: u32,
    /// min(10, score / 5)
    pub relevance_score: f64,
    pub credit_hours: u32,
    pub match_tier: MatchTier,
    pub explanation: String,
}

pub struct CourseScorer<'a> {
    config: &'a ScoringConfig,
    archetypes: &'a ArchetypeTable,
}

impl<'a> CourseScorer<'a> {
    pub fn new(config: &'a ScoringConfig, archetypes: &'a ArchetypeTable) -> Self {
        Self { config, archetypes }
    }

    /// Scores `catalog` against `missing_skills`, skipping completed courses.
    ///
    /// Returns at most `max_recommendations`, sorted by descending score then ascending
    /// course code. At least min(`min_recommendations`, non-completed courses) come back.
    pub fn score(
        &self,
        career_goal: &str,
        missing_skills: &[MissingSkill],
        catalog: &[Course],
        completed_courses: &[String],
    ) -> Vec<CourseRecommendation> {
        let completed: HashSet<String> = completed_courses
            .iter()
            .map(|c| normalize_course_code(c))
            .collect();
        let candidates: Vec<&Course> = catalog
            .iter()
            .filter(|c| !completed.contains(&normalize_course_code(&c.code)))
            .collect();

        let mut recommendations = self.score_by_skills(missing_skills, &candidates);
        recommendations.truncate(self.config.max_recommendations);

        let catalog_has_skills = catalog.iter().any(|c| !c.skills.is_empty());
        let archetype = self.archetypes.resolve(career_goal);
        if recommendations.len() < self.config.min_recommendations || !catalog_has_skills {
            debug!(
                "Skill matching found {} courses; adding '{}' archetype fallback",
                recommendations.len(),
                archetype.name
            );

            let taken = taken_codes(&recommendations);
            let remaining = candidates
                .iter()
                .copied()
                .filter(|c| !taken.contains(&normalize_course_code(&c.code)));
            let fallback = self.score_by_archetype(archetype, missing_skills, remaining);

            let room = self
                .config
                .max_recommendations
                .saturating_sub(recommendations.len());
            recommendations.extend(fallback.into_iter().take(room));
            sort_recommendations(&mut recommendations);
        }

        let floor = self
            .config
            .min_recommendations
            .min(self.config.max_recommendations)
            .min(candidates.len());
        if recommendations.len() < floor {
            let taken = taken_codes(&recommendations);
            let mut leftovers: Vec<&Course> = candidates
                .iter()
                .copied()
                .filter(|c| !taken.contains(&normalize_course_code(&c.code)))
                .collect();
            leftovers.sort_by(|a, b| a.code.cmp(&b.code));
            let need = floor - recommendations.len();
            debug!("Filling {need} recommendation slots from unmatched courses");

            recommendations.extend(
                leftovers
                    .into_iter()
                    .take(need)
                    .map(|course| self.fill(course, archetype, missing_skills)),
            );
        }

        for rec in &mut recommendations {
            rec.explanation = template_explanation(self.archetypes, career_goal, rec);
        }
        recommendations
    }

    /// Tier 1: weighted frequency/priority matching. Zero scores are dropped.
    fn score_by_skills(
        &self,
        missing_skills: &[MissingSkill],
        candidates: &[&Course],
    ) -> Vec<CourseRecommendation> {
        let mut scored: Vec<CourseRecommendation> = candidates
            .iter()
            .filter_map(|course| {
                let mut score = 0_u32;
                let mut matched: Vec<String> = Vec::new();
                let mut top_priority: Option<Priority> = None;

                for missing in missing_skills {
                    let covered = course
                        .skills
                        .iter()
                        .any(|skill| fuzzy_match(skill, &missing.skill));
                    if !covered {
                        continue;
                    }
                    score += missing.priority.weight(&self.config.weights) * missing.frequency;
                    if !matched.iter().any(|m| m.eq_ignore_ascii_case(&missing.skill)) {
                        matched.push(missing.skill.clone());
                    }
                    if top_priority.map_or(true, |p| missing.priority.rank() > p.rank()) {
                        top_priority = Some(missing.priority);
                    }
                }

                if score == 0 {
                    return None;
                }
                Some(CourseRecommendation {
                    course_code: course.code.clone(),
                    title: course.title.clone(),
                    matched_skills: matched,
                    priority: top_priority.unwrap_or(Priority::Low),
                    score,
                    relevance_score: self.config.relevance(score),
                    credit_hours: course.credits(),
                    match_tier: MatchTier::SkillMatch,
                    explanation: String::new(),
                })
            })
            .collect();

        sort_recommendations(&mut scored);
        scored
    }

    /// Tier 2: career-archetype keyword matching over whatever the catalog describes.
    fn score_by_archetype<'c>(
        &self,
        archetype: &Archetype,
        missing_skills: &[MissingSkill],
        candidates: impl Iterator<Item = &'c Course>,
    ) -> Vec<CourseRecommendation> {
        let mut scored: Vec<CourseRecommendation> = candidates
            .filter_map(|course| {
                let title = course.title.to_lowercase();
                let text = format!("{} {}", title, course.description.to_lowercase());
                let prefix = course.department_prefix();

                let (relevance, tier, fallback_priority) = if archetype
                    .prefixes
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(&prefix))
                {
                    (PREFIX_MATCH_RELEVANCE, MatchTier::DepartmentPrefix, Priority::High)
                } else if archetype.keywords.iter().any(|k| contains_term(&text, k)) {
                    (KEYWORD_MATCH_RELEVANCE, MatchTier::Keyword, Priority::Medium)
                } else if self
                    .archetypes
                    .generic_keywords
                    .iter()
                    .any(|k| contains_term(&title, k))
                {
                    (GENERAL_MATCH_RELEVANCE, MatchTier::General, Priority::Low)
                } else {
                    return None;
                };

                let (matched_skills, priority) =
                    fallback_skills(course, archetype, missing_skills, &text, fallback_priority);
                let score = (relevance as f64 * self.config.relevance_divisor).round() as u32;

                Some(CourseRecommendation {
                    course_code: course.code.clone(),
                    title: course.title.clone(),
                    matched_skills,
                    priority,
                    score,
                    relevance_score: relevance as f64,
                    credit_hours: course.credits(),
                    match_tier: tier,
                    explanation: String::new(),
                })
            })
            .collect();

        sort_recommendations(&mut scored);
        scored
    }

    /// Last resort for a course neither tier picked up.
    fn fill(
        &self,
        course: &Course,
        archetype: &Archetype,
        missing_skills: &[MissingSkill],
    ) -> CourseRecommendation {
        let text = format!(
            "{} {}",
            course.title.to_lowercase(),
            course.description.to_lowercase()
        );
        let (matched_skills, priority) =
            fallback_skills(course, archetype, missing_skills, &text, Priority::Low);
        CourseRecommendation {
            course_code: course.code.clone(),
            title: course.title.clone(),
            matched_skills,
            priority,
            score: (FILL_RELEVANCE as f64 * self.config.relevance_divisor).round() as u32,
            relevance_score: FILL_RELEVANCE as f64,
            credit_hours: course.credits(),
            match_tier: MatchTier::General,
            explanation: String::new(),
        }
    }
}

fn taken_codes(recs: &[CourseRecommendation]) -> HashSet<String> {
    recs.iter()
        .map(|r| normalize_course_code(&r.course_code))
        .collect()
}

/// Skills to report for a fallback-tier course, and the priority they imply.
///
/// Prefers missing skills the course covers; then up to three of the course's own skills;
/// then the archetype keywords found in its title/description.
fn fallback_skills(
    course: &Course,
    archetype: &Archetype,
    missing_skills: &[MissingSkill],
    text: &str,
    fallback_priority: Priority,
) -> (Vec<String>, Priority) {
    let covered: Vec<&MissingSkill> = missing_skills
        .iter()
        .filter(|m| {
            course.skills.iter().any(|s| fuzzy_match(s, &m.skill)) || contains_term(text, &m.skill)
        })
        .collect();

    if let Some(top) = covered.iter().max_by_key(|m| m.priority.rank()) {
        let names = covered.iter().map(|m| m.skill.clone()).collect();
        return (names, top.priority);
    }

    if !course.skills.is_empty() {
        return (
            course.skills.iter().take(3).cloned().collect(),
            fallback_priority,
        );
    }

    let keywords = archetype
        .keywords
        .iter()
        .filter(|k| contains_term(text, k))
        .take(3)
        .cloned()
        .collect();
    (keywords, fallback_priority)
}

/// Descending score, then ascending course code.
fn sort_recommendations(recs: &mut [CourseRecommendation]) {
    recs.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.course_code.cmp(&b.course_code))
    });
}
