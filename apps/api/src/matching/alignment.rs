//! How well the recommended courses cover the missing skills.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matching::course_scoring::CourseRecommendation;
use crate::matching::skill_gap::{Priority, SkillGapReport};
use crate::matching::{fuzzy_match, round1};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLevel {
    WellCovered,
    PoorlyCovered,
    Uncovered,
}

impl CoverageLevel {
    fn from_course_count(count: usize) -> Self {
        match count {
            0 => CoverageLevel::Uncovered,
            1 => CoverageLevel::PoorlyCovered,
            _ => CoverageLevel::WellCovered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub skill: String,
    pub priority: Priority,
    pub market_frequency: u32,
    pub courses: Vec<String>,
    pub level: CoverageLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumAlignmentReport {
    /// Share of missing skills taught by at least one recommended course.
    pub coverage_percentage: f64,
    pub well_covered: Vec<String>,
    pub poorly_covered: Vec<String>,
    pub uncovered: Vec<String>,
    pub skill_coverage: Vec<SkillCoverage>,
    pub guidance: String,
}

/// Cross-references the missing skills in `report` against the recommended courses.
///
/// `required_skills` supplies market frequencies; skills absent from it report the
/// frequency recorded in the gap report.
pub fn compare(
    required_skills: &BTreeMap<String, u32>,
    recommendations: &[CourseRecommendation],
    report: &SkillGapReport,
) -> CurriculumAlignmentReport {
    let mut well_covered = Vec::new();
    let mut poorly_covered = Vec::new();
    let mut uncovered = Vec::new();
    let mut skill_coverage = Vec::with_capacity(report.missing_skills.len());

    for missing in &report.missing_skills {
        let courses: Vec<String> = recommendations
            .iter()
            .filter(|rec| {
                rec.matched_skills
                    .iter()
                    .any(|skill| fuzzy_match(skill, &missing.skill))
            })
            .map(|rec| rec.course_code.clone())
            .collect();

        let level = CoverageLevel::from_course_count(courses.len());
        match level {
            CoverageLevel::WellCovered => well_covered.push(missing.skill.clone()),
            CoverageLevel::PoorlyCovered => poorly_covered.push(missing.skill.clone()),
            CoverageLevel::Uncovered => uncovered.push(missing.skill.clone()),
        }

        let market_frequency = required_skills
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&missing.skill))
            .map(|(_, freq)| *freq)
            .unwrap_or(missing.frequency);

        skill_coverage.push(SkillCoverage {
            skill: missing.skill.clone(),
            priority: missing.priority,
            market_frequency,
            courses,
            level,
        });
    }

    let total = report.missing_skills.len();
    let coverage_percentage = if total == 0 {
        100.0
    } else {
        round1((well_covered.len() + poorly_covered.len()) as f64 / total as f64 * 100.0)
    };

    CurriculumAlignmentReport {
        guidance: guidance(coverage_percentage, total, &uncovered),
        coverage_percentage,
        well_covered,
        poorly_covered,
        uncovered,
        skill_coverage,
    }
}

fn guidance(coverage: f64, total_missing: usize, uncovered: &[String]) -> String {
    if total_missing == 0 {
        return "You already have every skill the market data asks for. Use electives to \
            deepen specialisation."
            .to_string();
    }

    let mut text = if coverage >= 80.0 {
        format!("Excellent alignment: the recommended courses address {coverage}% of your skill gaps.")
    } else if coverage >= 60.0 {
        format!("Good alignment: the recommended courses address {coverage}% of your skill gaps.")
    } else {
        format!(
            "Moderate alignment: the recommended courses address {coverage}% of your skill gaps. \
             Supplement them with projects, certifications or self-study."
        )
    };

    if !uncovered.is_empty() {
        let shown: Vec<&str> = uncovered.iter().take(3).map(String::as_str).collect();
        text.push_str(&format!(" Not covered by coursework: {}.", shown.join(", ")));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::config::PriorityThresholds;
    use crate::matching::course_scoring::MatchTier;
    use crate::matching::skill_gap;

    fn rec(code: &str, skills: &[&str]) -> CourseRecommendation {
        CourseRecommendation {
            course_code: code.to_string(),
            title: code.to_string(),
            matched_skills: skills.iter().map(|s| s.to_string()).collect(),
            priority: Priority::High,
            score: 21,
            relevance_score: 4.2,
            credit_hours: 3,
            match_tier: MatchTier::SkillMatch,
            explanation: String::new(),
        }
    }

    fn required(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(s, f)| (s.to_string(), *f)).collect()
    }

    #[test]
    fn test_classifies_by_course_count() {
        let req = required(&[("SQL", 4), ("Spark", 3), ("Docker", 2), ("Python", 5)]);
        let report = skill_gap::analyze(&req, &["Python".to_string()], &PriorityThresholds::default());
        let recs = vec![
            rec("CS 4347", &["SQL"]),
            rec("CS 6350", &["SQL", "Apache Spark"]),
        ];

        let alignment = compare(&req, &recs, &report);

        assert_eq!(alignment.well_covered, vec!["SQL"]);
        assert_eq!(alignment.poorly_covered, vec!["Spark"]);
        assert_eq!(alignment.uncovered, vec!["Docker"]);
        assert_eq!(alignment.coverage_percentage, 66.7);
        assert!(alignment.guidance.starts_with("Good alignment"));
        assert!(alignment.guidance.contains("Docker"));

        let sql = &alignment.skill_coverage[0];
        assert_eq!(sql.skill, "SQL");
        assert_eq!(sql.courses, vec!["CS 4347", "CS 6350"]);
        assert_eq!(sql.market_frequency, 4);
    }

    #[test]
    fn test_no_recommendations_means_everything_uncovered() {
        let req = required(&[("SQL", 4), ("Spark", 3)]);
        let report = skill_gap::analyze(&req, &[], &PriorityThresholds::default());
        let alignment = compare(&req, &[], &report);
        assert_eq!(alignment.coverage_percentage, 0.0);
        assert_eq!(alignment.uncovered.len(), 2);
        assert!(alignment.guidance.starts_with("Moderate alignment"));
    }

    #[test]
    fn test_no_missing_skills_is_fully_aligned() {
        let req = required(&[("SQL", 4)]);
        let report = skill_gap::analyze(&req, &["sql".to_string()], &PriorityThresholds::default());
        let alignment = compare(&req, &[rec("CS 4347", &["SQL"])], &report);
        assert_eq!(alignment.coverage_percentage, 100.0);
        assert!(alignment.skill_coverage.is_empty());
        assert!(alignment.guidance.starts_with("You already have"));
    }

    #[test]
    fn test_excellent_guidance() {
        let req = required(&[("SQL", 4)]);
        let report = skill_gap::analyze(&req, &[], &PriorityThresholds::default());
        let alignment = compare(&req, &[rec("CS 4347", &["sql"])], &report);
        assert_eq!(alignment.coverage_percentage, 100.0);
        assert!(alignment.guidance.starts_with("Excellent alignment"));
        assert_eq!(alignment.poorly_covered, vec!["SQL"]);
    }
}
