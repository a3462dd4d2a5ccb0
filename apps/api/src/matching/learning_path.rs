//! Sequences recommendations into semesters by priority tier.

use serde::{Deserialize, Serialize};

use crate::matching::config::ScoringConfig;
use crate::matching::contains_term;
use crate::matching::course_scoring::CourseRecommendation;
use crate::matching::skill_gap::Priority;

const CORE_TECHNICAL: &str = "Core Technical Skills";

/// Skill categories in precedence order. The first category whose keywords hit a
/// skill claims it.
const FOCUS_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Programming Fundamentals",
        &["python", "java", "javascript", "c++", "rust", "go", "programming", "coding", "software", "git"],
    ),
    (
        "Data Analysis & Statistics",
        &["statistics", "statistical", "data analysis", "pandas", "excel", "probability", "regression", "visualization", "analytics", "r", "tableau"],
    ),
    (
        "Machine Learning & AI",
        &["machine learning", "deep learning", "ai", "ml", "neural", "tensorflow", "pytorch", "nlp", "artificial intelligence"],
    ),
    (
        "Database Management",
        &["sql", "database", "nosql", "mongodb", "postgresql", "mysql", "data warehousing", "etl"],
    ),
    (
        "Web Development",
        &["web", "html", "css", "react", "angular", "vue", "node.js", "frontend", "backend"],
    ),
    (
        "Algorithms & Data Structures",
        &["algorithms", "algorithm", "data structures", "complexity"],
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCourse {
    pub course_code: String,
    pub title: String,
    pub credit_hours: u32,
    pub priority: Priority,
    pub matched_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    /// 1-based.
    pub number: usize,
    pub name: String,
    pub courses: Vec<PlannedCourse>,
    pub credit_total: u32,
    pub focus_area: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    /// Semester numbers this milestone spans.
    pub semesters: Vec<usize>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub semesters: Vec<Semester>,
    pub total_semesters: usize,
    pub total_credit_hours: u32,
    pub milestones: Vec<Milestone>,
    pub rationale: String,
    pub estimated_completion: String,
}

impl LearningPath {
    fn empty() -> Self {
        Self {
            semesters: vec![],
            total_semesters: 0,
            total_credit_hours: 0,
            milestones: vec![],
            rationale: "No course recommendations were available, so no learning path was \
                built. Add current skills or try a more specific career goal."
                .to_string(),
            estimated_completion: "N/A".to_string(),
        }
    }
}

/// Builds a path from ranked recommendations: critical first, then high, medium and low,
/// each tier chunked into semesters of `courses_per_semester`.
pub fn build(
    recommendations: &[CourseRecommendation],
    current_skills: &[String],
    config: &ScoringConfig,
) -> LearningPath {
    if recommendations.is_empty() {
        return LearningPath::empty();
    }
    let per_semester = config.courses_per_semester.max(1);

    let mut semesters: Vec<Semester> = Vec::new();
    for tier in Priority::ORDERED {
        let courses: Vec<PlannedCourse> = recommendations
            .iter()
            .filter(|r| r.priority == tier)
            .map(|r| PlannedCourse {
                course_code: r.course_code.clone(),
                title: r.title.clone(),
                credit_hours: r.credit_hours,
                priority: r.priority,
                matched_skills: r.matched_skills.clone(),
            })
            .collect();

        for chunk in courses.chunks(per_semester) {
            let number = semesters.len() + 1;
            semesters.push(Semester {
                number,
                name: format!("Semester {number}"),
                credit_total: chunk.iter().map(|c| c.credit_hours).sum(),
                focus_area: focus_area(chunk),
                priority: tier,
                courses: chunk.to_vec(),
            });
        }
    }

    let total_semesters = semesters.len();
    let total_credit_hours = semesters.iter().map(|s| s.credit_total).sum();
    let milestones = milestones(&semesters);
    let rationale = rationale(&semesters, current_skills);

    LearningPath {
        estimated_completion: estimated_completion(total_semesters),
        semesters,
        total_semesters,
        total_credit_hours,
        milestones,
        rationale,
    }
}

/// Dominant category among the semester's matched skills. Ties go to the earlier
/// category. Course titles are used when no skill is categorised.
fn focus_area(courses: &[PlannedCourse]) -> String {
    let skills: Vec<&str> = courses
        .iter()
        .flat_map(|c| c.matched_skills.iter().map(String::as_str))
        .collect();

    dominant_category(&skills)
        .or_else(|| {
            let titles: Vec<&str> = courses.iter().map(|c| c.title.as_str()).collect();
            dominant_category(&titles)
        })
        .unwrap_or(CORE_TECHNICAL)
        .to_string()
}

fn dominant_category(items: &[&str]) -> Option<&'static str> {
    let mut counts = [0_usize; FOCUS_CATEGORIES.len()];
    for item in items {
        if let Some(idx) = FOCUS_CATEGORIES
            .iter()
            .position(|(_, keywords)| keywords.iter().any(|k| contains_term(item, k)))
        {
            counts[idx] += 1;
        }
    }

    let mut best: Option<usize> = None;
    for (idx, count) in counts.iter().enumerate() {
        if *count > 0 && best.map_or(true, |b| *count > counts[b]) {
            best = Some(idx);
        }
    }
    best.map(|idx| FOCUS_CATEGORIES[idx].0)
}

fn milestones(semesters: &[Semester]) -> Vec<Milestone> {
    let numbers_where = |pred: &dyn Fn(Priority) -> bool| -> Vec<usize> {
        semesters
            .iter()
            .filter(|s| pred(s.priority))
            .map(|s| s.number)
            .collect()
    };

    let mut milestones = Vec::new();

    let foundation = numbers_where(&|p| matches!(p, Priority::Critical | Priority::High));
    if !foundation.is_empty() {
        milestones.push(Milestone {
            name: "Foundation".to_string(),
            semesters: foundation,
            description: "Close the most in-demand skill gaps first.".to_string(),
        });
    }

    let intermediate = numbers_where(&|p| p == Priority::Medium);
    if !intermediate.is_empty() {
        milestones.push(Milestone {
            name: "Intermediate".to_string(),
            semesters: intermediate,
            description: "Broaden into supporting skills employers regularly ask for.".to_string(),
        });
    }

    let has_low = semesters.iter().any(|s| s.priority == Priority::Low);
    if let (true, Some(last)) = (has_low, semesters.last()) {
        milestones.push(Milestone {
            name: "Advanced".to_string(),
            semesters: vec![last.number],
            description: "Round out the profile with specialised skills.".to_string(),
        });
    }

    milestones
}

fn rationale(semesters: &[Semester], current_skills: &[String]) -> String {
    let course_count: usize = semesters.iter().map(|s| s.courses.len()).sum();
    let leading = semesters
        .first()
        .map(|s| s.priority.as_str())
        .unwrap_or("critical");

    let mut text = format!(
        "{course_count} courses over {} semesters, ordered by market urgency starting with \
         {leading}-priority skills so the highest-demand gaps close first.",
        semesters.len()
    );

    let known: Vec<&str> = current_skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(3)
        .collect();
    if !known.is_empty() {
        text.push_str(&format!(" Builds on your existing {}.", known.join(", ")));
    }
    text
}

fn estimated_completion(total_semesters: usize) -> String {
    match total_semesters {
        0 => "N/A".to_string(),
        1 => "1 semester (0.5 years)".to_string(),
        n => format!("{n} semesters ({:.1} years)", n as f64 / 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::course_scoring::MatchTier;

    fn rec(code: &str, priority: Priority, skills: &[&str], credits: u32) -> CourseRecommendation {
        CourseRecommendation {
            course_code: code.to_string(),
            title: format!("Course {code}"),
            matched_skills: skills.iter().map(|s| s.to_string()).collect(),
            priority,
            score: 10,
            relevance_score: 2.0,
            credit_hours: credits,
            match_tier: MatchTier::SkillMatch,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_empty_recommendations_give_empty_path() {
        let path = build(&[], &[], &ScoringConfig::default());
        assert!(path.semesters.is_empty());
        assert_eq!(path.total_semesters, 0);
        assert_eq!(path.total_credit_hours, 0);
        assert!(path.milestones.is_empty());
        assert!(!path.rationale.is_empty());
    }

    #[test]
    fn test_tiers_are_chunked_in_priority_order() {
        let recs = vec![
            rec("CS 1", Priority::Medium, &["SQL"], 3),
            rec("CS 2", Priority::Critical, &["Python"], 3),
            rec("CS 3", Priority::Critical, &["Java"], 4),
            rec("CS 4", Priority::Critical, &["Statistics"], 3),
            rec("CS 5", Priority::High, &["Docker"], 3),
        ];
        let path = build(&recs, &[], &ScoringConfig::default());

        let layout: Vec<(Priority, Vec<&str>)> = path
            .semesters
            .iter()
            .map(|s| {
                (
                    s.priority,
                    s.courses.iter().map(|c| c.course_code.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                (Priority::Critical, vec!["CS 2", "CS 3"]),
                (Priority::Critical, vec!["CS 4"]),
                (Priority::High, vec!["CS 5"]),
                (Priority::Medium, vec!["CS 1"]),
            ]
        );
        assert_eq!(path.total_semesters, 4);
        assert_eq!(path.semesters[0].credit_total, 7);
        assert_eq!(path.total_credit_hours, 16);
        assert_eq!(path.semesters[3].name, "Semester 4");
        assert_eq!(path.estimated_completion, "4 semesters (2.0 years)");
    }

    #[test]
    fn test_milestones_span_matching_semesters() {
        let recs = vec![
            rec("A 1", Priority::Critical, &[], 3),
            rec("A 2", Priority::High, &[], 3),
            rec("A 3", Priority::Medium, &[], 3),
            rec("A 4", Priority::Low, &[], 3),
        ];
        let path = build(&recs, &[], &ScoringConfig::default());

        let names: Vec<&str> = path.milestones.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Foundation", "Intermediate", "Advanced"]);
        assert_eq!(path.milestones[0].semesters, vec![1, 2]);
        assert_eq!(path.milestones[1].semesters, vec![3]);
        assert_eq!(path.milestones[2].semesters, vec![4]);
    }

    #[test]
    fn test_no_advanced_milestone_without_low_priority() {
        let recs = vec![rec("A 1", Priority::Medium, &[], 3)];
        let path = build(&recs, &[], &ScoringConfig::default());
        let names: Vec<&str> = path.milestones.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Intermediate"]);
        assert_eq!(path.estimated_completion, "1 semester (0.5 years)");
    }

    #[test]
    fn test_focus_area_majority_and_precedence() {
        let recs = vec![
            rec("A 1", Priority::Critical, &["SQL", "PostgreSQL"], 3),
            rec("A 2", Priority::Critical, &["Python"], 3),
        ];
        let path = build(&recs, &[], &ScoringConfig::default());
        assert_eq!(path.semesters[0].focus_area, "Database Management");

        let tie = vec![
            rec("B 1", Priority::High, &["SQL"], 3),
            rec("B 2", Priority::High, &["Python"], 3),
        ];
        let path = build(&tie, &[], &ScoringConfig::default());
        assert_eq!(path.semesters[0].focus_area, "Programming Fundamentals");
    }

    #[test]
    fn test_focus_area_defaults_to_core_technical() {
        let recs = vec![rec("MUSI 1306", Priority::Low, &["Listening"], 3)];
        let path = build(&recs, &[], &ScoringConfig::default());
        assert_eq!(path.semesters[0].focus_area, CORE_TECHNICAL);
    }

    #[test]
    fn test_rationale_mentions_existing_skills() {
        let recs = vec![rec("A 1", Priority::High, &["Docker"], 3)];
        let path = build(&recs, &["Python".to_string()], &ScoringConfig::default());
        assert!(path.rationale.contains("Python"));
        assert!(path.rationale.contains("high-priority"));
    }
}
