// Prompt constants for explanation enrichment.

use crate::matching::course_scoring::CourseRecommendation;

/// System prompt for course explanations.
pub const EXPLANATION_SYSTEM: &str = "You are a career counselor helping students choose \
    courses for a career goal. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace: {career_goal}, {market_skills}, {courses}
pub const EXPLANATION_PROMPT_TEMPLATE: &str = r#"CAREER GOAL: {career_goal}

TOP JOB MARKET SKILLS:
{market_skills}

RECOMMENDED COURSES:
{courses}

For each recommended course, write one or two sentences on why it prepares a student to
become a {career_goal}. Mention the market skills it builds. Only explain the courses
listed above, using their exact course codes.

Return a JSON object with this EXACT schema:
{
  "explanations": [
    {"course_code": "CS 4375", "explanation": "Why this course matters for the goal"}
  ],
  "summary": "Two or three sentences on how these courses fit together"
}"#;

/// Market skills shown to the model.
const MAX_PROMPT_SKILLS: usize = 10;

pub fn build_explanation_prompt(
    career_goal: &str,
    market_skills: &[&str],
    recommendations: &[CourseRecommendation],
) -> String {
    let market_skills = if market_skills.is_empty() {
        "General business and analytical skills".to_string()
    } else {
        market_skills
            .iter()
            .take(MAX_PROMPT_SKILLS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let courses = recommendations
        .iter()
        .map(|rec| {
            format!(
                "- {}: {} (skills: {})",
                rec.course_code,
                rec.title,
                rec.matched_skills.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    EXPLANATION_PROMPT_TEMPLATE
        .replace("{career_goal}", career_goal)
        .replace("{market_skills}", &market_skills)
        .replace("{courses}", &courses)
}
