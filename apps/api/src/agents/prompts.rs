// Prompt constants for project recommendations.

use crate::agents::project_advisor::SkillLevel;

pub const PROJECT_SYSTEM: &str = "You are an expert career advisor who designs portfolio \
    projects for students. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array.";

/// Replace: {career_goal}, {skill_level}, {current_skills}, {target_skills}, {courses}
pub const PROJECT_PROMPT_TEMPLATE: &str = r#"STUDENT PROFILE:
- Career goal: {career_goal}
- Skill level: {skill_level}
- Current skills: {current_skills}
- Skills to develop: {target_skills}
- Recommended courses: {courses}

Recommend 4 practical portfolio projects that build the skills employers hiring a
{career_goal} look for. Each project targets 2-3 of the skills to develop, takes 2-8 weeks,
and the list progresses from easier to harder.

Return a JSON array with this EXACT schema:
[
  {
    "title": "Project name",
    "difficulty": "beginner | intermediate | advanced",
    "duration_weeks": 4,
    "description": "What the project does",
    "skills_practiced": ["Skill 1", "Skill 2"],
    "why_valuable": "Why employers care",
    "key_features": ["Feature 1", "Feature 2"],
    "portfolio_impact": "How it strengthens the portfolio"
  }
]"#;

const MAX_PROMPT_SKILLS: usize = 10;
const MAX_PROMPT_COURSES: usize = 5;

fn listing(items: &[String], limit: usize, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_project_prompt(
    career_goal: &str,
    skill_level: SkillLevel,
    current_skills: &[String],
    target_skills: &[String],
    courses: &[String],
) -> String {
    PROJECT_PROMPT_TEMPLATE
        .replace("{career_goal}", career_goal)
        .replace("{skill_level}", skill_level.as_str())
        .replace(
            "{current_skills}",
            &listing(current_skills, MAX_PROMPT_SKILLS, "None listed"),
        )
        .replace(
            "{target_skills}",
            &listing(target_skills, MAX_PROMPT_SKILLS, "Core skills for the role"),
        )
        .replace("{courses}", &listing(courses, MAX_PROMPT_COURSES, "None yet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let prompt = build_project_prompt(
            "Data Scientist",
            SkillLevel::Beginner,
            &[],
            &["Python".to_string(), "SQL".to_string()],
            &["CS 4375".to_string()],
        );
        assert!(prompt.contains("Career goal: Data Scientist"));
        assert!(prompt.contains("Skill level: beginner"));
        assert!(prompt.contains("Current skills: None listed"));
        assert!(prompt.contains("Skills to develop: Python, SQL"));
        assert!(!prompt.contains("{courses}"));
    }
}
