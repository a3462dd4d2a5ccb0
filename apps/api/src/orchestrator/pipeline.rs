//! Pipeline stages and the composite guidance response.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::alignment::CurriculumAlignmentReport;
use crate::matching::course_scoring::CourseRecommendation;
use crate::matching::insights::MarketInsights;
use crate::matching::learning_path::LearningPath;
use crate::matching::skill_gap::{ReadinessLevel, SkillGapReport};
use crate::models::market::JobMarketSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Receive,
    FetchMarketData,
    FetchCatalog,
    AnalyzeGaps,
    ScoreCourses,
    BuildPath,
    ExtractInsights,
    AlignCurriculum,
    Assemble,
    Respond,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Receive => "RECEIVE",
            PipelineStage::FetchMarketData => "FETCH_MARKET_DATA",
            PipelineStage::FetchCatalog => "FETCH_CATALOG",
            PipelineStage::AnalyzeGaps => "ANALYZE_GAPS",
            PipelineStage::ScoreCourses => "SCORE_COURSES",
            PipelineStage::BuildPath => "BUILD_PATH",
            PipelineStage::ExtractInsights => "EXTRACT_INSIGHTS",
            PipelineStage::AlignCurriculum => "ALIGN_CURRICULUM",
            PipelineStage::Assemble => "ASSEMBLE",
            PipelineStage::Respond => "RESPOND",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerRequest {
    pub career_goal: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub completed_courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CareerGuidance {
    pub analysis_id: Uuid,
    pub career_goal: String,
    pub location: String,
    pub job_market_analysis: JobMarketSnapshot,
    pub skill_gap_analysis: SkillGapReport,
    pub course_recommendations: Vec<CourseRecommendation>,
    pub learning_path: LearningPath,
    pub market_insights: MarketInsights,
    pub curriculum_comparison: CurriculumAlignmentReport,
    pub career_summary: String,
    pub total_recommended_courses: usize,
    pub estimated_completion: String,
    pub next_steps: Vec<String>,
    /// Collaborators that failed and were replaced by fallback data.
    pub degraded: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Concrete follow-ups for the student, most urgent first.
pub fn next_steps(
    report: &SkillGapReport,
    recommendations: &[CourseRecommendation],
    path: &LearningPath,
) -> Vec<String> {
    let mut steps = Vec::new();

    if let Some(first) = path.semesters.first() {
        let codes: Vec<&str> = first
            .courses
            .iter()
            .map(|c| c.course_code.as_str())
            .collect();
        steps.push(format!("Enroll in {} next semester", codes.join(" and ")));
    } else if let Some(rec) = recommendations.first() {
        steps.push(format!("Review {} ({})", rec.course_code, rec.title));
    }

    let focus: Vec<&str> = report
        .missing_skills
        .iter()
        .take(3)
        .map(|m| m.skill.as_str())
        .collect();
    if !focus.is_empty() {
        steps.push(format!("Start building {} through projects", focus.join(", ")));
    }

    match report.readiness_level {
        ReadinessLevel::Excellent => {
            steps.push("Start applying to roles and tailor your resume to market keywords".to_string())
        }
        ReadinessLevel::Good => steps.push(
            "Apply for internships while closing the remaining skill gaps".to_string(),
        ),
        ReadinessLevel::Developing | ReadinessLevel::Beginner => steps.push(
            "Revisit this analysis after completing the first semester of the plan".to_string(),
        ),
    }

    steps
}
