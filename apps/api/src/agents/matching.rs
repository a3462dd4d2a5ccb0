//! MatchingEngine: runs the pure matching stages over one snapshot and catalog.
//!
//! Gap analysis → course scoring → optional explanation enrichment → learning path →
//! market insights → curriculum alignment. Nothing here touches the network except the
//! optional explanation generator, and its failures never surface.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::agents::{require_text, unsupported, Agent, AgentRequest, AgentResponse, CareerAdviceQuery};
use crate::catalog::StaticCatalog;
use crate::errors::AppError;
use crate::market::fallback::synthesize_snapshot;
use crate::matching::alignment::{self, CurriculumAlignmentReport};
use crate::matching::archetypes::ArchetypeTable;
use crate::matching::config::ScoringConfig;
use crate::matching::course_scoring::{CourseRecommendation, CourseScorer};
use crate::matching::explain::{self, ExplanationGenerator};
use crate::matching::insights::{self, MarketInsights};
use crate::matching::learning_path::{self, LearningPath};
use crate::matching::skill_gap::{self, SkillGapReport};
use crate::models::course::Course;
use crate::models::market::{JobMarketSnapshot, SnapshotSource};
use crate::orchestrator::pipeline::PipelineStage;

/// Skills from the snapshot quoted in the explanation prompt.
const PROMPT_MARKET_SKILLS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub skill_gap: SkillGapReport,
    pub recommendations: Vec<CourseRecommendation>,
    pub learning_path: LearningPath,
    pub market_insights: MarketInsights,
    pub curriculum_comparison: CurriculumAlignmentReport,
    pub career_summary: String,
}

pub struct MatchingEngine {
    config: ScoringConfig,
    archetypes: Arc<ArchetypeTable>,
    generator: Option<Arc<dyn ExplanationGenerator>>,
}

impl MatchingEngine {
    pub fn new(
        config: ScoringConfig,
        archetypes: Arc<ArchetypeTable>,
        generator: Option<Arc<dyn ExplanationGenerator>>,
    ) -> Self {
        Self {
            config,
            archetypes,
            generator,
        }
    }

    pub async fn evaluate(
        &self,
        career_goal: &str,
        snapshot: &JobMarketSnapshot,
        catalog: &[Course],
        current_skills: &[String],
        completed_courses: &[String],
    ) -> MatchOutcome {
        info!("[{}] {} required skills", PipelineStage::AnalyzeGaps, snapshot.skills.len());
        let skill_gap = skill_gap::analyze(&snapshot.skills, current_skills, &self.config.thresholds);

        info!("[{}] {} catalog courses", PipelineStage::ScoreCourses, catalog.len());
        let mut recommendations = CourseScorer::new(&self.config, &self.archetypes).score(
            career_goal,
            &skill_gap.missing_skills,
            catalog,
            completed_courses,
        );

        let mut summary = None;
        if let Some(generator) = &self.generator {
            let market_skills: Vec<&str> = snapshot
                .ranked_skills()
                .into_iter()
                .take(PROMPT_MARKET_SKILLS)
                .map(|(skill, _)| skill)
                .collect();
            summary = explain::enrich(
                generator.as_ref(),
                career_goal,
                &market_skills,
                &mut recommendations,
            )
            .await;
        }
        let career_summary = summary.unwrap_or_else(|| explain::career_summary(career_goal));

        info!("[{}] {} recommendations", PipelineStage::BuildPath, recommendations.len());
        let learning_path = learning_path::build(&recommendations, current_skills, &self.config);

        info!("[{}]", PipelineStage::ExtractInsights);
        let market_insights = insights::extract(&self.archetypes, snapshot, &skill_gap, career_goal);

        info!("[{}]", PipelineStage::AlignCurriculum);
        let curriculum_comparison = alignment::compare(&snapshot.skills, &recommendations, &skill_gap);

        MatchOutcome {
            skill_gap,
            recommendations,
            learning_path,
            market_insights,
            curriculum_comparison,
            career_summary,
        }
    }

    /// Snapshot for offline advice: caller-supplied skill frequencies when present,
    /// otherwise the goal's archetype.
    fn advice_snapshot(&self, query: &CareerAdviceQuery) -> JobMarketSnapshot {
        let title = self.archetypes.job_title_for(&query.career_goal);
        let mut snapshot = synthesize_snapshot(&self.archetypes, &title, "", Utc::now());
        if !query.required_skills.is_empty() {
            snapshot.job_count = query.required_skills.values().copied().max().unwrap_or(0);
            snapshot.skills = query.required_skills.clone();
            snapshot.source = SnapshotSource::Provided;
        }
        snapshot
    }
}

#[async_trait]
impl Agent for MatchingEngine {
    fn name(&self) -> &'static str {
        "matching"
    }

    fn description(&self) -> &'static str {
        "Analyzes skill gaps and matches courses, learning paths and market insights to a career goal"
    }

    fn capabilities(&self) -> Vec<String> {
        let mut caps = vec![
            "skill_gap_analysis".to_string(),
            "course_scoring".to_string(),
            "learning_path".to_string(),
            "market_insights".to_string(),
            "curriculum_alignment".to_string(),
        ];
        if self.generator.is_some() {
            caps.push("generated_explanations".to_string());
        }
        caps
    }

    fn handles(&self, request: &AgentRequest) -> bool {
        matches!(request, AgentRequest::CareerAdvice(_))
    }

    async fn process_request(&self, request: AgentRequest) -> Result<AgentResponse, AppError> {
        let AgentRequest::CareerAdvice(query) = request else {
            return Err(unsupported(self.name(), &request));
        };
        require_text("career_goal", &query.career_goal)?;

        let snapshot = self.advice_snapshot(&query);
        let courses = if query.courses.is_empty() {
            StaticCatalog::new().courses().to_vec()
        } else {
            query.courses.clone()
        };

        let outcome = self
            .evaluate(
                query.career_goal.trim(),
                &snapshot,
                &courses,
                &query.current_skills,
                &query.completed_courses,
            )
            .await;
        Ok(AgentResponse::CareerAdvice(Box::new(outcome)))
    }
}
