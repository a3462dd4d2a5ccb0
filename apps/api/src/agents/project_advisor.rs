//! Portfolio project recommendations for a career goal.
//!
//! A configured generator is asked for a JSON array of projects; anything short of three
//! usable projects falls back to the career-family templates below.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agents::prompts::{build_project_prompt, PROJECT_SYSTEM};
use crate::agents::{require_text, unsupported, Agent, AgentRequest, AgentResponse};
use crate::errors::AppError;
use crate::llm_client::strip_json_fences;
use crate::matching::archetypes::{ArchetypeTable, CareerFamily};
use crate::matching::explain::{ExplanationGenerator, GenerationError};

const MIN_PROJECTS: usize = 3;
const MAX_PROJECTS: usize = 4;
const MIN_WEEKS: u32 = 2;
const MAX_WEEKS: u32 = 8;
const DEFAULT_WEEKS: u32 = 4;
/// Archetype skills used as targets when the caller names none.
const DEFAULT_TARGET_SKILLS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    fn parse_lenient(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("beginner") {
            SkillLevel::Beginner
        } else if text.contains("advanced") {
            SkillLevel::Advanced
        } else {
            SkillLevel::Intermediate
        }
    }

    /// Project difficulties suitable for a student at this level.
    fn accepts(self, difficulty: SkillLevel) -> bool {
        match self {
            SkillLevel::Beginner => difficulty != SkillLevel::Advanced,
            SkillLevel::Intermediate => true,
            SkillLevel::Advanced => difficulty != SkillLevel::Beginner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectQuery {
    pub career_goal: String,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub target_skills: Vec<String>,
    #[serde(default)]
    pub recommended_courses: Vec<String>,
    #[serde(default)]
    pub skill_level: SkillLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSource {
    Generated,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub number: usize,
    pub title: String,
    pub difficulty: SkillLevel,
    pub duration_weeks: u32,
    pub description: String,
    pub skills_practiced: Vec<String>,
    pub why_valuable: String,
    pub key_features: Vec<String>,
    pub portfolio_impact: String,
    pub source: ProjectSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationTimeline {
    pub total_weeks: u32,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub career_goal: String,
    pub skill_level: SkillLevel,
    pub projects: Vec<Project>,
    pub total_projects: usize,
    pub implementation_timeline: ImplementationTimeline,
}

// ────────────────────────────────────────────────────────────────────────────
// Agent
// ────────────────────────────────────────────────────────────────────────────

pub struct ProjectAdvisor {
    generator: Option<Arc<dyn ExplanationGenerator>>,
    archetypes: Arc<ArchetypeTable>,
}

impl ProjectAdvisor {
    pub fn new(
        generator: Option<Arc<dyn ExplanationGenerator>>,
        archetypes: Arc<ArchetypeTable>,
    ) -> Self {
        Self {
            generator,
            archetypes,
        }
    }

    pub async fn recommend(&self, query: &ProjectQuery) -> Result<ProjectPlan, AppError> {
        require_text("career_goal", &query.career_goal)?;
        let career_goal = query.career_goal.trim();

        let target_skills = if query.target_skills.is_empty() {
            self.archetypes
                .resolve(career_goal)
                .skills
                .iter()
                .take(DEFAULT_TARGET_SKILLS)
                .map(|s| s.name.clone())
                .collect()
        } else {
            query.target_skills.clone()
        };

        let mut projects = match &self.generator {
            Some(generator) => {
                let prompt = build_project_prompt(
                    career_goal,
                    query.skill_level,
                    &query.current_skills,
                    &target_skills,
                    &query.recommended_courses,
                );
                match generator
                    .generate(&prompt, PROJECT_SYSTEM)
                    .await
                    .and_then(|text| parse_projects(&text))
                {
                    Ok(projects) if projects.len() >= MIN_PROJECTS => projects,
                    Ok(projects) => {
                        warn!(
                            "Generator returned {} usable projects, using templates",
                            projects.len()
                        );
                        vec![]
                    }
                    Err(e) => {
                        warn!("Project generation failed, using templates: {e}");
                        vec![]
                    }
                }
            }
            None => vec![],
        };

        if projects.is_empty() {
            let family = self.archetypes.family_of(career_goal);
            projects = template_projects(family, &target_skills, query.skill_level);
        }
        projects.truncate(MAX_PROJECTS);
        for (i, project) in projects.iter_mut().enumerate() {
            project.number = i + 1;
        }

        info!(
            "Recommended {} projects for '{career_goal}' ({})",
            projects.len(),
            query.skill_level.as_str()
        );
        Ok(ProjectPlan {
            career_goal: career_goal.to_string(),
            skill_level: query.skill_level,
            total_projects: projects.len(),
            implementation_timeline: timeline(&projects),
            projects,
        })
    }
}

#[async_trait]
impl Agent for ProjectAdvisor {
    fn name(&self) -> &'static str {
        "project_advisor"
    }

    fn description(&self) -> &'static str {
        "Recommends portfolio projects that build the skills a career goal requires"
    }

    fn capabilities(&self) -> Vec<String> {
        let mut caps = vec![
            "project_recommendations".to_string(),
            "implementation_timeline".to_string(),
        ];
        if self.generator.is_some() {
            caps.push("generated_projects".to_string());
        }
        caps
    }

    fn handles(&self, request: &AgentRequest) -> bool {
        matches!(request, AgentRequest::Projects(_))
    }

    async fn process_request(&self, request: AgentRequest) -> Result<AgentResponse, AppError> {
        let AgentRequest::Projects(query) = request else {
            return Err(unsupported(self.name(), &request));
        };
        Ok(AgentResponse::Projects(self.recommend(&query).await?))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generated output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeneratedProject {
    title: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    duration_weeks: Option<u32>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    skills_practiced: Vec<String>,
    #[serde(default)]
    why_valuable: String,
    #[serde(default)]
    key_features: Vec<String>,
    #[serde(default)]
    portfolio_impact: String,
}

/// Parses a JSON array of projects. Entries without a title are skipped.
fn parse_projects(text: &str) -> Result<Vec<Project>, GenerationError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(GenerationError::Empty);
    }
    let json = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Err(GenerationError::Malformed("no JSON array found".to_string())),
    };

    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let projects = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<GeneratedProject>(value).ok())
        .filter(|p| !p.title.trim().is_empty())
        .enumerate()
        .map(|(i, p)| Project {
            number: i + 1,
            title: p.title.trim().to_string(),
            difficulty: p
                .difficulty
                .as_deref()
                .map(SkillLevel::parse_lenient)
                .unwrap_or_default(),
            duration_weeks: p
                .duration_weeks
                .unwrap_or(DEFAULT_WEEKS)
                .clamp(MIN_WEEKS, MAX_WEEKS),
            description: p.description,
            skills_practiced: p.skills_practiced,
            why_valuable: p.why_valuable,
            key_features: p.key_features,
            portfolio_impact: p.portfolio_impact,
            source: ProjectSource::Generated,
        })
        .collect();
    Ok(projects)
}

fn timeline(projects: &[Project]) -> ImplementationTimeline {
    let total_weeks: u32 = projects.iter().map(|p| p.duration_weeks).sum();
    let months = total_weeks / 4;
    let weeks = total_weeks % 4;
    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };
    let summary = match (months, weeks) {
        (0, _) => plural(total_weeks, "week"),
        (m, 0) => plural(m, "month"),
        (m, w) => format!("{} and {}", plural(m, "month"), plural(w, "week")),
    };
    ImplementationTimeline {
        total_weeks,
        summary,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

struct Template {
    title: &'static str,
    difficulty: SkillLevel,
    weeks: u32,
    description: &'static str,
    skills: &'static [&'static str],
    why_valuable: &'static str,
    key_features: &'static [&'static str],
    portfolio_impact: &'static str,
}

/// Four templates per family: one beginner, two intermediate, one advanced. Filtering by
/// skill level therefore always leaves three or four.
fn template_projects(
    family: CareerFamily,
    target_skills: &[String],
    level: SkillLevel,
) -> Vec<Project> {
    templates_for(family)
        .iter()
        .filter(|t| level.accepts(t.difficulty))
        .map(|t| {
            let skills_practiced = if t.skills.is_empty() {
                if target_skills.is_empty() {
                    vec![
                        "Analysis".to_string(),
                        "Programming".to_string(),
                        "Problem Solving".to_string(),
                    ]
                } else {
                    target_skills.iter().take(4).cloned().collect()
                }
            } else {
                t.skills.iter().map(|s| s.to_string()).collect()
            };
            Project {
                number: 0,
                title: t.title.to_string(),
                difficulty: t.difficulty,
                duration_weeks: t.weeks,
                description: t.description.to_string(),
                skills_practiced,
                why_valuable: t.why_valuable.to_string(),
                key_features: t.key_features.iter().map(|s| s.to_string()).collect(),
                portfolio_impact: t.portfolio_impact.to_string(),
                source: ProjectSource::Template,
            }
        })
        .collect()
}

fn templates_for(family: CareerFamily) -> &'static [Template] {
    match family {
        CareerFamily::DataMl => DATA_ML_TEMPLATES,
        CareerFamily::Software => SOFTWARE_TEMPLATES,
        CareerFamily::Finance => FINANCE_TEMPLATES,
        CareerFamily::Science => SCIENCE_TEMPLATES,
        CareerFamily::Marketing => MARKETING_TEMPLATES,
        CareerFamily::Generic => GENERIC_TEMPLATES,
    }
}

const DATA_ML_TEMPLATES: &[Template] = &[
    Template {
        title: "Exploratory Analysis of a Public Dataset",
        difficulty: SkillLevel::Beginner,
        weeks: 2,
        description: "Clean, explore and visualize an open government or Kaggle dataset, then write up the findings in a notebook.",
        skills: &["Python", "Pandas", "Data Visualization", "Statistics"],
        why_valuable: "Shows the data wrangling and communication skills every analytics role starts with.",
        key_features: &["Data cleaning", "Summary statistics", "Charts", "Written findings"],
        portfolio_impact: "A readable first project that proves you can turn raw data into insight",
    },
    Template {
        title: "Customer Churn Prediction Dashboard",
        difficulty: SkillLevel::Intermediate,
        weeks: 3,
        description: "Build an interactive dashboard that predicts customer churn with a machine learning model and explains the drivers.",
        skills: &["Python", "Machine Learning", "Data Visualization", "SQL"],
        why_valuable: "Covers the full path from data collection to modeling to business insight.",
        key_features: &["Model training", "Interactive dashboard", "SQL data source", "Model performance metrics"],
        portfolio_impact: "Shows you can solve a real business problem with data",
    },
    Template {
        title: "Social Media Sentiment Analyzer",
        difficulty: SkillLevel::Intermediate,
        weeks: 4,
        description: "Classify sentiment in public posts about a brand or topic with NLP and chart how it shifts over time.",
        skills: &["NLP", "Python", "API Integration", "Data Visualization"],
        why_valuable: "NLP is in high demand and this extracts insight from unstructured text.",
        key_features: &["API ingestion", "Sentiment classification", "Trend analysis", "Visualizations"],
        portfolio_impact: "Demonstrates text analytics, a sought-after skill",
    },
    Template {
        title: "Real-Time Stock Market Analysis Tool",
        difficulty: SkillLevel::Advanced,
        weeks: 5,
        description: "Stream live market data, compute technical indicators and backtest simple statistical trading signals.",
        skills: &["Python", "APIs", "Statistical Analysis", "Data Visualization"],
        why_valuable: "Combines data engineering, statistics and visualization in one system.",
        key_features: &["Real-time ingestion", "Technical indicators", "Historical backtesting", "Alerts"],
        portfolio_impact: "Proves you can work with live data and quantitative models",
    },
];

const SOFTWARE_TEMPLATES: &[Template] = &[
    Template {
        title: "Command-Line Expense Tracker",
        difficulty: SkillLevel::Beginner,
        weeks: 2,
        description: "Write a CLI that records expenses to a local database and prints monthly reports.",
        skills: &["Programming", "Git", "Database Design", "Testing"],
        why_valuable: "Shows clean code, persistence and testing habits on a small scope.",
        key_features: &["Subcommands", "SQLite storage", "Monthly reports", "Unit tests"],
        portfolio_impact: "A compact, well-tested codebase reviewers can read in minutes",
    },
    Template {
        title: "Task Management Web App with Real-Time Collaboration",
        difficulty: SkillLevel::Intermediate,
        weeks: 4,
        description: "Build a full-stack app where teams manage tasks with live updates over WebSockets.",
        skills: &["React", "Node.js", "WebSockets", "Database Design", "REST APIs"],
        why_valuable: "Demonstrates full-stack development with technologies companies use.",
        key_features: &["User authentication", "Real-time updates", "REST API", "PostgreSQL database"],
        portfolio_impact: "Shows you can build production-style applications",
    },
    Template {
        title: "CI/CD Pipeline with Automated Testing",
        difficulty: SkillLevel::Intermediate,
        weeks: 3,
        description: "Set up a pipeline that tests, checks code quality, builds containers and deploys on every push.",
        skills: &["DevOps", "Git", "Docker", "Testing", "Automation"],
        why_valuable: "Shows you understand modern delivery workflows beyond writing code.",
        key_features: &["CI workflow", "Unit and integration tests", "Docker images", "Automated deployment"],
        portfolio_impact: "Sets you apart from code-only candidates",
    },
    Template {
        title: "Mobile-First E-Commerce Platform",
        difficulty: SkillLevel::Advanced,
        weeks: 6,
        description: "Create a responsive store with payments, cart management and an admin dashboard.",
        skills: &["React", "Payment APIs", "Database", "Cloud Deployment", "Security"],
        why_valuable: "Exercises complex business logic and payment handling.",
        key_features: &["Payment integration", "Product catalog", "Order management", "Cloud deployment"],
        portfolio_impact: "Demonstrates you can handle a complex real-world application",
    },
];

const FINANCE_TEMPLATES: &[Template] = &[
    Template {
        title: "Financial Statement Analysis Dashboard",
        difficulty: SkillLevel::Beginner,
        weeks: 2,
        description: "Pull company financial statements automatically and calculate key ratios for comparison.",
        skills: &["Excel", "Financial Analysis", "Data Visualization", "Python"],
        why_valuable: "Statement analysis is fundamental to analyst roles and automating it shows efficiency.",
        key_features: &["Statement import", "Ratio calculations", "Peer comparison", "Trend charts"],
        portfolio_impact: "Shows you can automate routine analyst work",
    },
    Template {
        title: "Personal Investment Portfolio Optimizer",
        difficulty: SkillLevel::Intermediate,
        weeks: 3,
        description: "Optimize a portfolio with Modern Portfolio Theory and Monte Carlo simulation.",
        skills: &["Python", "Financial Modeling", "Statistical Analysis", "Excel"],
        why_valuable: "Implements core risk and return concepts programmatically.",
        key_features: &["Risk-return optimization", "Monte Carlo simulation", "Efficient frontier", "Backtesting"],
        portfolio_impact: "Demonstrates quantitative finance skills",
    },
    Template {
        title: "Budget Variance Reporting Automation",
        difficulty: SkillLevel::Intermediate,
        weeks: 3,
        description: "Compare budgeted and actual figures across departments and generate monthly variance reports.",
        skills: &["Excel", "SQL", "Financial Analysis", "Reporting"],
        why_valuable: "Variance analysis is a daily task in corporate finance teams.",
        key_features: &["Data consolidation", "Variance calculations", "Exception flags", "Monthly report"],
        portfolio_impact: "Shows practical FP&A skills",
    },
    Template {
        title: "DCF Valuation Model with Scenario Analysis",
        difficulty: SkillLevel::Advanced,
        weeks: 4,
        description: "Build a discounted cash flow model with scenarios and sensitivity tables.",
        skills: &["Financial Modeling", "Valuation", "Excel", "Scenario Analysis"],
        why_valuable: "DCF is the standard valuation method for finance careers.",
        key_features: &["Three-statement model", "WACC calculation", "Scenario analysis", "Sensitivity tables"],
        portfolio_impact: "Core skill for investment banking and equity research",
    },
];

const SCIENCE_TEMPLATES: &[Template] = &[
    Template {
        title: "Reproducible Lab Data Notebook",
        difficulty: SkillLevel::Beginner,
        weeks: 2,
        description: "Turn a raw lab dataset into a documented, reproducible analysis notebook with versioned data.",
        skills: &["Python", "Data Analysis", "Research Methods"],
        why_valuable: "Reproducibility is expected in every modern research group.",
        key_features: &["Versioned data", "Documented steps", "Figures", "Methods write-up"],
        portfolio_impact: "Shows careful research practice",
    },
    Template {
        title: "Behavioral Data Analysis Pipeline",
        difficulty: SkillLevel::Intermediate,
        weeks: 4,
        description: "Automate cleaning, statistical testing and plotting for behavioral experiment data.",
        skills: &["Data Analysis", "Statistics", "Python", "Research Methods"],
        why_valuable: "Automating experiment analysis saves labs real time.",
        key_features: &["Automated cleaning", "Statistical tests", "Publication-quality plots", "Report generation"],
        portfolio_impact: "Demonstrates research skills labs and employers value",
    },
    Template {
        title: "Neural Circuit Simulation",
        difficulty: SkillLevel::Intermediate,
        weeks: 5,
        description: "Simulate a small network of integrate-and-fire neurons and explore how parameters change its behavior.",
        skills: &["Computational Modeling", "Python", "Research"],
        why_valuable: "Computational modeling is central to modern research.",
        key_features: &["Neuron models", "Synaptic plasticity", "Parameter sweeps", "Visualizations"],
        portfolio_impact: "Shows strong theoretical and computational foundations",
    },
    Template {
        title: "EEG Signal Processing and Classification",
        difficulty: SkillLevel::Advanced,
        weeks: 5,
        description: "Filter EEG recordings, extract features and train a classifier for brain states.",
        skills: &["Signal Processing", "Python", "Machine Learning", "Data Analysis"],
        why_valuable: "Applies computational methods to real experimental data.",
        key_features: &["Noise filtering", "Feature extraction", "Classification", "Activity visualizations"],
        portfolio_impact: "Demonstrates practical research engineering skills",
    },
];

const MARKETING_TEMPLATES: &[Template] = &[
    Template {
        title: "Brand Social Media Audit",
        difficulty: SkillLevel::Beginner,
        weeks: 2,
        description: "Audit a brand's social channels, benchmark engagement against competitors and recommend changes.",
        skills: &["Social Media", "Content Strategy", "Analytics"],
        why_valuable: "Audits are a common first assignment for marketing hires.",
        key_features: &["Channel benchmarks", "Engagement metrics", "Competitor comparison", "Recommendations"],
        portfolio_impact: "Shows structured thinking about brand performance",
    },
    Template {
        title: "Campaign A/B Test Analysis",
        difficulty: SkillLevel::Intermediate,
        weeks: 3,
        description: "Design an A/B test for an email or landing page and analyze the results for significance.",
        skills: &["A/B Testing", "Statistics", "Google Analytics"],
        why_valuable: "Data-driven experimentation is central to modern marketing.",
        key_features: &["Test design", "Significance testing", "Lift estimates", "Executive summary"],
        portfolio_impact: "Proves you can measure what works",
    },
    Template {
        title: "Customer Segmentation with Clustering",
        difficulty: SkillLevel::Intermediate,
        weeks: 4,
        description: "Segment customers from purchase data and propose targeted messaging for each segment.",
        skills: &["SQL", "Python", "Market Research", "Data Visualization"],
        why_valuable: "Segmentation drives targeting and budget allocation.",
        key_features: &["RFM features", "Clustering", "Segment profiles", "Messaging plan"],
        portfolio_impact: "Connects analytics to marketing strategy",
    },
    Template {
        title: "Multi-Channel Attribution Dashboard",
        difficulty: SkillLevel::Advanced,
        weeks: 5,
        description: "Combine ad, web and CRM data to compare attribution models and recommend budget shifts.",
        skills: &["Marketing Analytics", "SQL", "Data Visualization", "SEO"],
        why_valuable: "Attribution answers the budget questions leadership asks.",
        key_features: &["Data integration", "Attribution models", "Channel ROI", "Budget scenarios"],
        portfolio_impact: "Shows senior-level analytical marketing skills",
    },
];

/// An empty `skills` list takes the caller's target skills.
const GENERIC_TEMPLATES: &[Template] = &[
    Template {
        title: "Personal Portfolio Website with CMS",
        difficulty: SkillLevel::Beginner,
        weeks: 2,
        description: "Build a professional portfolio site with a content system to showcase your work.",
        skills: &["Web Development", "Design", "CMS", "Deployment"],
        why_valuable: "Every professional needs a strong online presence.",
        key_features: &["Responsive design", "Project showcase", "Blog", "Contact form"],
        portfolio_impact: "Creates a home for all your other projects",
    },
    Template {
        title: "Industry-Specific Analysis Tool",
        difficulty: SkillLevel::Intermediate,
        weeks: 4,
        description: "Build a tool that solves a concrete problem in your target industry.",
        skills: &[],
        why_valuable: "Domain projects show you understand the industry's challenges.",
        key_features: &["Data collection", "Analysis engine", "Dashboard", "Reporting"],
        portfolio_impact: "Demonstrates domain knowledge and technical skill",
    },
    Template {
        title: "Open Source Contribution",
        difficulty: SkillLevel::Intermediate,
        weeks: 3,
        description: "Make meaningful contributions to an established open-source project in your field.",
        skills: &["Collaboration", "Git", "Code Review", "Documentation"],
        why_valuable: "Shows you can work on large codebases with other people.",
        key_features: &["Bug fixes", "Feature work", "Documentation", "Code review"],
        portfolio_impact: "Shows you can work in real development environments",
    },
    Template {
        title: "Capstone Case Study",
        difficulty: SkillLevel::Advanced,
        weeks: 5,
        description: "Pick a real organization in your target field, analyze a problem it faces and present a costed solution.",
        skills: &[],
        why_valuable: "Mirrors the end-to-end problem solving employers hire for.",
        key_features: &["Problem framing", "Research", "Solution design", "Presentation"],
        portfolio_impact: "A centerpiece project to discuss in interviews",
    },
];
