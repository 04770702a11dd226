//! Project analysis: pluggable analyzers that judge each resume project
//! against the target job and suggest better ones.
//!
//! Two backends share one output contract:
//! - `StandardProjectAnalyzer`: the model returns suitable/unsuitable verdicts directly.
//! - `AdvancedProjectAnalyzer`: the model scores projects 0–100; anything below
//!   `SUITABILITY_THRESHOLD` is unsuitable.
//!
//! The orchestrator holds an `Arc<dyn ProjectAnalyzer>` picked at startup from
//! `ENABLE_ADVANCED_PROJECT_SCORING`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ServiceError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeRecord;
use crate::review::prompts::{ADVANCED_ANALYSIS_PROMPT_TEMPLATE, STANDARD_ANALYSIS_PROMPT_TEMPLATE};

/// Advanced-scorer cutoff: projects scoring at least this are kept.
pub const SUITABILITY_THRESHOLD: u32 = 80;

// ────────────────────────────────────────────────────────────────────────────
// Output data models (shared across all analyzer backends)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedProject {
    pub title: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectVerdict {
    pub title: String,
    pub suitable: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub replacement_suggestion: Option<SuggestedProject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuitabilitySummary {
    pub total_projects: usize,
    pub suitable_projects: usize,
    pub unsuitable_projects: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSuitabilityResult {
    pub project_analysis: Vec<ProjectVerdict>,
    #[serde(default)]
    pub summary: SuitabilitySummary,
    #[serde(default)]
    pub suggested_projects: Vec<SuggestedProject>,
}

impl ProjectSuitabilityResult {
    /// Rebuilds the summary from the verdict list; model-reported counts are
    /// not trusted.
    pub fn with_recomputed_summary(mut self) -> Self {
        let suitable = self.project_analysis.iter().filter(|p| p.suitable).count();
        self.summary = SuitabilitySummary {
            total_projects: self.project_analysis.len(),
            suitable_projects: suitable,
            unsuitable_projects: self.project_analysis.len() - suitable,
        };
        self
    }

    pub fn is_suitable(&self, title: &str) -> bool {
        self.project_analysis
            .iter()
            .any(|p| p.title == title && p.suitable)
    }
}

/// Raw reply of the advanced scorer.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvancedAnalysis {
    #[serde(default)]
    pub projects_to_replace: Vec<ScoredProject>,
    #[serde(default)]
    pub replacement_suggestions: Vec<AdvancedSuggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoredProject {
    pub title: String,
    pub score: u32,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvancedSuggestion {
    pub title: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl AdvancedAnalysis {
    /// Maps scores onto the shared contract. Resume projects the scorer did
    /// not list are considered suitable.
    pub fn into_suitability(self, resume: &ResumeRecord) -> ProjectSuitabilityResult {
        let mut verdicts: Vec<ProjectVerdict> = self
            .projects_to_replace
            .iter()
            .map(|p| {
                let suitable = p.score >= SUITABILITY_THRESHOLD;
                ProjectVerdict {
                    title: p.title.clone(),
                    suitable,
                    reason: (!suitable).then(|| p.reason.clone()),
                    replacement_suggestion: None,
                }
            })
            .collect();

        verdicts.extend(
            resume
                .projects
                .iter()
                .filter(|project| !self.projects_to_replace.iter().any(|p| p.title == project.title))
                .map(|project| ProjectVerdict {
                    title: project.title.clone(),
                    suitable: true,
                    reason: None,
                    replacement_suggestion: None,
                }),
        );

        let suggested_projects = self
            .replacement_suggestions
            .into_iter()
            .map(|s| SuggestedProject {
                title: s.title,
                github_url: s.github_url,
                bullet_points: s.bullets,
            })
            .collect();

        ProjectSuitabilityResult {
            project_analysis: verdicts,
            summary: SuitabilitySummary::default(),
            suggested_projects,
        }
        .with_recomputed_summary()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ProjectAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        resume: &ResumeRecord,
        job_description: &str,
        target_role: &str,
    ) -> Result<ProjectSuitabilityResult, ServiceError>;

    /// Label for logs and snapshots.
    fn backend(&self) -> &'static str;
}

fn fill_template(
    template: &str,
    resume: &ResumeRecord,
    job_description: &str,
    target_role: &str,
) -> Result<String, ServiceError> {
    let projects_json = serde_json::to_string_pretty(&resume.projects)
        .map_err(|e| ServiceError::InvalidResponse(format!("Failed to serialize projects: {e}")))?;
    let skills: Vec<&str> = resume
        .skills
        .iter()
        .flat_map(|g| g.items.iter().map(String::as_str))
        .collect();
    Ok(template
        .replace("{target_role}", target_role)
        .replace("{job_description}", job_description)
        .replace("{skills}", &skills.join(", "))
        .replace("{projects_json}", &projects_json))
}

// ────────────────────────────────────────────────────────────────────────────
// StandardProjectAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct StandardProjectAnalyzer(pub LlmClient);

#[async_trait]
impl ProjectAnalyzer for StandardProjectAnalyzer {
    async fn analyze(
        &self,
        resume: &ResumeRecord,
        job_description: &str,
        target_role: &str,
    ) -> Result<ProjectSuitabilityResult, ServiceError> {
        let prompt = fill_template(
            STANDARD_ANALYSIS_PROMPT_TEMPLATE,
            resume,
            job_description,
            target_role,
        )?;
        let result: ProjectSuitabilityResult = self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        let result = result.with_recomputed_summary();
        info!(
            suitable = result.summary.suitable_projects,
            unsuitable = result.summary.unsuitable_projects,
            suggestions = result.suggested_projects.len(),
            "standard project analysis complete"
        );
        Ok(result)
    }

    fn backend(&self) -> &'static str {
        "standard"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AdvancedProjectAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct AdvancedProjectAnalyzer(pub LlmClient);

#[async_trait]
impl ProjectAnalyzer for AdvancedProjectAnalyzer {
    async fn analyze(
        &self,
        resume: &ResumeRecord,
        job_description: &str,
        target_role: &str,
    ) -> Result<ProjectSuitabilityResult, ServiceError> {
        let prompt = fill_template(
            ADVANCED_ANALYSIS_PROMPT_TEMPLATE,
            resume,
            job_description,
            target_role,
        )?;
        let raw: AdvancedAnalysis = self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        let result = raw.into_suitability(resume);
        info!(
            suitable = result.summary.suitable_projects,
            unsuitable = result.summary.unsuitable_projects,
            "advanced project analysis complete"
        );
        Ok(result)
    }

    fn backend(&self) -> &'static str {
        "advanced"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
