//! Project review: the user's selections on top of an analysis result, and
//! the construction of the final, capped project list.

use serde::Serialize;
use thiserror::Error;

use crate::models::resume::{Project, ResumeRecord, MAX_PROJECTS};
use crate::review::analysis::ProjectSuitabilityResult;

#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("No replacement is offered for project '{0}'")]
    NoReplacement(String),

    #[error("No suggested project titled '{0}'")]
    UnknownSuggestion(String),

    #[error("Please provide a project title and at least one technology")]
    ManualDraftIncomplete,

    #[error("Please generate bullet points first")]
    BulletsNotGenerated,
}

/// One chosen project, in the order the user picked it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// Replacement offered for the unsuitable project with this title.
    Replacement { title: String },
    /// Additional suggested project with this title.
    Suggestion { title: String },
    Manual { project: Project },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManualProjectDraft {
    pub title: String,
    pub tech_stack: Vec<String>,
    pub bullets: Vec<String>,
}

/// Inputs for the bullet generator, validated from the manual draft.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletRequest {
    pub title: String,
    pub tech_stack: Vec<String>,
    pub job_description: String,
    pub target_role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReview {
    analysis: ProjectSuitabilityResult,
    #[serde(skip)]
    resume: ResumeRecord,
    #[serde(skip)]
    job_description: String,
    #[serde(skip)]
    target_role: String,
    selections: Vec<Selection>,
    manual: ManualProjectDraft,
}

impl ProjectReview {
    pub fn new(
        analysis: ProjectSuitabilityResult,
        resume: ResumeRecord,
        job_description: impl Into<String>,
        target_role: impl Into<String>,
    ) -> Self {
        Self {
            analysis,
            resume,
            job_description: job_description.into(),
            target_role: target_role.into(),
            selections: Vec::new(),
            manual: ManualProjectDraft::default(),
        }
    }

    pub fn manual_draft(&self) -> &ManualProjectDraft {
        &self.manual
    }

    pub fn selected_count(&self) -> usize {
        self.selections.len()
    }

    /// Selects or deselects the replacement offered for an unsuitable
    /// project. Returns whether it is selected afterwards.
    pub fn toggle_replacement(&mut self, title: &str) -> Result<bool, ReviewError> {
        let offered = self
            .analysis
            .project_analysis
            .iter()
            .any(|p| p.title == title && !p.suitable && p.replacement_suggestion.is_some());
        if !offered {
            return Err(ReviewError::NoReplacement(title.to_string()));
        }
        Ok(self.toggle(Selection::Replacement {
            title: title.to_string(),
        }))
    }

    pub fn toggle_suggestion(&mut self, title: &str) -> Result<bool, ReviewError> {
        if !self.analysis.suggested_projects.iter().any(|s| s.title == title) {
            return Err(ReviewError::UnknownSuggestion(title.to_string()));
        }
        Ok(self.toggle(Selection::Suggestion {
            title: title.to_string(),
        }))
    }

    fn toggle(&mut self, selection: Selection) -> bool {
        if let Some(pos) = self.selections.iter().position(|s| *s == selection) {
            self.selections.remove(pos);
            false
        } else {
            self.selections.push(selection);
            true
        }
    }

    pub fn set_manual_title(&mut self, title: impl Into<String>) {
        self.manual.title = title.into();
    }

    /// Adds a tech tag; blank and duplicate tags are ignored.
    pub fn add_tech(&mut self, tech: &str) {
        let tech = tech.trim();
        if !tech.is_empty() && !self.manual.tech_stack.iter().any(|t| t == tech) {
            self.manual.tech_stack.push(tech.to_string());
        }
    }

    pub fn remove_tech(&mut self, tech: &str) {
        self.manual.tech_stack.retain(|t| t != tech.trim());
    }

    /// Validates the manual draft before any call to the bullet generator.
    pub fn bullet_request(&self) -> Result<BulletRequest, ReviewError> {
        if self.manual.title.trim().is_empty() || self.manual.tech_stack.is_empty() {
            return Err(ReviewError::ManualDraftIncomplete);
        }
        Ok(BulletRequest {
            title: self.manual.title.trim().to_string(),
            tech_stack: self.manual.tech_stack.clone(),
            job_description: self.job_description.clone(),
            target_role: self.target_role.clone(),
        })
    }

    pub fn set_manual_bullets(&mut self, bullets: Vec<String>) {
        self.manual.bullets = bullets;
    }

    /// Moves the drafted project into the selection list and clears the draft.
    pub fn add_manual_project(&mut self) -> Result<(), ReviewError> {
        if self.manual.bullets.is_empty() {
            return Err(ReviewError::BulletsNotGenerated);
        }
        let draft = std::mem::take(&mut self.manual);
        self.selections.push(Selection::Manual {
            project: Project {
                title: draft.title.trim().to_string(),
                bullets: draft.bullets,
                github_url: None,
            },
        });
        Ok(())
    }

    /// Builds the updated resume: suitable originals first, then selections
    /// in the order picked, stopping at `MAX_PROJECTS`.
    pub fn apply(&self) -> ResumeRecord {
        let mut projects: Vec<Project> = self
            .resume
            .projects
            .iter()
            .filter(|p| self.analysis.is_suitable(&p.title))
            .cloned()
            .collect();
        let kept = projects.len();

        for selection in &self.selections {
            if projects.len() >= MAX_PROJECTS {
                break;
            }
            if let Some(project) = self.resolve(selection) {
                projects.push(project);
            }
        }
        projects.truncate(MAX_PROJECTS);

        tracing::info!(
            removed = self.resume.projects.len() - kept,
            added = projects.len().saturating_sub(kept),
            kept,
            total = projects.len(),
            "project replacement applied"
        );
        self.resume.with_projects(projects)
    }

    fn resolve(&self, selection: &Selection) -> Option<Project> {
        match selection {
            Selection::Replacement { title } => self
                .analysis
                .project_analysis
                .iter()
                .find(|p| &p.title == title)
                .and_then(|p| p.replacement_suggestion.as_ref())
                .map(|s| Project {
                    title: s.title.clone(),
                    bullets: s.bullet_points.clone(),
                    github_url: Some(s.github_url.clone()).filter(|u| !u.is_empty()),
                }),
            Selection::Suggestion { title } => self
                .analysis
                .suggested_projects
                .iter()
                .find(|s| &s.title == title)
                .map(|s| Project {
                    title: s.title.clone(),
                    bullets: s.bullet_points.clone(),
                    github_url: Some(s.github_url.clone()).filter(|u| !u.is_empty()),
                }),
            Selection::Manual { project } => Some(project.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::analysis::{ProjectVerdict, SuggestedProject, SuitabilitySummary};

    fn project(title: &str) -> Project {
        Project {
            title: title.to_string(),
            bullets: vec![format!("Built {title}")],
            github_url: None,
        }
    }

    fn suggestion(title: &str) -> SuggestedProject {
        SuggestedProject {
            title: title.to_string(),
            github_url: format!("https://github.com/example/{}", title.to_lowercase().replace(' ', "-")),
            bullet_points: vec![format!("Designed {title}")],
        }
    }

    fn verdict(title: &str, suitable: bool, replacement: Option<SuggestedProject>) -> ProjectVerdict {
        ProjectVerdict {
            title: title.to_string(),
            suitable,
            reason: (!suitable).then(|| "Not aligned".to_string()),
            replacement_suggestion: replacement,
        }
    }

    fn review(
        projects: &[&str],
        verdicts: Vec<ProjectVerdict>,
        suggestions: Vec<SuggestedProject>,
    ) -> ProjectReview {
        let resume = ResumeRecord {
            name: "John Doe".to_string(),
            certifications: vec!["CKA".to_string()],
            projects: projects.iter().map(|t| project(t)).collect(),
            ..Default::default()
        };
        let analysis = ProjectSuitabilityResult {
            project_analysis: verdicts,
            summary: SuitabilitySummary::default(),
            suggested_projects: suggestions,
        }
        .with_recomputed_summary();
        ProjectReview::new(analysis, resume, "Senior Backend Engineer, Go", "Backend Engineer")
    }

    fn titles(resume: &ResumeRecord) -> Vec<&str> {
        resume.projects.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_replacing_unsuitable_project() {
        let mut r = review(
            &["Todo App", "Payments API"],
            vec![
                verdict("Todo App", false, Some(suggestion("Distributed Cache"))),
                verdict("Payments API", true, None),
            ],
            vec![],
        );
        assert_eq!(r.toggle_replacement("Todo App"), Ok(true));
        let updated = r.apply();
        assert_eq!(titles(&updated), vec!["Payments API", "Distributed Cache"]);
        assert_eq!(
            updated.projects[1].github_url.as_deref(),
            Some("https://github.com/example/distributed-cache")
        );
        assert_eq!(updated.name, "John Doe");
        assert_eq!(updated.certifications, vec!["CKA"]);
    }

    #[test]
    fn test_advanced_style_suggestion_replaces_dropped_project() {
        let mut r = review(
            &["Todo App", "Payments API"],
            vec![verdict("Todo App", false, None), verdict("Payments API", true, None)],
            vec![suggestion("Distributed Cache")],
        );
        r.toggle_suggestion("Distributed Cache").unwrap();
        assert_eq!(titles(&r.apply()), vec!["Payments API", "Distributed Cache"]);
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut r = review(&[], vec![], vec![suggestion("A")]);
        assert_eq!(r.toggle_suggestion("A"), Ok(true));
        assert_eq!(r.toggle_suggestion("A"), Ok(false));
        assert_eq!(r.selected_count(), 0);
        assert!(r.apply().projects.is_empty());
    }

    #[test]
    fn test_toggle_rejects_unknown_titles() {
        let mut r = review(
            &["Payments API"],
            vec![verdict("Payments API", true, Some(suggestion("X")))],
            vec![],
        );
        assert_eq!(
            r.toggle_replacement("Payments API"),
            Err(ReviewError::NoReplacement("Payments API".to_string()))
        );
        assert_eq!(
            r.toggle_suggestion("Nope"),
            Err(ReviewError::UnknownSuggestion("Nope".to_string()))
        );
    }

    #[test]
    fn test_cap_drops_late_selections_in_selection_order() {
        let mut r = review(
            &["Keep 1", "Keep 2"],
            vec![verdict("Keep 1", true, None), verdict("Keep 2", true, None)],
            vec![suggestion("A"), suggestion("B"), suggestion("C")],
        );
        r.toggle_suggestion("C").unwrap();
        r.toggle_suggestion("A").unwrap();
        r.toggle_suggestion("B").unwrap();
        let updated = r.apply();
        assert_eq!(titles(&updated), vec!["Keep 1", "Keep 2", "C"]);
    }

    #[test]
    fn test_final_list_never_exceeds_cap() {
        let originals = ["P1", "P2", "P3", "P4"];
        let mut r = review(
            &originals,
            originals.iter().map(|t| verdict(t, true, None)).collect(),
            vec![suggestion("S1"), suggestion("S2")],
        );
        r.toggle_suggestion("S1").unwrap();
        r.toggle_suggestion("S2").unwrap();
        assert_eq!(r.apply().projects.len(), MAX_PROJECTS);
    }

    #[test]
    fn test_zero_unsuitable_still_allows_additions_up_to_cap() {
        let mut r = review(
            &["Payments API"],
            vec![verdict("Payments API", true, None)],
            vec![suggestion("A"), suggestion("B"), suggestion("C")],
        );
        for t in ["A", "B", "C"] {
            r.toggle_suggestion(t).unwrap();
        }
        assert_eq!(titles(&r.apply()), vec!["Payments API", "A", "B"]);
    }

    #[test]
    fn test_manual_project_requires_title_and_tech() {
        let mut r = review(&[], vec![], vec![]);
        assert_eq!(r.bullet_request(), Err(ReviewError::ManualDraftIncomplete));
        r.set_manual_title("Rate Limiter");
        assert_eq!(r.bullet_request(), Err(ReviewError::ManualDraftIncomplete));
        r.add_tech(" Go ");
        r.add_tech("Go");
        r.add_tech("  ");
        r.add_tech("Redis");
        assert_eq!(r.manual_draft().tech_stack, vec!["Go", "Redis"]);
        r.remove_tech("Redis");
        let request = r.bullet_request().unwrap();
        assert_eq!(request.title, "Rate Limiter");
        assert_eq!(request.tech_stack, vec!["Go"]);
        assert_eq!(request.target_role, "Backend Engineer");
    }

    #[test]
    fn test_manual_project_rejected_without_bullets() {
        let mut r = review(&[], vec![], vec![]);
        r.set_manual_title("Rate Limiter");
        r.add_tech("Go");
        assert_eq!(r.add_manual_project(), Err(ReviewError::BulletsNotGenerated));
        r.set_manual_bullets(vec!["Built a token-bucket limiter in Go".to_string()]);
        r.add_manual_project().unwrap();
        assert_eq!(r.manual_draft(), &ManualProjectDraft::default());
        let updated = r.apply();
        assert_eq!(titles(&updated), vec!["Rate Limiter"]);
        assert_eq!(updated.projects[0].github_url, None);
    }

    #[test]
    fn test_manual_and_suggested_keep_selection_order() {
        let mut r = review(&[], vec![], vec![suggestion("Distributed Cache")]);
        r.set_manual_title("Rate Limiter");
        r.add_tech("Go");
        r.set_manual_bullets(vec!["Built it".to_string()]);
        r.add_manual_project().unwrap();
        r.toggle_suggestion("Distributed Cache").unwrap();
        assert_eq!(titles(&r.apply()), vec!["Rate Limiter", "Distributed Cache"]);
    }
}
