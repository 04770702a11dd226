//! Gap-filling form: collects entries for each section the gap check flagged,
//! one section per step, and merges the valid ones back into the resume.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::{Project, ResumeRecord, WorkExperience};
use crate::optimization::completeness::SectionKind;

#[derive(Debug, Error, PartialEq)]
pub enum GapFillError {
    #[error("Section {0:?} was not requested")]
    SectionNotRequested(SectionKind),

    #[error("Entry index {index} is out of range ({len} entries)")]
    EntryOutOfRange { index: usize, len: usize },
}

/// Work-experience entry as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperienceDraft {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub bullets: Vec<String>,
}

impl WorkExperienceDraft {
    pub fn is_valid(&self) -> bool {
        !self.role.trim().is_empty()
            && !self.company.trim().is_empty()
            && !self.duration.trim().is_empty()
    }

    fn into_entry(self) -> WorkExperience {
        WorkExperience {
            role: self.role,
            company: self.company,
            duration: self.duration,
            bullets: non_blank(self.bullets),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    pub title: String,
    pub bullets: Vec<String>,
}

impl ProjectDraft {
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && self.bullets.iter().any(|b| !b.trim().is_empty())
    }

    fn into_entry(self) -> Project {
        Project {
            title: self.title,
            bullets: non_blank(self.bullets),
            github_url: None,
        }
    }
}

/// One entry in any of the three sub-forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "entry", rename_all = "snake_case")]
pub enum GapEntry {
    WorkExperience(WorkExperienceDraft),
    Projects(ProjectDraft),
    Certifications(String),
}

impl GapEntry {
    pub fn section(&self) -> SectionKind {
        match self {
            GapEntry::WorkExperience(_) => SectionKind::WorkExperience,
            GapEntry::Projects(_) => SectionKind::Projects,
            GapEntry::Certifications(_) => SectionKind::Certifications,
        }
    }
}

/// Valid entries collected for the missing sections. Sections that were not
/// requested stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingSectionsSelection {
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
}

/// Result of pressing "next" on the form.
#[derive(Debug, Clone, PartialEq)]
pub enum GapFillStep {
    Moved,
    Blocked,
    Completed(MissingSectionsSelection),
}

#[derive(Debug, Clone, Serialize)]
pub struct GapFillForm {
    missing: Vec<SectionKind>,
    step: usize,
    work_experience: Vec<WorkExperienceDraft>,
    projects: Vec<ProjectDraft>,
    certifications: Vec<String>,
}

impl GapFillForm {
    /// Starts on the first missing section with one blank entry per sub-form.
    pub fn new(missing: Vec<SectionKind>) -> Self {
        Self {
            missing,
            step: 0,
            work_experience: vec![WorkExperienceDraft {
                bullets: vec![String::new()],
                ..Default::default()
            }],
            projects: vec![ProjectDraft {
                title: String::new(),
                bullets: vec![String::new()],
            }],
            certifications: vec![String::new()],
        }
    }

    pub fn current_section(&self) -> Option<SectionKind> {
        self.missing.get(self.step).copied()
    }

    pub fn add_entry(&mut self, entry: GapEntry) -> Result<(), GapFillError> {
        self.require(entry.section())?;
        match entry {
            GapEntry::WorkExperience(d) => self.work_experience.push(d),
            GapEntry::Projects(d) => self.projects.push(d),
            GapEntry::Certifications(c) => self.certifications.push(c),
        }
        Ok(())
    }

    pub fn update_entry(&mut self, index: usize, entry: GapEntry) -> Result<(), GapFillError> {
        self.require(entry.section())?;
        match entry {
            GapEntry::WorkExperience(d) => *slot(&mut self.work_experience, index)? = d,
            GapEntry::Projects(d) => *slot(&mut self.projects, index)? = d,
            GapEntry::Certifications(c) => *slot(&mut self.certifications, index)? = c,
        }
        Ok(())
    }

    /// Removes an entry unless it is the only one left in its sub-form.
    /// Returns whether anything was removed.
    pub fn remove_entry(&mut self, section: SectionKind, index: usize) -> Result<bool, GapFillError> {
        self.require(section)?;
        match section {
            SectionKind::WorkExperience => remove_keeping_one(&mut self.work_experience, index),
            SectionKind::Projects => remove_keeping_one(&mut self.projects, index),
            SectionKind::Certifications => remove_keeping_one(&mut self.certifications, index),
        }
    }

    /// At least one entry in `section` has every required field.
    pub fn validate_section(&self, section: SectionKind) -> bool {
        match section {
            SectionKind::WorkExperience => self.work_experience.iter().any(WorkExperienceDraft::is_valid),
            SectionKind::Projects => self.projects.iter().any(ProjectDraft::is_valid),
            SectionKind::Certifications => self.certifications.iter().any(|c| !c.trim().is_empty()),
        }
    }

    pub fn validate_step(&self) -> bool {
        self.current_section()
            .is_some_and(|section| self.validate_section(section))
    }

    /// Moves to the next section, or on the last one emits the filtered
    /// selection. Blocked while the current section has no valid entry.
    pub fn next(&mut self) -> GapFillStep {
        if !self.validate_step() {
            return GapFillStep::Blocked;
        }
        if self.step + 1 < self.missing.len() {
            self.step += 1;
            GapFillStep::Moved
        } else {
            GapFillStep::Completed(self.selection())
        }
    }

    pub fn back(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        true
    }

    fn selection(&self) -> MissingSectionsSelection {
        let mut selection = MissingSectionsSelection::default();
        for section in &self.missing {
            match section {
                SectionKind::WorkExperience => {
                    selection.work_experience = self
                        .work_experience
                        .iter()
                        .filter(|d| d.is_valid())
                        .cloned()
                        .map(WorkExperienceDraft::into_entry)
                        .collect();
                }
                SectionKind::Projects => {
                    selection.projects = self
                        .projects
                        .iter()
                        .filter(|d| d.is_valid())
                        .cloned()
                        .map(ProjectDraft::into_entry)
                        .collect();
                }
                SectionKind::Certifications => {
                    selection.certifications = non_blank(self.certifications.clone());
                }
            }
        }
        selection
    }

    fn require(&self, section: SectionKind) -> Result<(), GapFillError> {
        if self.missing.contains(&section) {
            Ok(())
        } else {
            Err(GapFillError::SectionNotRequested(section))
        }
    }
}

/// Appends the collected entries to the resume's existing lists. Never
/// replaces or deduplicates.
pub fn merge_missing_sections(resume: &ResumeRecord, selection: MissingSectionsSelection) -> ResumeRecord {
    let mut merged = resume.clone();
    merged.work_experience.extend(selection.work_experience);
    merged.projects.extend(selection.projects);
    merged.certifications.extend(selection.certifications);
    merged
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter(|s| !s.trim().is_empty()).collect()
}

fn slot<T>(items: &mut [T], index: usize) -> Result<&mut T, GapFillError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(GapFillError::EntryOutOfRange { index, len })
}

fn remove_keeping_one<T>(items: &mut Vec<T>, index: usize) -> Result<bool, GapFillError> {
    if index >= items.len() {
        return Err(GapFillError::EntryOutOfRange {
            index,
            len: items.len(),
        });
    }
    if items.len() <= 1 {
        return Ok(false);
    }
    items.remove(index);
    Ok(true)
}
