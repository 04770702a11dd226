//! Section checks on a finished resume: which gap categories are missing and
//! which sections are present for the result view.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;
use crate::models::user::UserCategory;

/// Resume sections the gap-filling step can ask the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    WorkExperience,
    Projects,
    Certifications,
}

/// Sections displayed with the optimized resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySection {
    Summary,
    WorkExperience,
    Projects,
    Skills,
    Certifications,
    Education,
    Achievements,
    ExtracurricularActivities,
    LanguagesKnown,
    PersonalDetails,
}

/// Returns the gap categories `resume` fails for `category`, in the fixed
/// order work experience, projects, certifications.
///
/// | section | fresher | experienced |
/// |---|---|---|
/// | work experience | ≥ 1 | ≥ 2 |
/// | projects | ≥ 1 | ≥ 1 |
/// | certifications | ≥ 1 | ≥ 1 |
pub fn check_missing_sections(resume: &ResumeRecord, category: UserCategory) -> Vec<SectionKind> {
    let mut missing = Vec::new();
    if resume.work_experience.len() < category.min_work_experience() {
        missing.push(SectionKind::WorkExperience);
    }
    if resume.projects.is_empty() {
        missing.push(SectionKind::Projects);
    }
    if resume.certifications.is_empty() {
        missing.push(SectionKind::Certifications);
    }
    missing
}

/// Lists the non-empty sections of `resume`. Freshers additionally get the
/// achievements / activities / languages / personal details block.
pub fn sections_present(resume: &ResumeRecord, category: UserCategory) -> Vec<DisplaySection> {
    let checks = [
        (DisplaySection::Summary, !resume.summary.trim().is_empty()),
        (DisplaySection::WorkExperience, !resume.work_experience.is_empty()),
        (DisplaySection::Projects, !resume.projects.is_empty()),
        (DisplaySection::Skills, !resume.skills.is_empty()),
        (DisplaySection::Certifications, !resume.certifications.is_empty()),
        (DisplaySection::Education, !resume.education.is_empty()),
    ];
    let mut sections: Vec<DisplaySection> = checks
        .into_iter()
        .filter_map(|(section, present)| present.then_some(section))
        .collect();

    if category == UserCategory::Fresher {
        let fresher_checks = [
            (DisplaySection::Achievements, !resume.achievements.is_empty()),
            (
                DisplaySection::ExtracurricularActivities,
                !resume.extracurricular_activities.is_empty(),
            ),
            (DisplaySection::LanguagesKnown, !resume.languages_known.is_empty()),
            (
                DisplaySection::PersonalDetails,
                resume
                    .personal_details
                    .as_deref()
                    .is_some_and(|d| !d.trim().is_empty()),
            ),
        ];
        sections.extend(
            fresher_checks
                .into_iter()
                .filter_map(|(section, present)| present.then_some(section)),
        );
    }
    sections
}
