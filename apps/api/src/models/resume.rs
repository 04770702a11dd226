use serde::{Deserialize, Serialize};

/// Hard ceiling on projects shown in an optimized resume.
pub const MAX_PROJECTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub bullets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<String>,
}

/// Structured resume as returned by the rewrite service and threaded through
/// every later phase of an optimization run.
///
/// Every field defaults so that a partial rewrite still deserializes; the gap
/// check decides afterwards what is actually missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
    pub target_role: String,
    pub summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub skills: Vec<SkillGroup>,
    pub certifications: Vec<String>,
    pub education: Vec<Education>,
    pub achievements: Vec<String>,
    pub extracurricular_activities: Vec<String>,
    pub languages_known: Vec<String>,
    pub personal_details: Option<String>,
}

impl ResumeRecord {
    /// Returns a copy of this resume with its project list replaced.
    pub fn with_projects(&self, projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..self.clone()
        }
    }
}
