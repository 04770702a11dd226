use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserCategory;

/// One target role collected by the intake wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub id: Uuid,
    pub job_description: String,
    pub target_role: String,
    pub linkedin_url: String,
    pub github_url: String,
    pub location: String,
}

impl RoleEntry {
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            job_description: String::new(),
            target_role: String::new(),
            linkedin_url: String::new(),
            github_url: String::new(),
            location: String::new(),
        }
    }

    /// Both fields the optimizer cannot run without are filled in.
    pub fn is_complete(&self) -> bool {
        !self.job_description.trim().is_empty() && !self.target_role.trim().is_empty()
    }
}

/// Partial update applied to the role currently being edited.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePatch {
    pub job_description: Option<String>,
    pub target_role: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub location: Option<String>,
}

impl RolePatch {
    pub fn apply_to(self, role: &mut RoleEntry) {
        if let Some(v) = self.job_description {
            role.job_description = v;
        }
        if let Some(v) = self.target_role {
            role.target_role = v;
        }
        if let Some(v) = self.linkedin_url {
            role.linkedin_url = v;
        }
        if let Some(v) = self.github_url {
            role.github_url = v;
        }
        if let Some(v) = self.location {
            role.location = v;
        }
    }
}

/// Immutable bundle handed from intake to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub resume_text: String,
    pub job_description: String,
    pub target_role: String,
    pub linkedin_url: String,
    pub github_url: String,
    pub location: String,
    pub user_category: UserCategory,
}
