//! Intake wizard: five-step collection of resume text, target roles and user
//! category. Pure state transitions; no I/O.

use serde::Serialize;
use thiserror::Error;

use crate::models::role::{OptimizeRequest, RoleEntry, RolePatch};
use crate::models::user::UserCategory;

#[derive(Debug, Error, PartialEq)]
pub enum IntakeError {
    #[error("Role index {index} is out of range ({len} roles)")]
    RoleOutOfRange { index: usize, len: usize },

    #[error("Please provide your resume and at least one target role before optimizing")]
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Upload,
    JobDescription,
    RoleDetails,
    RoleManagement,
    Review,
}

impl IntakeStep {
    pub const COUNT: usize = 5;

    fn next(self) -> Option<Self> {
        match self {
            IntakeStep::Upload => Some(IntakeStep::JobDescription),
            IntakeStep::JobDescription => Some(IntakeStep::RoleDetails),
            IntakeStep::RoleDetails => Some(IntakeStep::RoleManagement),
            IntakeStep::RoleManagement => Some(IntakeStep::Review),
            IntakeStep::Review => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            IntakeStep::Upload => None,
            IntakeStep::JobDescription => Some(IntakeStep::Upload),
            IntakeStep::RoleDetails => Some(IntakeStep::JobDescription),
            IntakeStep::RoleManagement => Some(IntakeStep::RoleDetails),
            IntakeStep::Review => Some(IntakeStep::RoleManagement),
        }
    }

    /// 1-based position for progress display.
    pub fn number(self) -> usize {
        self as usize + 1
    }
}

/// Where the wizard is and which role the role steps edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub step: IntakeStep,
    pub current_role: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeWizard {
    #[serde(rename = "navigation")]
    nav: NavigationState,
    resume_text: String,
    user_category: UserCategory,
    roles: Vec<RoleEntry>,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self {
            nav: NavigationState {
                step: IntakeStep::Upload,
                current_role: 0,
            },
            resume_text: String::new(),
            user_category: UserCategory::default(),
            roles: Vec::new(),
        }
    }

    pub fn navigation(&self) -> NavigationState {
        self.nav
    }

    pub fn roles(&self) -> &[RoleEntry] {
        &self.roles
    }

    pub fn set_resume_text(&mut self, text: impl Into<String>) {
        self.resume_text = text.into();
    }

    pub fn set_user_category(&mut self, category: UserCategory) {
        self.user_category = category;
    }

    /// Applies `patch` to the role selected by the navigation state. A no-op
    /// before the first role exists.
    pub fn update_current_role(&mut self, patch: RolePatch) {
        if let Some(role) = self.roles.get_mut(self.nav.current_role) {
            patch.apply_to(role);
        }
    }

    pub fn current_role(&self) -> Option<&RoleEntry> {
        self.roles.get(self.nav.current_role)
    }

    /// Whether `step` is satisfied by the data collected so far.
    pub fn validate_step(&self, step: IntakeStep) -> bool {
        match step {
            IntakeStep::Upload => !self.resume_text.trim().is_empty(),
            IntakeStep::JobDescription => self
                .current_role()
                .is_some_and(|r| !r.job_description.trim().is_empty()),
            IntakeStep::RoleDetails => self
                .current_role()
                .is_some_and(|r| !r.target_role.trim().is_empty()),
            IntakeStep::RoleManagement => {
                !self.roles.is_empty() && self.roles.iter().all(RoleEntry::is_complete)
            }
            IntakeStep::Review => !self.resume_text.trim().is_empty() && !self.roles.is_empty(),
        }
    }

    /// Moves one step forward if the current step validates. Returns whether
    /// the wizard moved.
    pub fn advance(&mut self) -> bool {
        if !self.validate_step(self.nav.step) {
            return false;
        }
        let Some(next) = self.nav.step.next() else {
            return false;
        };
        self.nav.step = next;
        self.ensure_first_role();
        true
    }

    pub fn go_back(&mut self) -> bool {
        match self.nav.step.prev() {
            Some(prev) => {
                self.nav.step = prev;
                true
            }
            None => false,
        }
    }

    /// Appends a blank role and jumps to its job description step.
    pub fn add_role(&mut self) {
        self.roles.push(RoleEntry::blank());
        self.nav = NavigationState {
            step: IntakeStep::JobDescription,
            current_role: self.roles.len() - 1,
        };
    }

    pub fn edit_role(&mut self, index: usize) -> Result<(), IntakeError> {
        self.check_index(index)?;
        self.nav = NavigationState {
            step: IntakeStep::JobDescription,
            current_role: index,
        };
        Ok(())
    }

    /// Removes a role unless it is the last one. Returns whether anything was
    /// removed.
    pub fn delete_role(&mut self, index: usize) -> Result<bool, IntakeError> {
        self.check_index(index)?;
        if self.roles.len() <= 1 {
            return Ok(false);
        }
        self.roles.remove(index);
        self.nav.current_role = 0;
        Ok(true)
    }

    /// Packages the resume and the first role for the orchestrator. Only
    /// accepted from the review step with every role complete.
    pub fn submit(&self) -> Result<OptimizeRequest, IntakeError> {
        if self.nav.step != IntakeStep::Review
            || !self.validate_step(IntakeStep::RoleManagement)
            || !self.validate_step(IntakeStep::Review)
        {
            return Err(IntakeError::Incomplete);
        }
        let primary = self.roles.first().ok_or(IntakeError::Incomplete)?;
        Ok(OptimizeRequest {
            resume_text: self.resume_text.clone(),
            job_description: primary.job_description.clone(),
            target_role: primary.target_role.clone(),
            linkedin_url: primary.linkedin_url.clone(),
            github_url: primary.github_url.clone(),
            location: primary.location.clone(),
            user_category: self.user_category,
        })
    }

    fn ensure_first_role(&mut self) {
        if self.roles.is_empty() && self.nav.step >= IntakeStep::JobDescription {
            self.roles.push(RoleEntry::blank());
            self.nav.current_role = 0;
        }
    }

    fn check_index(&self, index: usize) -> Result<(), IntakeError> {
        if index < self.roles.len() {
            Ok(())
        } else {
            Err(IntakeError::RoleOutOfRange {
                index,
                len: self.roles.len(),
            })
        }
    }
}
