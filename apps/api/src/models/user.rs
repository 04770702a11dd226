use serde::{Deserialize, Serialize};

/// Signed-in user as seen by the optimizer. `id` is the key the entitlement
/// service tracks quotas under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
}

/// Career stage chosen at intake. Drives the completeness thresholds and
/// which optional sections are shown in the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCategory {
    #[default]
    Fresher,
    Experienced,
}

impl UserCategory {
    /// Fewest work-experience entries a resume needs before the section
    /// counts as present.
    pub fn min_work_experience(self) -> usize {
        match self {
            UserCategory::Fresher => 1,
            UserCategory::Experienced => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserCategory::Fresher => "fresher",
            UserCategory::Experienced => "experienced",
        }
    }
}
