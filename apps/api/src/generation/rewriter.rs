//! Resume rewriting: the external "optimize" call that turns raw resume text
//! into a structured, job-targeted `ResumeRecord`.

use async_trait::async_trait;
use tracing::info;

use crate::errors::ServiceError;
use crate::generation::prompts::{EXPERIENCED_GUIDANCE, FRESHER_GUIDANCE, REWRITE_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{BULLET_STYLE_INSTRUCTION, JSON_ONLY_SYSTEM, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeRecord;
use crate::models::role::OptimizeRequest;
use crate::models::user::UserCategory;

#[async_trait]
pub trait ResumeRewriter: Send + Sync {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<ResumeRecord, ServiceError>;
}

pub struct LlmResumeRewriter(pub LlmClient);

#[async_trait]
impl ResumeRewriter for LlmResumeRewriter {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<ResumeRecord, ServiceError> {
        let prompt = build_rewrite_prompt(request);
        let resume: ResumeRecord = self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?;

        if resume.name.trim().is_empty() && resume.summary.trim().is_empty() {
            return Err(ServiceError::InvalidResponse(
                "rewrite returned neither a name nor a summary".to_string(),
            ));
        }

        info!(
            work_entries = resume.work_experience.len(),
            projects = resume.projects.len(),
            certifications = resume.certifications.len(),
            "resume rewritten"
        );
        Ok(resume)
    }
}

fn build_rewrite_prompt(request: &OptimizeRequest) -> String {
    let guidance = match request.user_category {
        UserCategory::Fresher => FRESHER_GUIDANCE,
        UserCategory::Experienced => EXPERIENCED_GUIDANCE,
    };
    REWRITE_PROMPT_TEMPLATE
        .replace("{truthfulness_instruction}", TRUTHFULNESS_INSTRUCTION)
        .replace("{bullet_style_instruction}", BULLET_STYLE_INSTRUCTION)
        .replace("{user_category}", request.user_category.as_str())
        .replace("{category_guidance}", guidance)
        .replace("{target_role}", or_none(&request.target_role))
        .replace("{linkedin_url}", or_none(&request.linkedin_url))
        .replace("{github_url}", or_none(&request.github_url))
        .replace("{job_description}", &request.job_description)
        .replace("{resume_text}", &request.resume_text)
}

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not provided)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(category: UserCategory) -> OptimizeRequest {
        OptimizeRequest {
            resume_text: "John Doe, Engineer".to_string(),
            job_description: "Senior Backend Engineer, Go, Kubernetes".to_string(),
            target_role: "Backend Engineer".to_string(),
            linkedin_url: String::new(),
            github_url: "https://github.com/jdoe".to_string(),
            location: String::new(),
            user_category: category,
        }
    }

    #[test]
    fn test_prompt_contains_request_fields() {
        let prompt = build_rewrite_prompt(&request(UserCategory::Experienced));
        assert!(prompt.contains("John Doe, Engineer"));
        assert!(prompt.contains("Senior Backend Engineer, Go, Kubernetes"));
        assert!(prompt.contains("CANDIDATE CATEGORY: experienced"));
        assert!(prompt.contains(EXPERIENCED_GUIDANCE));
        assert!(prompt.contains("GITHUB: https://github.com/jdoe"));
        assert!(prompt.contains("LINKEDIN: (not provided)"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_fresher_guidance_selected() {
        let prompt = build_rewrite_prompt(&request(UserCategory::Fresher));
        assert!(prompt.contains(FRESHER_GUIDANCE));
        assert!(!prompt.contains(EXPERIENCED_GUIDANCE));
    }
}
