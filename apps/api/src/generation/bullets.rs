//! Bullet generation for projects the user adds by hand during review.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::ServiceError;
use crate::generation::prompts::PROJECT_BULLETS_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{BULLET_STYLE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::review::reviewer::BulletRequest;

#[async_trait]
pub trait BulletGenerator: Send + Sync {
    async fn generate_bullets(&self, request: &BulletRequest) -> Result<Vec<String>, ServiceError>;
}

pub struct LlmBulletGenerator(pub LlmClient);

#[async_trait]
impl BulletGenerator for LlmBulletGenerator {
    async fn generate_bullets(&self, request: &BulletRequest) -> Result<Vec<String>, ServiceError> {
        let prompt = PROJECT_BULLETS_PROMPT_TEMPLATE
            .replace("{bullet_style_instruction}", BULLET_STYLE_INSTRUCTION)
            .replace("{title}", &request.title)
            .replace("{tech_stack}", &request.tech_stack.join(", "))
            .replace("{target_role}", &request.target_role)
            .replace("{job_description}", &request.job_description);

        let raw: Vec<String> = self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        let bullets = clean_bullets(raw);
        if bullets.is_empty() {
            warn!(title = %request.title, "bullet generator returned no usable bullets");
            return Err(ServiceError::InvalidResponse(
                "no bullet points were generated".to_string(),
            ));
        }
        Ok(bullets)
    }
}

/// Drops blank bullets and any leading list markers the model added.
fn clean_bullets(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|b| {
            b.trim()
                .trim_start_matches(&['-', '•', '*'][..])
                .trim()
                .to_string()
        })
        .filter(|b| !b.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_bullets_strips_markers_and_blanks() {
        let cleaned = clean_bullets(vec![
            "- Built a token-bucket limiter".to_string(),
            "   ".to_string(),
            "• Cut p99 latency by 30%".to_string(),
            "Deployed on Kubernetes".to_string(),
        ]);
        assert_eq!(
            cleaned,
            vec![
                "Built a token-bucket limiter",
                "Cut p99 latency by 30%",
                "Deployed on Kubernetes"
            ]
        );
    }
}
