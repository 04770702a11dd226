//! Match scoring: pluggable scorer that rates a resume against the target job.
//!
//! Default: `KeywordMatchScorer` (pure Rust, deterministic, no network call).
//! The orchestrator only sees `Arc<dyn MatchScorer>`, so an LLM-backed or
//! remote scorer can be swapped in without touching the pipeline.

pub mod keywords;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::score::{MatchScore, ScoreGrade};
use crate::scoring::keywords::{extract_keywords, token_set, WeightedKeyword};

/// Job context every score is measured against.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    pub job_description: &'a str,
    pub target_role: &'a str,
}

#[async_trait]
pub trait MatchScorer: Send + Sync {
    /// Scores the raw resume text submitted at intake.
    async fn score_before(
        &self,
        resume_text: &str,
        context: &ScoringContext<'_>,
    ) -> Result<MatchScore, ServiceError>;

    /// Scores the optimized resume, serialized as JSON.
    async fn score_after(
        &self,
        serialized_resume: &str,
        context: &ScoringContext<'_>,
    ) -> Result<MatchScore, ServiceError>;
}

/// Keyword-coverage scorer.
///
/// Algorithm:
/// 1. Extract weighted keywords from the JD (title words 1.0, body 0.6, × frequency)
/// 2. A keyword matches when it appears as a token of the resume text
/// 3. score = Σ(matched weighted_score) / Σ(weighted_score) × 100
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score_before(
        &self,
        resume_text: &str,
        context: &ScoringContext<'_>,
    ) -> Result<MatchScore, ServiceError> {
        Ok(compute_keyword_match(resume_text, context))
    }

    async fn score_after(
        &self,
        serialized_resume: &str,
        context: &ScoringContext<'_>,
    ) -> Result<MatchScore, ServiceError> {
        Ok(compute_keyword_match(serialized_resume, context))
    }
}

fn compute_keyword_match(text: &str, context: &ScoringContext<'_>) -> MatchScore {
    let keywords = extract_keywords(context.job_description, context.target_role);
    if keywords.is_empty() {
        return MatchScore {
            score: 0,
            grade: ScoreGrade::Poor,
            matched_keywords: vec![],
            missing_keywords: vec![],
            recommendation: "No keywords found in the job description, cannot score the match."
                .to_string(),
            scorer_backend: "keyword".to_string(),
        };
    }

    let tokens = token_set(text);
    let (matched, missing): (Vec<&WeightedKeyword>, Vec<&WeightedKeyword>) =
        keywords.iter().partition(|k| tokens.contains(&k.keyword));

    let total: f32 = keywords.iter().map(|k| k.weighted_score).sum();
    let hit: f32 = matched.iter().map(|k| k.weighted_score).sum();
    let score = if total > 0.0 {
        ((hit / total) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    let missing_keywords: Vec<String> = missing.iter().map(|k| k.keyword.clone()).collect();
    MatchScore {
        score,
        grade: ScoreGrade::from_score(score),
        matched_keywords: matched.iter().map(|k| k.keyword.clone()).collect(),
        recommendation: build_recommendation(score, &missing_keywords),
        missing_keywords,
        scorer_backend: "keyword".to_string(),
    }
}

fn build_recommendation(score: u32, missing: &[String]) -> String {
    let top: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if score >= 80 {
        "Strong match. Your resume covers the key job requirements.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate match ({score}/100). Consider highlighting: {}.",
            top.join(", ")
        )
    } else {
        format!(
            "Low match ({score}/100). Missing keywords: {}. Tailor your experience and projects to the role.",
            top.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Senior Backend Engineer\nBuild Go services on Kubernetes. Go and gRPC required.";

    fn ctx() -> ScoringContext<'static> {
        ScoringContext {
            job_description: JD,
            target_role: "Backend Engineer",
        }
    }

    #[tokio::test]
    async fn test_full_coverage_scores_100() {
        let text = "Senior backend engineer building Go services and gRPC APIs on Kubernetes; build tooling";
        let score = KeywordMatchScorer.score_before(text, &ctx()).await.unwrap();
        assert_eq!(score.score, 100);
        assert_eq!(score.grade, ScoreGrade::Excellent);
        assert!(score.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_unrelated_resume_scores_low() {
        let score = KeywordMatchScorer
            .score_before("Pastry chef with ten years in French bakeries", &ctx())
            .await
            .unwrap();
        assert_eq!(score.score, 0);
        assert!(score.recommendation.starts_with("Low match"));
        assert!(score.missing_keywords.contains(&"go".to_string()));
    }

    #[tokio::test]
    async fn test_after_score_reads_serialized_resume() {
        let serialized = r#"{"summary":"Backend engineer","skills":[{"category":"Languages","items":["Go","gRPC"]}]}"#;
        let score = KeywordMatchScorer.score_after(serialized, &ctx()).await.unwrap();
        assert!(score.matched_keywords.contains(&"go".to_string()));
        assert!(score.matched_keywords.contains(&"grpc".to_string()));
        assert!(score.score > 0 && score.score < 100);
    }

    #[tokio::test]
    async fn test_empty_job_description_scores_zero() {
        let context = ScoringContext {
            job_description: "",
            target_role: "",
        };
        let score = KeywordMatchScorer.score_before("anything", &context).await.unwrap();
        assert_eq!(score.score, 0);
        assert_eq!(score.scorer_backend, "keyword");
    }

    #[test]
    fn test_recommendation_moderate_lists_keywords() {
        let rec = build_recommendation(65, &["kafka".to_string()]);
        assert!(rec.contains("kafka"));
        assert!(rec.contains("65"));
    }

    #[test]
    fn test_recommendation_strong() {
        assert!(build_recommendation(90, &[]).contains("Strong match"));
    }
}
