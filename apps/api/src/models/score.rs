use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 85 => ScoreGrade::Excellent,
            s if s >= 70 => ScoreGrade::Good,
            s if s >= 50 => ScoreGrade::Fair,
            _ => ScoreGrade::Poor,
        }
    }
}

/// Fit between a resume and a job description. Computed once before and
/// once after an optimization run; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: u32, // 0 – 100
    pub grade: ScoreGrade,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendation: String,
    pub scorer_backend: String,
}
