use std::collections::{BTreeSet, HashMap};

/// Max keywords kept from a job description.
pub const MAX_KEYWORDS: usize = 25;

const TITLE_WEIGHT: f32 = 1.0;
const BODY_WEIGHT: f32 = 0.6;

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "an", "and", "any", "are", "as", "at", "be", "been", "both", "but",
    "by", "can", "do", "etc", "experience", "for", "from", "have", "in", "into", "is", "it",
    "its", "join", "like", "looking", "must", "need", "new", "nice", "of", "on", "or", "our",
    "over", "plus", "preferred", "required", "role", "should", "strong", "team", "that", "the",
    "their", "this", "to", "us", "we", "what", "who", "will", "with", "work", "years", "you",
    "your",
];

/// A JD keyword weighted by where and how often it appears.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedKeyword {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, body=0.6
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

/// Lowercased tokens of `text`. Keeps `+`, `#` and inner dots so that
/// "C++", "C#" and "Node.js" survive.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| t.chars().count() >= 2 && !t.chars().all(|c| c.is_ascii_digit()))
}

pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).collect()
}

/// Extracts the highest-weighted keywords from a job description. Words in
/// the first line or in `target_role` count as title words.
pub fn extract_keywords(job_description: &str, target_role: &str) -> Vec<WeightedKeyword> {
    let title_line = job_description.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let title_tokens: BTreeSet<String> = tokenize(title_line).chain(tokenize(target_role)).collect();

    let mut frequency: HashMap<String, u32> = HashMap::new();
    for token in tokenize(job_description).chain(tokenize(target_role)) {
        if STOPWORDS.contains(&token.as_str()) {
            continue;
        }
        *frequency.entry(token).or_default() += 1;
    }

    let mut keywords: Vec<WeightedKeyword> = frequency
        .into_iter()
        .map(|(keyword, frequency)| {
            let position_weight = if title_tokens.contains(&keyword) {
                TITLE_WEIGHT
            } else {
                BODY_WEIGHT
            };
            WeightedKeyword {
                weighted_score: frequency as f32 * position_weight,
                keyword,
                frequency,
                position_weight,
            }
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keywords.truncate(MAX_KEYWORDS);
    keywords
}
