//! Fake collaborators and fixtures shared by orchestrator and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::account::auth::RequestIdentity;
use crate::account::entitlements::{Entitlement, EntitlementService};
use crate::errors::ServiceError;
use crate::generation::bullets::BulletGenerator;
use crate::generation::rewriter::ResumeRewriter;
use crate::llm_client::LlmError;
use crate::models::resume::{Education, Project, ResumeRecord, SkillGroup, WorkExperience};
use crate::models::role::OptimizeRequest;
use crate::models::score::{MatchScore, ScoreGrade};
use crate::models::user::{UserCategory, UserIdentity};
use crate::optimization::orchestrator::Collaborators;
use crate::review::analysis::{
    ProjectAnalyzer, ProjectSuitabilityResult, ProjectVerdict, SuggestedProject, SuitabilitySummary,
};
use crate::review::reviewer::BulletRequest;
use crate::scoring::{MatchScorer, ScoringContext};

fn unavailable(message: &str) -> ServiceError {
    ServiceError::Llm(LlmError::Api {
        status: 503,
        message: message.to_string(),
    })
}

pub fn signed_in() -> RequestIdentity {
    RequestIdentity(Some(UserIdentity {
        id: "user-1".to_string(),
        email: Some("john@example.com".to_string()),
    }))
}

pub fn signed_out() -> RequestIdentity {
    RequestIdentity(None)
}

pub fn sample_request() -> OptimizeRequest {
    OptimizeRequest {
        resume_text: "John Doe, Engineer".to_string(),
        job_description: "Senior Backend Engineer, Go, Kubernetes".to_string(),
        target_role: "Backend Engineer".to_string(),
        linkedin_url: "https://linkedin.com/in/jdoe".to_string(),
        github_url: "https://github.com/jdoe".to_string(),
        location: "Berlin".to_string(),
        user_category: UserCategory::Experienced,
    }
}

fn project(title: &str) -> Project {
    Project {
        title: title.to_string(),
        bullets: vec![format!("Built {title}")],
        github_url: None,
    }
}

/// Complete resume for an experienced candidate: 2 jobs, 2 projects, 1 certification.
pub fn complete_resume() -> ResumeRecord {
    ResumeRecord {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        summary: "Backend engineer working in Go.".to_string(),
        work_experience: vec![
            WorkExperience {
                role: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                duration: "2021 - Present".to_string(),
                bullets: vec!["Ran Go services on Kubernetes".to_string()],
            },
            WorkExperience {
                role: "Software Engineer".to_string(),
                company: "Globex".to_string(),
                duration: "2018 - 2021".to_string(),
                bullets: vec!["Built internal APIs".to_string()],
            },
        ],
        projects: vec![project("Todo App"), project("Payments API")],
        skills: vec![SkillGroup {
            category: "Languages".to_string(),
            items: vec!["Go".to_string(), "Rust".to_string()],
        }],
        certifications: vec!["CKA".to_string()],
        education: vec![Education {
            degree: "BSc Computer Science".to_string(),
            school: "TU Berlin".to_string(),
            year: "2018".to_string(),
            cgpa: None,
        }],
        ..Default::default()
    }
}

/// "Todo App" unsuitable (replacement: "Distributed Cache"), "Payments API"
/// suitable, plus one extra suggestion "Rate Limiter".
pub fn todo_app_analysis() -> ProjectSuitabilityResult {
    ProjectSuitabilityResult {
        project_analysis: vec![
            ProjectVerdict {
                title: "Todo App".to_string(),
                suitable: false,
                reason: Some("Scored 40: too basic for a senior backend role".to_string()),
                replacement_suggestion: Some(SuggestedProject {
                    title: "Distributed Cache".to_string(),
                    github_url: "https://github.com/example/distributed-cache".to_string(),
                    bullet_points: vec!["Implemented consistent hashing in Go".to_string()],
                }),
            },
            ProjectVerdict {
                title: "Payments API".to_string(),
                suitable: true,
                reason: None,
                replacement_suggestion: None,
            },
        ],
        summary: SuitabilitySummary::default(),
        suggested_projects: vec![SuggestedProject {
            title: "Rate Limiter".to_string(),
            github_url: "https://github.com/example/rate-limiter".to_string(),
            bullet_points: vec!["Built a token-bucket limiter".to_string()],
        }],
    }
    .with_recomputed_summary()
}

pub struct FakeRewriter {
    pub resume: ResumeRecord,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<OptimizeRequest>>,
}

impl FakeRewriter {
    pub fn returning(resume: ResumeRecord) -> Self {
        Self {
            resume,
            fail: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ResumeRewriter for FakeRewriter {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<ResumeRecord, ServiceError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(unavailable("rewrite backend down"));
        }
        Ok(self.resume.clone())
    }
}

/// Returns `before` for the raw text and `after` for the serialized resume.
pub struct FakeScorer {
    pub before: u32,
    pub after: u32,
    pub after_inputs: Mutex<Vec<String>>,
}

impl FakeScorer {
    pub fn new(before: u32, after: u32) -> Self {
        Self {
            before,
            after,
            after_inputs: Mutex::new(Vec::new()),
        }
    }
}

fn fake_score(score: u32) -> MatchScore {
    MatchScore {
        score,
        grade: ScoreGrade::from_score(score),
        matched_keywords: vec![],
        missing_keywords: vec![],
        recommendation: String::new(),
        scorer_backend: "fake".to_string(),
    }
}

#[async_trait]
impl MatchScorer for FakeScorer {
    async fn score_before(
        &self,
        _resume_text: &str,
        _context: &ScoringContext<'_>,
    ) -> Result<MatchScore, ServiceError> {
        Ok(fake_score(self.before))
    }

    async fn score_after(
        &self,
        serialized_resume: &str,
        _context: &ScoringContext<'_>,
    ) -> Result<MatchScore, ServiceError> {
        self.after_inputs
            .lock()
            .unwrap()
            .push(serialized_resume.to_string());
        Ok(fake_score(self.after))
    }
}

pub struct FakeAnalyzer {
    pub result: ProjectSuitabilityResult,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeAnalyzer {
    pub fn returning(result: ProjectSuitabilityResult) -> Self {
        Self {
            result,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProjectAnalyzer for FakeAnalyzer {
    async fn analyze(
        &self,
        _resume: &ResumeRecord,
        _job_description: &str,
        _target_role: &str,
    ) -> Result<ProjectSuitabilityResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::InvalidResponse("garbled analysis".to_string()));
        }
        Ok(self.result.clone())
    }

    fn backend(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeBullets {
    pub bullets: Vec<String>,
    pub fail: bool,
    pub requests: Mutex<Vec<BulletRequest>>,
}

impl FakeBullets {
    pub fn returning(bullets: &[&str]) -> Self {
        Self {
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BulletGenerator for FakeBullets {
    async fn generate_bullets(&self, request: &BulletRequest) -> Result<Vec<String>, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(unavailable("generator down"));
        }
        Ok(self.bullets.clone())
    }
}

/// Fixed answer for `can_optimize`; counts `use_optimization` calls.
pub struct FakeEntitlements {
    pub answer: Result<Entitlement, ()>,
    pub used: AtomicUsize,
}

impl FakeEntitlements {
    pub fn allowing(remaining: u32) -> Self {
        Self {
            answer: Ok(Entitlement {
                allowed: remaining > 0,
                remaining,
            }),
            used: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(()),
            used: AtomicUsize::new(0),
        }
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitlementService for FakeEntitlements {
    async fn can_optimize(&self, _user_id: &str) -> Result<Entitlement, ServiceError> {
        self.answer
            .map_err(|_| unavailable("billing down"))
    }

    async fn use_optimization(&self, _user_id: &str) -> Result<(), ServiceError> {
        self.used.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handles to every fake, so tests can inspect calls after the run.
pub struct Fakes {
    pub rewriter: Arc<FakeRewriter>,
    pub scorer: Arc<FakeScorer>,
    pub analyzer: Arc<FakeAnalyzer>,
    pub bullets: Arc<FakeBullets>,
    pub entitlements: Arc<FakeEntitlements>,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            rewriter: Arc::new(FakeRewriter::returning(complete_resume())),
            scorer: Arc::new(FakeScorer::new(42, 87)),
            analyzer: Arc::new(FakeAnalyzer::returning(todo_app_analysis())),
            bullets: Arc::new(FakeBullets::returning(&[
                "Built a Raft-based KV store",
                "Benchmarked at 50k ops/s",
            ])),
            entitlements: Arc::new(FakeEntitlements::allowing(3)),
        }
    }
}

impl Fakes {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            rewriter: self.rewriter.clone(),
            scorer: self.scorer.clone(),
            analyzer: self.analyzer.clone(),
            bullets: self.bullets.clone(),
            entitlements: self.entitlements.clone(),
            call_timeout: Duration::from_secs(90),
        }
    }
}
