//! Optimization orchestrator: owns one run from submit to the final score.
//!
//! Idle → Scoring → Rewriting → ProjectReview → GapCheck → Finalizing → Done
//!
//! The run pauses in ProjectReview and (when sections are missing) in GapCheck
//! until the user reports back. Any collaborator failure drops the run and
//! returns to Idle with a user-facing message in `last_error`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::account::auth::AuthCapability;
use crate::account::entitlements::{Entitlement, EntitlementService};
use crate::errors::ServiceError;
use crate::gap_fill::form::{merge_missing_sections, GapFillError, GapFillForm, GapFillStep};
use crate::generation::bullets::BulletGenerator;
use crate::generation::rewriter::ResumeRewriter;
use crate::models::resume::ResumeRecord;
use crate::models::role::OptimizeRequest;
use crate::models::score::MatchScore;
use crate::models::user::UserIdentity;
use crate::optimization::completeness::{
    check_missing_sections, sections_present, DisplaySection, SectionKind,
};
use crate::review::analysis::ProjectAnalyzer;
use crate::review::reviewer::{ProjectReview, ReviewError};
use crate::scoring::{MatchScorer, ScoringContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Scoring,
    Rewriting,
    ProjectReview,
    GapCheck,
    Finalizing,
    Done,
}

/// Where a user action left the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    SignInRequired,
    UpgradeRequired { remaining: u32 },
    Failed { message: String },
    AwaitingProjectReview,
    AwaitingGapFill { missing: Vec<SectionKind> },
    Completed,
}

/// Result of pressing "next" on the gap-fill form.
#[derive(Debug, Clone, PartialEq)]
pub enum GapFillProgress {
    Blocked,
    Moved,
    Finished(RunOutcome),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("An optimization is already in progress")]
    RunInProgress,

    #[error("Expected phase {expected:?}, but the run is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    GapFill(#[from] GapFillError),
}

/// External services a run depends on, plus the bound on each call.
#[derive(Clone)]
pub struct Collaborators {
    pub rewriter: Arc<dyn ResumeRewriter>,
    pub scorer: Arc<dyn MatchScorer>,
    pub analyzer: Arc<dyn ProjectAnalyzer>,
    pub bullets: Arc<dyn BulletGenerator>,
    pub entitlements: Arc<dyn EntitlementService>,
    pub call_timeout: Duration,
}

/// Per-run state. Exists from a successful rewrite until the next submit or
/// a failure.
struct Run {
    user: UserIdentity,
    request: OptimizeRequest,
    before_score: MatchScore,
    resume: ResumeRecord,
    review: Option<ProjectReview>,
    gap_form: Option<GapFillForm>,
    missing_sections: Vec<SectionKind>,
    after_score: Option<MatchScore>,
    sections_present: Vec<DisplaySection>,
}

pub struct Orchestrator {
    services: Collaborators,
    phase: Phase,
    /// Mirrors `phase` for readers that cannot take the session lock.
    phase_tx: watch::Sender<Phase>,
    run: Option<Run>,
    last_error: Option<String>,
    entitlement: Option<Entitlement>,
}

/// Read-only view of the orchestrator for API responses.
#[derive(Debug, Serialize)]
pub struct OrchestratorView<'a> {
    pub phase: Phase,
    pub last_error: Option<&'a str>,
    pub entitlement: Option<Entitlement>,
    pub analyzer_backend: &'static str,
    pub request: Option<&'a OptimizeRequest>,
    pub before_score: Option<&'a MatchScore>,
    pub after_score: Option<&'a MatchScore>,
    pub resume: Option<&'a ResumeRecord>,
    pub project_review: Option<&'a ProjectReview>,
    pub gap_form: Option<&'a GapFillForm>,
    pub missing_sections: &'a [SectionKind],
    pub sections_present: &'a [DisplaySection],
}

impl Orchestrator {
    pub fn new(services: Collaborators) -> Self {
        Self {
            services,
            phase: Phase::Idle,
            phase_tx: watch::channel(Phase::Idle).0,
            run: None,
            last_error: None,
            entitlement: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn view(&self) -> OrchestratorView<'_> {
        let run = self.run.as_ref();
        OrchestratorView {
            phase: self.phase,
            last_error: self.last_error(),
            entitlement: self.entitlement,
            analyzer_backend: self.services.analyzer.backend(),
            request: run.map(|r| &r.request),
            before_score: run.map(|r| &r.before_score),
            after_score: run.and_then(|r| r.after_score.as_ref()),
            resume: run.map(|r| &r.resume),
            project_review: run.and_then(|r| r.review.as_ref()),
            gap_form: run.and_then(|r| r.gap_form.as_ref()),
            missing_sections: run.map(|r| r.missing_sections.as_slice()).unwrap_or(&[]),
            sections_present: run.map(|r| r.sections_present.as_slice()).unwrap_or(&[]),
        }
    }

    /// Re-reads the remaining quota for the signed-in user. `None` when
    /// nobody is signed in.
    pub async fn refresh_entitlement(&mut self, auth: &dyn AuthCapability) -> Option<Entitlement> {
        let user = auth.current_user()?;
        Some(self.refresh_for(&user.id).await)
    }

    async fn refresh_for(&mut self, user_id: &str) -> Entitlement {
        let entitlements = self.services.entitlements.clone();
        let entitlement = bounded(
            self.services.call_timeout,
            "entitlement check",
            entitlements.can_optimize(user_id),
        )
        .await
        .unwrap_or_else(|e| {
            warn!(user_id, error = %e, "entitlement check failed, treating as none remaining");
            Entitlement::UNKNOWN
        });
        self.entitlement = Some(entitlement);
        entitlement
    }

    /// Starts a new run. Allowed from Idle, or from Done (which discards the
    /// finished run). Pauses in ProjectReview on success.
    pub async fn submit(
        &mut self,
        auth: &dyn AuthCapability,
        request: OptimizeRequest,
    ) -> Result<RunOutcome, OrchestratorError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Done => {
                self.run = None;
                self.transition(Phase::Idle);
            }
            _ => return Err(OrchestratorError::RunInProgress),
        }
        self.last_error = None;

        let Some(user) = auth.current_user() else {
            info!("optimization requested while signed out");
            return Ok(RunOutcome::SignInRequired);
        };

        let entitlement = self.refresh_for(&user.id).await;
        if !entitlement.allowed {
            info!(user_id = %user.id, remaining = entitlement.remaining, "no optimizations remaining");
            return Ok(RunOutcome::UpgradeRequired {
                remaining: entitlement.remaining,
            });
        }

        let services = self.services.clone();
        let context = ScoringContext {
            job_description: &request.job_description,
            target_role: &request.target_role,
        };

        self.transition(Phase::Scoring);
        let before_score = match bounded(
            services.call_timeout,
            "match scoring",
            services.scorer.score_before(&request.resume_text, &context),
        )
        .await
        {
            Ok(score) => score,
            Err(e) => return Ok(self.fail("Optimization", e)),
        };
        info!(score = before_score.score, "scored resume before optimization");

        self.transition(Phase::Rewriting);
        let mut resume = match bounded(
            services.call_timeout,
            "resume rewrite",
            services.rewriter.optimize(&request),
        )
        .await
        {
            Ok(resume) => resume,
            Err(e) => return Ok(self.fail("Optimization", e)),
        };
        stamp_request_fields(&mut resume, &request);

        self.transition(Phase::ProjectReview);
        let analysis = match bounded(
            services.call_timeout,
            "project analysis",
            services
                .analyzer
                .analyze(&resume, &request.job_description, &request.target_role),
        )
        .await
        {
            Ok(analysis) => analysis,
            Err(e) => return Ok(self.fail("Project analysis", e)),
        };
        info!(
            backend = services.analyzer.backend(),
            total = analysis.summary.total_projects,
            unsuitable = analysis.summary.unsuitable_projects,
            suggestions = analysis.suggested_projects.len(),
            "project analysis complete"
        );

        let review = ProjectReview::new(
            analysis,
            resume.clone(),
            request.job_description.clone(),
            request.target_role.clone(),
        );
        self.run = Some(Run {
            user,
            request,
            before_score,
            resume,
            review: Some(review),
            gap_form: None,
            missing_sections: Vec::new(),
            after_score: None,
            sections_present: Vec::new(),
        });
        Ok(RunOutcome::AwaitingProjectReview)
    }

    pub fn review_mut(&mut self) -> Result<&mut ProjectReview, OrchestratorError> {
        self.expect_phase(Phase::ProjectReview)?;
        let actual = self.phase;
        self.run
            .as_mut()
            .and_then(|run| run.review.as_mut())
            .ok_or(OrchestratorError::WrongPhase {
                expected: Phase::ProjectReview,
                actual,
            })
    }

    /// Generates bullets for the manual project draft. The draft is
    /// validated first; an incomplete draft never reaches the generator.
    pub async fn generate_manual_bullets(&mut self) -> Result<RunOutcome, OrchestratorError> {
        let request = self.review_mut()?.bullet_request()?;
        let services = self.services.clone();

        match bounded(
            services.call_timeout,
            "bullet generation",
            services.bullets.generate_bullets(&request),
        )
        .await
        {
            Ok(bullets) => {
                info!(title = %request.title, count = bullets.len(), "manual project bullets generated");
                self.review_mut()?.set_manual_bullets(bullets);
                Ok(RunOutcome::AwaitingProjectReview)
            }
            Err(e) => Ok(self.fail("Bullet generation", e)),
        }
    }

    /// Applies the user's project selections and moves on to the gap check.
    pub async fn apply_project_review(&mut self) -> Result<RunOutcome, OrchestratorError> {
        let updated = self.review_mut()?.apply();
        info!(projects = updated.projects.len(), "project review applied");
        self.finish_review(updated).await
    }

    /// Keeps the projects as rewritten and moves on to the gap check.
    pub async fn dismiss_project_review(&mut self) -> Result<RunOutcome, OrchestratorError> {
        self.expect_phase(Phase::ProjectReview)?;
        let unchanged = self.run_ref()?.resume.clone();
        info!("project review dismissed");
        self.finish_review(unchanged).await
    }

    async fn finish_review(&mut self, resume: ResumeRecord) -> Result<RunOutcome, OrchestratorError> {
        let missing = {
            let run = self.run_mut()?;
            run.review = None;
            run.resume = resume;
            let missing = check_missing_sections(&run.resume, run.request.user_category);
            if !missing.is_empty() {
                run.missing_sections = missing.clone();
                run.gap_form = Some(GapFillForm::new(missing.clone()));
            }
            missing
        };
        self.transition(Phase::GapCheck);

        if missing.is_empty() {
            return self.finalize().await;
        }
        info!(?missing, "resume has missing sections, awaiting gap fill");
        Ok(RunOutcome::AwaitingGapFill { missing })
    }

    pub fn gap_form_mut(&mut self) -> Result<&mut GapFillForm, OrchestratorError> {
        self.expect_phase(Phase::GapCheck)?;
        let actual = self.phase;
        self.run
            .as_mut()
            .and_then(|run| run.gap_form.as_mut())
            .ok_or(OrchestratorError::WrongPhase {
                expected: Phase::GapCheck,
                actual,
            })
    }

    /// Moves the gap form forward. On the last section the valid entries
    /// are merged into the resume and the run finalizes.
    pub async fn advance_gap_fill(&mut self) -> Result<GapFillProgress, OrchestratorError> {
        let selection = match self.gap_form_mut()?.next() {
            GapFillStep::Blocked => return Ok(GapFillProgress::Blocked),
            GapFillStep::Moved => return Ok(GapFillProgress::Moved),
            GapFillStep::Completed(selection) => selection,
        };

        {
            let run = self.run_mut()?;
            info!(
                work_experience = selection.work_experience.len(),
                projects = selection.projects.len(),
                certifications = selection.certifications.len(),
                "merging gap-fill entries"
            );
            run.resume = merge_missing_sections(&run.resume, selection);
            run.gap_form = None;
        }
        Ok(GapFillProgress::Finished(self.finalize().await?))
    }

    pub fn retreat_gap_fill(&mut self) -> Result<bool, OrchestratorError> {
        Ok(self.gap_form_mut()?.back())
    }

    /// After-score, display sections, quota consumption, quota refresh.
    async fn finalize(&mut self) -> Result<RunOutcome, OrchestratorError> {
        self.transition(Phase::Finalizing);
        let services = self.services.clone();

        let (serialized, request, user_id, present) = {
            let run = self.run_ref()?;
            let serialized = serde_json::to_string(&run.resume)
                .map_err(|e| ServiceError::InvalidResponse(format!("Failed to serialize resume: {e}")));
            (
                serialized,
                run.request.clone(),
                run.user.id.clone(),
                sections_present(&run.resume, run.request.user_category),
            )
        };
        let serialized = match serialized {
            Ok(s) => s,
            Err(e) => return Ok(self.fail("Final scoring", e)),
        };

        let context = ScoringContext {
            job_description: &request.job_description,
            target_role: &request.target_role,
        };
        let after_score = match bounded(
            services.call_timeout,
            "match scoring",
            services.scorer.score_after(&serialized, &context),
        )
        .await
        {
            Ok(score) => score,
            Err(e) => return Ok(self.fail("Final scoring", e)),
        };

        if let Err(e) = bounded(
            services.call_timeout,
            "entitlement update",
            services.entitlements.use_optimization(&user_id),
        )
        .await
        {
            return Ok(self.fail("Recording the optimization", e));
        }
        self.refresh_for(&user_id).await;

        info!(
            before = self.run_ref()?.before_score.score,
            after = after_score.score,
            "optimization complete"
        );
        let run = self.run_mut()?;
        run.after_score = Some(after_score);
        run.sections_present = present;
        self.transition(Phase::Done);
        Ok(RunOutcome::Completed)
    }

    fn fail(&mut self, action: &str, error: ServiceError) -> RunOutcome {
        warn!(phase = ?self.phase, error = %error, "{action} failed, resetting run");
        let message = error.user_message(action);
        self.run = None;
        self.last_error = Some(message.clone());
        self.transition(Phase::Idle);
        RunOutcome::Failed { message }
    }

    fn transition(&mut self, next: Phase) {
        info!(from = ?self.phase, to = ?next, "orchestrator phase transition");
        self.phase = next;
        self.phase_tx.send_replace(next);
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), OrchestratorError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(OrchestratorError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn run_ref(&self) -> Result<&Run, OrchestratorError> {
        self.run.as_ref().ok_or(OrchestratorError::WrongPhase {
            expected: Phase::ProjectReview,
            actual: self.phase,
        })
    }

    fn run_mut(&mut self) -> Result<&mut Run, OrchestratorError> {
        let actual = self.phase;
        self.run.as_mut().ok_or(OrchestratorError::WrongPhase {
            expected: Phase::ProjectReview,
            actual,
        })
    }
}

/// Contact fields the user typed at intake win over whatever the rewriter
/// produced.
fn stamp_request_fields(resume: &mut ResumeRecord, request: &OptimizeRequest) {
    if !request.target_role.trim().is_empty() {
        resume.target_role = request.target_role.clone();
    }
    if !request.linkedin_url.trim().is_empty() {
        resume.linkedin = request.linkedin_url.clone();
    }
    if !request.github_url.trim().is_empty() {
        resume.github = request.github_url.clone();
    }
}

async fn bounded<T, F>(limit: Duration, operation: &'static str, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout {
            operation,
            seconds: limit.as_secs(),
        }),
    }
}
