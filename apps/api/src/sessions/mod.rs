//! In-memory optimization sessions, one per user flow. Nothing here is
//! persisted; a restart drops every session.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::{watch, Mutex, OwnedMutexGuard, RwLock};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::wizard::{IntakeStep, IntakeWizard};
use crate::optimization::orchestrator::{Collaborators, Orchestrator, OrchestratorView, Phase};

/// Idle time after which a session is evicted.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Refreshed every time a request locks the session.
    pub last_active: Instant,
    pub intake: IntakeWizard,
    pub orchestrator: Orchestrator,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub intake: &'a IntakeWizard,
    pub intake_progress: IntakeProgress,
    pub optimization: OrchestratorView<'a>,
}

/// "Step 2 of 5" for the wizard.
#[derive(Debug, Serialize)]
pub struct IntakeProgress {
    pub step_number: usize,
    pub total_steps: usize,
}

impl Session {
    fn new(services: Collaborators) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            last_active: Instant::now(),
            intake: IntakeWizard::new(),
            orchestrator: Orchestrator::new(services),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            intake: &self.intake,
            intake_progress: IntakeProgress {
                step_number: self.intake.navigation().step.number(),
                total_steps: IntakeStep::COUNT,
            },
            optimization: self.orchestrator.view(),
        }
    }
}

/// `{"result": .., "session": ..}` body shared by every session route.
pub fn session_response(session: &Session, result: Value) -> Result<Json<Value>, AppError> {
    let snapshot = serde_json::to_value(session.snapshot()).context("Failed to serialize session")?;
    Ok(Json(json!({
        "result": result,
        "session": snapshot
    })))
}

#[derive(Clone)]
struct SessionEntry {
    session: Arc<Mutex<Session>>,
    phase: watch::Receiver<Phase>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self, services: Collaborators) -> Arc<Mutex<Session>> {
        let session = Session::new(services);
        let id = session.id;
        let phase = session.orchestrator.watch_phase();
        let handle = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            id,
            SessionEntry {
                session: handle.clone(),
                phase,
            },
        );
        info!(session_id = %id, active = sessions.len(), "session created");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| entry.session.clone())
    }

    /// Current run phase, readable while another request holds the session.
    pub async fn phase(&self, id: Uuid) -> Option<Phase> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| *entry.phase.borrow())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "session discarded");
        }
        removed
    }

    /// Locks a session for one operation. A session already serving a
    /// request is reported busy instead of queueing a second run.
    pub async fn lock(&self, id: Uuid) -> Result<OwnedMutexGuard<Session>, AppError> {
        let handle = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        let mut session = handle.try_lock_owned().map_err(|_| AppError::SessionBusy)?;
        session.last_active = Instant::now();
        Ok(session)
    }

    /// Drops sessions idle for at least the TTL. Sessions with a request in
    /// flight are skipped. Returns how many were evicted.
    pub async fn evict_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| match entry.session.try_lock() {
            Ok(session) => {
                let keep = session.last_active.elapsed() < ttl;
                if !keep {
                    info!(session_id = %id, "session expired");
                }
                keep
            }
            Err(_) => true,
        });
        before - sessions.len()
    }

    /// Runs `evict_expired` in the background for the life of the process.
    pub fn spawn_expiry_sweep(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL.min(store.ttl));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let evicted = store.evict_expired().await;
                if evicted > 0 {
                    info!(evicted, "expired sessions evicted");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fakes;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::default();
        let handle = store.create(Fakes::default().collaborators()).await;
        let id = handle.lock().await.id;

        assert!(store.get(id).await.is_some());
        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.remove(id).await);
    }

    #[tokio::test]
    async fn test_locked_session_reports_busy() {
        let store = SessionStore::default();
        let handle = store.create(Fakes::default().collaborators()).await;
        let id = handle.lock().await.id;

        let _guard = store.lock(id).await.unwrap();
        assert!(matches!(store.lock(id).await, Err(AppError::SessionBusy)));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = SessionStore::default();
        assert!(matches!(
            store.lock(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires_after_ttl() {
        let store = SessionStore::new(Duration::from_secs(60));
        let handle = store.create(Fakes::default().collaborators()).await;
        let id = handle.lock().await.id;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.evict_expired().await, 0);
        drop(store.lock(id).await.unwrap());

        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(store.evict_expired().await, 0, "activity resets the idle clock");

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.evict_expired().await, 1);
        assert!(matches!(store.lock(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_session_survives_sweep() {
        let store = SessionStore::new(Duration::from_secs(60));
        let handle = store.create(Fakes::default().collaborators()).await;
        let id = handle.lock().await.id;

        let guard = store.lock(id).await.unwrap();
        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(store.evict_expired().await, 0);

        drop(guard);
        assert_eq!(store.evict_expired().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep_evicts_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(60));
        let handle = store.create(Fakes::default().collaborators()).await;
        let id = handle.lock().await.id;

        store.spawn_expiry_sweep();
        tokio::time::sleep(Duration::from_secs(181)).await;
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_phase_readable_while_locked() {
        let store = SessionStore::default();
        let handle = store.create(Fakes::default().collaborators()).await;
        let id = handle.lock().await.id;

        let _guard = store.lock(id).await.unwrap();
        assert_eq!(store.phase(id).await, Some(Phase::Idle));
        assert_eq!(store.phase(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_snapshot_serializes_idle_session() {
        let store = SessionStore::default();
        let handle = store.create(Fakes::default().collaborators()).await;
        let session = handle.lock().await;
        let body = session_response(&session, Value::Null).unwrap().0;
        assert_eq!(body["session"]["optimization"]["phase"], "idle");
        assert_eq!(body["session"]["intake"]["navigation"]["step"], "upload");
        assert_eq!(body["session"]["intake_progress"]["step_number"], 1);
        assert_eq!(body["session"]["intake_progress"]["total_steps"], 5);
    }
}
