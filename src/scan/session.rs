//! Scanning device sessions.
//!
//! A session pins the context a device is scanning for and owns that
//! device's recent-scans history. Sessions are held in a cache that expires
//! idle entries; nothing here is persisted.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, Utc};
use derive_more::Display;
use futures::lock::Mutex;
use moka::future::Cache;
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ErrorBody;
use super::history::{RecentScans, ScanRecord};
use super::{ScanContext, ScanOutcome, run_scan};
use crate::store::AttendanceStore;

#[derive(Debug, Display, Clone, PartialEq, Eq, AsRefStr)]
pub enum SessionError {
    #[display(fmt = "Scan session not found or expired")]
    NotFound,

    /// The device already has a scan outstanding.
    #[display(fmt = "A scan is already in progress for this session")]
    ScanInProgress,

    #[display(fmt = "Schedule slot not found")]
    ScheduleNotFound,

    #[display(fmt = "Bus route not found or inactive")]
    RouteNotFound,

    #[display(fmt = "{}", _0)]
    LookupFailed(String),
}

impl std::error::Error for SessionError {}

impl ResponseError for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::NotFound
            | SessionError::ScheduleNotFound
            | SessionError::RouteNotFound => StatusCode::NOT_FOUND,
            SessionError::ScanInProgress => StatusCode::CONFLICT,
            SessionError::LookupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            code: self.as_ref().to_string(),
            message: self.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "session_id": "5b0e7d1c-6a55-4d2e-9f3b-0f0c8f4f7a11",
        "context": { "type": "bus", "route_id": "r3" },
        "opened_at": "2026-10-16T06:55:00Z"
    })
)]
pub struct SessionInfo {
    pub session_id: String,
    pub context: ScanContext,
    #[schema(value_type = String, format = "date-time")]
    pub opened_at: DateTime<Utc>,
}

pub struct ScanSession {
    info: SessionInfo,
    recent: RecentScans,
}

impl ScanSession {
    fn new(context: ScanContext, opened_at: DateTime<Utc>) -> Self {
        Self {
            info: SessionInfo {
                session_id: Uuid::new_v4().to_string(),
                context,
                opened_at,
            },
            recent: RecentScans::new(),
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Runs one scan in this session's context and records the outcome in
    /// the session history.
    pub async fn scan(
        &mut self,
        store: &dyn AttendanceStore,
        raw: &str,
        now: DateTime<Utc>,
    ) -> (ScanOutcome, ScanRecord) {
        let outcome = run_scan(store, &self.info.context, raw, now).await;
        let entry = ScanRecord::from_outcome(&outcome, now);
        self.recent.push(entry.clone());
        (outcome, entry)
    }

    pub fn recent(&self) -> Vec<ScanRecord> {
        self.recent.to_vec()
    }
}

pub type SharedSession = Arc<Mutex<ScanSession>>;

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Cache<String, SharedSession>,
}

impl SessionRegistry {
    pub fn new(max_sessions: u64, idle_ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle_ttl)
                .build(),
        }
    }

    /// Opens a session after checking that the context still exists.
    pub async fn open(
        &self,
        store: &dyn AttendanceStore,
        context: ScanContext,
        now: DateTime<Utc>,
    ) -> Result<SessionInfo, SessionError> {
        match &context {
            ScanContext::Classroom { schedule_id, .. } => {
                store
                    .find_schedule(schedule_id)
                    .await
                    .map_err(|e| SessionError::LookupFailed(e.to_string()))?
                    .ok_or(SessionError::ScheduleNotFound)?;
            }
            ScanContext::Bus { route_id } => {
                store
                    .find_active_route(route_id)
                    .await
                    .map_err(|e| SessionError::LookupFailed(e.to_string()))?
                    .ok_or(SessionError::RouteNotFound)?;
            }
        }

        let session = ScanSession::new(context, now);
        let info = session.info().clone();

        self.sessions
            .insert(info.session_id.clone(), Arc::new(Mutex::new(session)))
            .await;

        info!(session_id = %info.session_id, context = ?info.context, "Scan session opened");
        Ok(info)
    }

    pub async fn get(&self, session_id: &str) -> Result<SharedSession, SessionError> {
        self.sessions
            .get(session_id)
            .await
            .ok_or(SessionError::NotFound)
    }

    pub async fn close(&self, session_id: &str) -> Result<(), SessionError> {
        match self.sessions.remove(session_id).await {
            Some(_) => {
                debug!(session_id, "Scan session closed");
                Ok(())
            }
            None => Err(SessionError::NotFound),
        }
    }

    /// Runs a scan unless one is already outstanding on the session.
    pub async fn scan(
        &self,
        store: &dyn AttendanceStore,
        session_id: &str,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<(ScanOutcome, Vec<ScanRecord>), SessionError> {
        let shared = self.get(session_id).await?;
        let mut session = shared.try_lock().ok_or(SessionError::ScanInProgress)?;

        let (outcome, _) = session.scan(store, raw, now).await;
        Ok((outcome, session.recent()))
    }
}
