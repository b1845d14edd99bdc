use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::SubmissionPayload;
use super::session::InspectionSession;

/// Identifier wrapper for inspection-authoring sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// High level status tracked for a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionStatus {
    Draft,
    Submitted,
}

impl InspectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InspectionStatus::Draft => "draft",
            InspectionStatus::Submitted => "submitted",
        }
    }
}

/// Repository record pairing the session state with status metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub session: InspectionSession,
    pub status: InspectionStatus,
}

impl SessionRecord {
    pub fn status_view(&self, today: NaiveDate) -> SessionStatusView {
        let snapshot = self.session.snapshot(today);
        SessionStatusView {
            session_id: self.session_id.clone(),
            status: self.status.label(),
            compliance_status: snapshot.verdict.label(),
            percentage: snapshot.progress.percentage,
        }
    }
}

/// Sanitized representation of a session's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub compliance_status: &'static str,
    pub percentage: u8,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hand-off of a finished inspection to the record keeper. One
/// fire-and-forget delivery per submission; no retry or cancellation.
pub trait SubmissionGateway: Send + Sync {
    fn deliver(&self, submission: InspectionSubmission) -> Result<(), SubmissionError>;
}

/// Submission envelope delivered through the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSubmission {
    pub session_id: SessionId,
    pub payload: SubmissionPayload,
}

/// Delivery error surfaced to the caller with the raw transport detail.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission transport failed: {0}")]
    Transport(String),
}
