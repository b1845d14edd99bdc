use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::info;

use super::domain::{QuestionCatalog, QuestionId, RecommendationAction, SubmissionPayload};
use super::repository::{
    InspectionStatus, InspectionSubmission, RepositoryError, SessionId, SessionRecord,
    SessionRepository, SubmissionError, SubmissionGateway,
};
use super::session::{ChecklistSnapshot, InspectionSession};

/// Service composing the session repository, the engine, and the outbound
/// submission gateway. Every mutation persists the session and returns a
/// freshly derived snapshot, so callers always observe the recomputed
/// verdict, recommendations, and progress.
pub struct InspectionService<R, G> {
    repository: Arc<R>,
    gateway: Arc<G>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("insp-{id:06}"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl<R, G> InspectionService<R, G>
where
    R: SessionRepository + 'static,
    G: SubmissionGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    /// Open a fresh authoring session over the supplied question catalog.
    pub fn open(&self, catalog: QuestionCatalog) -> Result<SessionRecord, InspectionServiceError> {
        let record = SessionRecord {
            session_id: next_session_id(),
            session: InspectionSession::new(catalog),
            status: InspectionStatus::Draft,
        };
        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    pub fn record_response(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        response: &str,
        notes: Option<&str>,
        remarks: Option<&str>,
    ) -> Result<ChecklistSnapshot, InspectionServiceError> {
        self.mutate(session_id, |session| {
            session.set_response(question_id, response);
            if let Some(notes) = notes {
                session.set_notes(question_id, notes);
            }
            if let Some(remarks) = remarks {
                session.set_remarks(question_id, remarks);
            }
        })
    }

    pub fn record_field(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        field_name: &str,
        value: &str,
    ) -> Result<ChecklistSnapshot, InspectionServiceError> {
        self.mutate(session_id, |session| {
            session.set_field(question_id, field_name, value);
        })
    }

    pub fn record_expired_flag(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        expired: bool,
    ) -> Result<ChecklistSnapshot, InspectionServiceError> {
        self.mutate(session_id, |session| {
            session.set_expired_flag(question_id, expired);
        })
    }

    pub fn record_check(
        &self,
        session_id: &SessionId,
        action: RecommendationAction,
        checked: bool,
    ) -> Result<ChecklistSnapshot, InspectionServiceError> {
        self.mutate(session_id, |session| {
            session.set_recommendation_check(action, checked);
        })
    }

    /// Fetch the current record for API responses.
    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, InspectionServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn snapshot(
        &self,
        session_id: &SessionId,
    ) -> Result<ChecklistSnapshot, InspectionServiceError> {
        let record = self.get(session_id)?;
        Ok(record.session.snapshot(today()))
    }

    /// Assemble the payload and hand it to the record keeper. Gated on a
    /// fully answered checklist; a session submits at most once.
    pub fn submit(
        &self,
        session_id: &SessionId,
    ) -> Result<SubmissionPayload, InspectionServiceError> {
        let mut record = self.get(session_id)?;

        if record.status == InspectionStatus::Submitted {
            return Err(InspectionServiceError::AlreadySubmitted);
        }

        let evaluated_on = today();
        let snapshot = record.session.snapshot(evaluated_on);
        if snapshot.progress.percentage < 100 {
            return Err(InspectionServiceError::ChecklistIncomplete {
                percentage: snapshot.progress.percentage,
            });
        }

        let payload = record.session.payload(evaluated_on);
        self.gateway.deliver(InspectionSubmission {
            session_id: session_id.clone(),
            payload: payload.clone(),
        })?;

        record.status = InspectionStatus::Submitted;
        self.repository.update(record)?;

        info!(
            session_id = %session_id.0,
            compliance_status = payload.compliance_status.label(),
            recommendations = payload.automated_recommendations.len(),
            "inspection submitted"
        );

        Ok(payload)
    }

    fn mutate(
        &self,
        session_id: &SessionId,
        apply: impl FnOnce(&mut InspectionSession),
    ) -> Result<ChecklistSnapshot, InspectionServiceError> {
        let mut record = self.get(session_id)?;
        apply(&mut record.session);
        let snapshot = record.session.snapshot(today());
        self.repository.update(record)?;
        Ok(snapshot)
    }
}

/// Error raised by the inspection service.
#[derive(Debug, thiserror::Error)]
pub enum InspectionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("checklist incomplete at {percentage}%")]
    ChecklistIncomplete { percentage: u8 },
    #[error("inspection already submitted")]
    AlreadySubmitted,
}
