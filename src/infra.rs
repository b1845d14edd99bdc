//! Process-local adapters backing the HTTP service: an in-memory session
//! store and a record-keeper gateway that accepts every delivery.

use std::collections::HashMap;
use std::sync::Mutex;

use inspection_engine::workflows::inspection::checklist::{
    InspectionSubmission, RepositoryError, SessionId, SessionRecord, SessionRepository,
    SubmissionError, SubmissionGateway,
};
use tracing::info;

#[derive(Default)]
pub struct InMemorySessions {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionRepository for InMemorySessions {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store poisoned".to_string()))?;
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store poisoned".to_string()))?;
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Stands in for the municipal record keeper until the real transport is
/// wired up; logs the accepted payload and succeeds.
#[derive(Default)]
pub struct RecordKeeperStub;

impl SubmissionGateway for RecordKeeperStub {
    fn deliver(&self, submission: InspectionSubmission) -> Result<(), SubmissionError> {
        info!(
            session_id = %submission.session_id.0,
            compliance_status = submission.payload.compliance_status.label(),
            responses = submission.payload.checklist_responses.len(),
            "submission accepted by record keeper stub"
        );
        Ok(())
    }
}
