use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::inspection::checklist::domain::{
    AnswerOption, AnswerPolarity, ChecklistQuestion, ConditionalFieldSpec, ConditionalLogic,
    FieldType, QuestionCatalog, QuestionId,
};
use crate::workflows::inspection::checklist::repository::{
    InspectionSubmission, RepositoryError, SessionId, SessionRecord, SessionRepository,
    SubmissionError, SubmissionGateway,
};
use crate::workflows::inspection::checklist::service::InspectionService;
use crate::workflows::inspection::checklist::session::InspectionSession;

pub(super) fn qid(raw: &str) -> QuestionId {
    QuestionId::new(raw)
}

pub(super) fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn plain_question(
    id: &str,
    text: &str,
    category: &str,
    options: &[&str],
) -> ChecklistQuestion {
    ChecklistQuestion {
        id: qid(id),
        text: text.to_string(),
        category: category.to_string(),
        options: options
            .iter()
            .map(|option| AnswerOption::Text(option.to_string()))
            .collect(),
        is_conditional: false,
        conditional_logic: None,
    }
}

/// The "Sanitary Permit" question: selecting "Present" reveals a permit
/// number plus an expiry date follow-up.
pub(super) fn sanitary_permit_question() -> ChecklistQuestion {
    ChecklistQuestion {
        id: qid("q-permit"),
        text: "Sanitary Permit".to_string(),
        category: "Permits".to_string(),
        options: vec![
            AnswerOption::Text("Present".to_string()),
            AnswerOption::Text("Non-Present".to_string()),
        ],
        is_conditional: true,
        conditional_logic: Some(ConditionalLogic {
            trigger_response: "Present".to_string(),
            kind: "document_details".to_string(),
            fields: vec![
                ConditionalFieldSpec {
                    name: "permit_number".to_string(),
                    label: "Permit Number".to_string(),
                    field_type: FieldType::Text,
                    required: true,
                    placeholder: "e.g. SP-2025-0001".to_string(),
                },
                ConditionalFieldSpec {
                    name: "expiry_date".to_string(),
                    label: "Expiry Date".to_string(),
                    field_type: FieldType::Date,
                    required: true,
                    placeholder: String::new(),
                },
            ],
        }),
    }
}

pub(super) fn typed_question() -> ChecklistQuestion {
    ChecklistQuestion {
        id: qid("q-extinguisher"),
        text: "Fire extinguisher condition".to_string(),
        category: "Safety".to_string(),
        options: vec![
            AnswerOption::Typed {
                text: "Serviceable".to_string(),
                polarity: AnswerPolarity::Positive,
            },
            AnswerOption::Typed {
                text: "Condemned".to_string(),
                polarity: AnswerPolarity::Negative,
            },
        ],
        is_conditional: false,
        conditional_logic: None,
    }
}

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::from_questions([
        sanitary_permit_question(),
        plain_question(
            "q-handwash",
            "Handwashing facility",
            "Sanitation",
            &["Available", "Not Available"],
        ),
        typed_question(),
        plain_question(
            "q-housekeeping",
            "General housekeeping acceptable",
            "Sanitation",
            &["Yes", "No"],
        ),
    ])
}

pub(super) fn ten_question_catalog() -> QuestionCatalog {
    QuestionCatalog::from_questions((1..=10).map(|n| {
        plain_question(
            &format!("q-{n:02}"),
            &format!("Requirement {n}"),
            "General",
            &["Yes", "No"],
        )
    }))
}

pub(super) fn session() -> InspectionSession {
    InspectionSession::new(catalog())
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryGateway {
    deliveries: Arc<Mutex<Vec<InspectionSubmission>>>,
}

impl MemoryGateway {
    pub(super) fn deliveries(&self) -> Vec<InspectionSubmission> {
        self.deliveries.lock().expect("gateway mutex poisoned").clone()
    }
}

impl SubmissionGateway for MemoryGateway {
    fn deliver(&self, submission: InspectionSubmission) -> Result<(), SubmissionError> {
        self.deliveries
            .lock()
            .expect("gateway mutex poisoned")
            .push(submission);
        Ok(())
    }
}

pub(super) struct FailingGateway;

impl SubmissionGateway for FailingGateway {
    fn deliver(&self, _submission: InspectionSubmission) -> Result<(), SubmissionError> {
        Err(SubmissionError::Transport("record keeper offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    InspectionService<MemoryRepository, MemoryGateway>,
    Arc<MemoryRepository>,
    Arc<MemoryGateway>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let gateway = Arc::new(MemoryGateway::default());
    let service = InspectionService::new(repository.clone(), gateway.clone());
    (service, repository, gateway)
}
