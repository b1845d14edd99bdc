//! Checklist compliance engine: polarity classification, conditional field
//! lifecycles, expiry tracking, recommendation generation, and the derived
//! compliance verdict for one inspection-authoring session.

pub(crate) mod classifier;
pub(crate) mod conditional;
pub mod domain;
pub(crate) mod evaluation;
pub(crate) mod recommendation;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use classifier::classify;
pub use conditional::{FieldExpiry, EXPIRY_NOTE};
pub use domain::{
    AnswerOption, AnswerPolarity, AutomatedRecommendation, ChecklistQuestion, ChecklistResponse,
    ComplianceVerdict, ConditionalFieldSpec, ConditionalLogic, FieldType, InspectionProgress,
    QuestionCatalog, QuestionId, RecommendationAction, RecommendationChecks, RecommendationKind,
    SubmissionPayload,
};
pub use repository::{
    InspectionStatus, InspectionSubmission, RepositoryError, SessionId, SessionRecord,
    SessionRepository, SessionStatusView, SubmissionError, SubmissionGateway,
};
pub use router::inspection_router;
pub use service::{InspectionService, InspectionServiceError};
pub use session::{ChecklistSnapshot, InspectionSession};
