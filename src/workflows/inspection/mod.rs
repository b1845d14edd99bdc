//! Inspection-authoring workflow: the checklist engine plus its service and
//! HTTP facade.

pub mod checklist;

pub use checklist::{
    AnswerOption, AnswerPolarity, AutomatedRecommendation, ChecklistQuestion, ChecklistResponse,
    ChecklistSnapshot, ComplianceVerdict, ConditionalFieldSpec, ConditionalLogic, FieldType,
    InspectionProgress, InspectionService, InspectionSession, InspectionStatus, QuestionCatalog,
    QuestionId, RecommendationAction, RecommendationChecks, RecommendationKind, SessionId,
    SubmissionPayload,
};
