use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog questions.
///
/// Serializes as a bare string so it can key JSON maps in the submission
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

/// Compliance polarity of an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerPolarity {
    Positive,
    Negative,
    Neutral,
}

impl AnswerPolarity {
    pub const fn label(self) -> &'static str {
        match self {
            AnswerPolarity::Positive => "positive",
            AnswerPolarity::Negative => "negative",
            AnswerPolarity::Neutral => "neutral",
        }
    }
}

/// Admin-configured answer option: either a plain display string or a
/// `{ text, type }` object carrying an explicit polarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerOption {
    Text(String),
    Typed {
        text: String,
        #[serde(rename = "type")]
        polarity: AnswerPolarity,
    },
}

impl AnswerOption {
    pub fn text(&self) -> &str {
        match self {
            AnswerOption::Text(text) => text,
            AnswerOption::Typed { text, .. } => text,
        }
    }

    /// Explicit polarity configured by the admin, if any.
    pub fn polarity_override(&self) -> Option<AnswerPolarity> {
        match self {
            AnswerOption::Text(_) => None,
            AnswerOption::Typed { polarity, .. } => Some(*polarity),
        }
    }
}

/// Input kind for a conditional follow-up field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Date,
}

/// Shape of one conditional follow-up input. Defines shape only; runtime
/// values live in the session's conditional state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFieldSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
}

/// Conditional follow-up configuration attached to a question. The fields
/// are shown only while the response equals `trigger_response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalLogic {
    pub trigger_response: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub fields: Vec<ConditionalFieldSpec>,
}

/// One checklist question as supplied by the external question catalog.
/// Immutable for the lifetime of an inspection session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistQuestion {
    pub id: QuestionId,
    pub text: String,
    pub category: String,
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub is_conditional: bool,
    #[serde(default)]
    pub conditional_logic: Option<ConditionalLogic>,
}

/// Question catalog grouped by category name, as delivered by the external
/// collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCatalog {
    categories: BTreeMap<String, Vec<ChecklistQuestion>>,
}

impl QuestionCatalog {
    pub fn new(categories: BTreeMap<String, Vec<ChecklistQuestion>>) -> Self {
        Self { categories }
    }

    /// Build a catalog from a flat question list, grouping by category.
    pub fn from_questions(questions: impl IntoIterator<Item = ChecklistQuestion>) -> Self {
        let mut categories: BTreeMap<String, Vec<ChecklistQuestion>> = BTreeMap::new();
        for question in questions {
            categories
                .entry(question.category.clone())
                .or_default()
                .push(question);
        }
        Self { categories }
    }

    pub fn questions(&self) -> impl Iterator<Item = &ChecklistQuestion> {
        self.categories.values().flatten()
    }

    pub fn find(&self, id: &QuestionId) -> Option<&ChecklistQuestion> {
        self.questions().find(|question| &question.id == id)
    }

    /// Count of all questions across all categories.
    pub fn total_questions(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_questions() == 0
    }
}

/// One inspector response. Created on first interaction with a question and
/// mutated in place afterwards; clearing an answer stores the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    pub question_id: QuestionId,
    pub response: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub remarks: String,
}

impl ChecklistResponse {
    pub fn empty(question_id: QuestionId) -> Self {
        Self {
            question_id,
            response: String::new(),
            notes: String::new(),
            remarks: String::new(),
        }
    }
}

/// Category of an automated remediation recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Permit,
    Facility,
    Others,
}

impl RecommendationKind {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationKind::Permit => "permit",
            RecommendationKind::Facility => "facility",
            RecommendationKind::Others => "others",
        }
    }
}

/// Remediation action attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    ComplyLackingPermits,
    ProvideLackingFacilities,
    Others,
}

impl RecommendationAction {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationAction::ComplyLackingPermits => "comply_lacking_permits",
            RecommendationAction::ProvideLackingFacilities => "provide_lacking_facilities",
            RecommendationAction::Others => "others",
        }
    }
}

/// Automated remediation item derived from a negative answer or an expired
/// document. At most one per `(question_id, kind)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatedRecommendation {
    pub question_id: QuestionId,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub action: RecommendationAction,
}

/// Per-action recommendation flags included in the submission payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationChecks {
    pub comply_lacking_permits: bool,
    pub provide_lacking_facilities: bool,
    pub others: bool,
}

impl RecommendationChecks {
    pub fn is_checked(&self, action: RecommendationAction) -> bool {
        match action {
            RecommendationAction::ComplyLackingPermits => self.comply_lacking_permits,
            RecommendationAction::ProvideLackingFacilities => self.provide_lacking_facilities,
            RecommendationAction::Others => self.others,
        }
    }

    pub fn set(&mut self, action: RecommendationAction, checked: bool) {
        match action {
            RecommendationAction::ComplyLackingPermits => self.comply_lacking_permits = checked,
            RecommendationAction::ProvideLackingFacilities => {
                self.provide_lacking_facilities = checked
            }
            RecommendationAction::Others => self.others = checked,
        }
    }
}

/// Binary aggregate verdict for one inspection session. Always derived,
/// never persisted as independent mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceVerdict {
    Compliant,
    NotCompliant,
}

impl ComplianceVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            ComplianceVerdict::Compliant => "compliant",
            ComplianceVerdict::NotCompliant => "not_compliant",
        }
    }
}

/// Completion progress over the full question set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionProgress {
    pub answered: usize,
    pub total: usize,
    pub percentage: u8,
}

/// The finished payload handed to the external record keeper at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub checklist_responses: Vec<ChecklistResponse>,
    pub conditional_fields: BTreeMap<QuestionId, BTreeMap<String, String>>,
    pub automated_recommendations: Vec<AutomatedRecommendation>,
    pub recommendation_checks: RecommendationChecks,
    pub compliance_status: ComplianceVerdict,
}
