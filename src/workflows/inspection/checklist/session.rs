//! Inspection-authoring session state and the derived snapshot.
//!
//! The session owns every piece of raw state an inspection accumulates:
//! responses, conditional field values, expired flags, and manual
//! recommendation-check overrides. All aggregates (verdict, recommendation
//! list, progress) are derived through [`InspectionSession::snapshot`], a
//! full recompute over a consistent snapshot, so repeated edits stay
//! idempotent and no hidden order-of-effects dependencies exist.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::conditional::{append_expiry_note, strip_expiry_note, ConditionalState, FieldExpiry};
use super::domain::{
    AutomatedRecommendation, ChecklistResponse, ComplianceVerdict, InspectionProgress,
    QuestionCatalog, QuestionId, RecommendationAction, RecommendationChecks, SubmissionPayload,
};
use super::{evaluation, recommendation};

/// All state scoped to a single inspection-authoring session. Constructed
/// empty at session start, mutated through the methods below, and handed
/// off as an immutable payload at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSession {
    catalog: QuestionCatalog,
    responses: BTreeMap<QuestionId, ChecklistResponse>,
    conditional: ConditionalState,
    manual_checks: RecommendationChecks,
}

/// Derived outputs for the current session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSnapshot {
    pub verdict: ComplianceVerdict,
    pub recommendations: Vec<AutomatedRecommendation>,
    pub recommendation_checks: RecommendationChecks,
    pub progress: InspectionProgress,
    /// Date-valued fields inside the expiring-soon window, for caller
    /// display. The verdict never reads these.
    pub expiring_documents: Vec<(QuestionId, FieldExpiry)>,
}

impl InspectionSession {
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self {
            catalog,
            responses: BTreeMap::new(),
            conditional: ConditionalState::default(),
            manual_checks: RecommendationChecks::default(),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn response(&self, id: &QuestionId) -> Option<&ChecklistResponse> {
        self.responses.get(id)
    }

    pub fn responses(&self) -> impl Iterator<Item = &ChecklistResponse> {
        self.responses.values()
    }

    pub fn conditional_fields(&self, id: &QuestionId) -> Option<&BTreeMap<String, String>> {
        self.conditional.fields.get(id)
    }

    pub fn expired_flag(&self, id: &QuestionId) -> Option<bool> {
        self.conditional.expired_flag(id)
    }

    /// Record (or overwrite) the response for a question and run the
    /// conditional lifecycle. Unknown question ids are ignored so stale
    /// references from the caller cannot wedge the session.
    pub fn set_response(&mut self, id: &QuestionId, response: &str) {
        let Some(question) = self.catalog.find(id) else {
            warn!(question_id = %id.0, "response for unknown question; ignoring");
            return;
        };

        let entry = self
            .responses
            .entry(id.clone())
            .or_insert_with(|| ChecklistResponse::empty(id.clone()));
        entry.response = response.to_string();

        if !question.is_conditional {
            return;
        }
        let Some(logic) = &question.conditional_logic else {
            return;
        };

        if response == logic.trigger_response {
            self.conditional.activate(question);
        } else {
            self.conditional.deactivate(id);
            entry.notes = strip_expiry_note(&entry.notes);
        }
    }

    pub fn set_notes(&mut self, id: &QuestionId, notes: &str) {
        if self.catalog.find(id).is_none() {
            warn!(question_id = %id.0, "notes for unknown question; ignoring");
            return;
        }
        let entry = self
            .responses
            .entry(id.clone())
            .or_insert_with(|| ChecklistResponse::empty(id.clone()));
        entry.notes = notes.to_string();
    }

    pub fn set_remarks(&mut self, id: &QuestionId, remarks: &str) {
        if self.catalog.find(id).is_none() {
            warn!(question_id = %id.0, "remarks for unknown question; ignoring");
            return;
        }
        let entry = self
            .responses
            .entry(id.clone())
            .or_insert_with(|| ChecklistResponse::empty(id.clone()));
        entry.remarks = remarks.to_string();
    }

    /// Store a conditional field value. A no-op unless the question's
    /// trigger response is currently selected.
    pub fn set_field(&mut self, id: &QuestionId, field_name: &str, value: &str) {
        self.conditional.set_field(id, field_name, value);
    }

    /// Record the explicit "document expired" checkbox and keep the fixed
    /// expiry note in the question's notes in sync. Idempotent under
    /// repeated same-value calls.
    pub fn set_expired_flag(&mut self, id: &QuestionId, expired: bool) {
        if self.catalog.find(id).is_none() {
            warn!(question_id = %id.0, "expired flag for unknown question; ignoring");
            return;
        }

        self.conditional.set_expired_flag(id, expired);

        let entry = self
            .responses
            .entry(id.clone())
            .or_insert_with(|| ChecklistResponse::empty(id.clone()));
        entry.notes = if expired {
            append_expiry_note(&entry.notes)
        } else {
            strip_expiry_note(&entry.notes)
        };
    }

    /// Manual recommendation-check override. Never auto-cleared by the
    /// recompute; see DESIGN.md.
    pub fn set_recommendation_check(&mut self, action: RecommendationAction, checked: bool) {
        self.manual_checks.set(action, checked);
    }

    /// Full deterministic recompute of every derived aggregate from the
    /// current state snapshot.
    pub fn snapshot(&self, today: NaiveDate) -> ChecklistSnapshot {
        let recommendations =
            recommendation::generate(&self.catalog, &self.responses, &self.conditional, today);
        let recommendation_checks =
            recommendation::derive_checks(&recommendations, &self.manual_checks);
        let verdict =
            evaluation::evaluate(&self.catalog, &self.responses, &self.conditional, today);
        let progress = evaluation::progress(&self.catalog, &self.responses);
        let expiring_documents = self
            .conditional
            .field_expiries(today)
            .into_iter()
            .filter(|(_, expiry)| expiry.is_expiring_soon)
            .collect();

        ChecklistSnapshot {
            verdict,
            recommendations,
            recommendation_checks,
            progress,
            expiring_documents,
        }
    }

    /// Assemble the immutable payload handed to the record keeper.
    pub fn payload(&self, today: NaiveDate) -> SubmissionPayload {
        let snapshot = self.snapshot(today);
        SubmissionPayload {
            checklist_responses: self.responses.values().cloned().collect(),
            conditional_fields: self.conditional.fields.clone(),
            automated_recommendations: snapshot.recommendations,
            recommendation_checks: snapshot.recommendation_checks,
            compliance_status: snapshot.verdict,
        }
    }
}
