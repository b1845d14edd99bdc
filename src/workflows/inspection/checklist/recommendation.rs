//! Automated remediation recommendations.
//!
//! Recommendations are derived from scratch on every recompute: one item
//! per negatively answered question, keyed by question-text keywords, plus
//! one permit item per expired date-valued conditional field. Deriving the
//! whole list keeps the replace semantics trivial: a response edit can
//! never leave stale entries behind.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::classifier::classify;
use super::conditional::{ConditionalState, FieldExpiry};
use super::domain::{
    AnswerPolarity, AutomatedRecommendation, ChecklistQuestion, ChecklistResponse,
    QuestionCatalog, QuestionId, RecommendationAction, RecommendationChecks, RecommendationKind,
};

const PERMIT_KEYWORDS: [&str; 2] = ["permit", "license"];
const FACILITY_KEYWORDS: [&str; 2] = ["facility", "equipment"];

/// Derive the full recommendation list for the current session state.
pub(crate) fn generate(
    catalog: &QuestionCatalog,
    responses: &BTreeMap<QuestionId, ChecklistResponse>,
    conditional: &ConditionalState,
    today: NaiveDate,
) -> Vec<AutomatedRecommendation> {
    let mut recommendations = Vec::new();

    for response in responses.values() {
        let Some(question) = catalog.find(&response.question_id) else {
            continue;
        };
        if classify(question, &response.response) == AnswerPolarity::Negative {
            upsert(&mut recommendations, for_negative_answer(question));
        }
    }

    for (question_id, expiry) in conditional.field_expiries(today) {
        if expiry.is_expired {
            upsert(&mut recommendations, for_expired_document(question_id, &expiry));
        }
    }

    recommendations
}

/// Insert keeping at most one recommendation per `(question_id, kind)`; a
/// new entry replaces the existing one for the same pair.
pub(crate) fn upsert(
    recommendations: &mut Vec<AutomatedRecommendation>,
    recommendation: AutomatedRecommendation,
) {
    match recommendations.iter_mut().find(|existing| {
        existing.question_id == recommendation.question_id
            && existing.kind == recommendation.kind
    }) {
        Some(existing) => *existing = recommendation,
        None => recommendations.push(recommendation),
    }
}

pub(crate) fn for_negative_answer(question: &ChecklistQuestion) -> AutomatedRecommendation {
    let lowered = question.text.to_lowercase();

    if let Some(keyword) = PERMIT_KEYWORDS.iter().find(|k| lowered.contains(*k)) {
        return AutomatedRecommendation {
            question_id: question.id.clone(),
            kind: RecommendationKind::Permit,
            message: format!("Secure the required {keyword}: {}", question.text),
            action: RecommendationAction::ComplyLackingPermits,
        };
    }

    if let Some(keyword) = FACILITY_KEYWORDS.iter().find(|k| lowered.contains(*k)) {
        return AutomatedRecommendation {
            question_id: question.id.clone(),
            kind: RecommendationKind::Facility,
            message: format!("Provide the lacking {keyword}: {}", question.text),
            action: RecommendationAction::ProvideLackingFacilities,
        };
    }

    AutomatedRecommendation {
        question_id: question.id.clone(),
        kind: RecommendationKind::Others,
        message: format!("Address the non-compliant finding: {}", question.text),
        action: RecommendationAction::Others,
    }
}

pub(crate) fn for_expired_document(
    question_id: QuestionId,
    expiry: &FieldExpiry,
) -> AutomatedRecommendation {
    AutomatedRecommendation {
        question_id,
        kind: RecommendationKind::Permit,
        message: format!(
            "Document/Permit expired on {}. Renew to restore compliance.",
            expiry.expires_on
        ),
        action: RecommendationAction::ComplyLackingPermits,
    }
}

/// Combine manual check overrides with the derived flags. A live
/// recommendation forces its action flag true; manual overrides are never
/// auto-cleared (flagged for product clarification in DESIGN.md).
pub(crate) fn derive_checks(
    recommendations: &[AutomatedRecommendation],
    manual: &RecommendationChecks,
) -> RecommendationChecks {
    let mut checks = *manual;
    for recommendation in recommendations {
        checks.set(recommendation.action, true);
    }
    checks
}
