//! Aggregate compliance verdict and completion progress.
//!
//! Both derivations are pure functions over a consistent state snapshot and
//! never read a previously computed value.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::classifier::classify;
use super::conditional::ConditionalState;
use super::domain::{
    AnswerPolarity, ChecklistResponse, ComplianceVerdict, InspectionProgress, QuestionCatalog,
    QuestionId,
};

/// Combine classified answers and both expiry sources into the binary
/// verdict.
///
/// Guard order matters: any negative answer dominates; expiry only flips an
/// otherwise fully positive checklist. Responses against unknown questions
/// classify `Neutral`.
pub(crate) fn evaluate(
    catalog: &QuestionCatalog,
    responses: &BTreeMap<QuestionId, ChecklistResponse>,
    conditional: &ConditionalState,
    today: NaiveDate,
) -> ComplianceVerdict {
    if responses.is_empty() {
        return ComplianceVerdict::Compliant;
    }

    let polarities: Vec<AnswerPolarity> = responses
        .values()
        .map(|response| match catalog.find(&response.question_id) {
            Some(question) => classify(question, &response.response),
            None => AnswerPolarity::Neutral,
        })
        .collect();

    let has_negative = polarities
        .iter()
        .any(|polarity| *polarity == AnswerPolarity::Negative);
    let all_positive = polarities
        .iter()
        .all(|polarity| *polarity == AnswerPolarity::Positive);
    let has_any_expired = conditional.any_flag_set() || conditional.any_field_expired(today);

    if has_negative {
        ComplianceVerdict::NotCompliant
    } else if all_positive && has_any_expired {
        ComplianceVerdict::NotCompliant
    } else {
        ComplianceVerdict::Compliant
    }
}

/// Completion ratio over the full question set. A response counts once its
/// response text is non-empty.
pub(crate) fn progress(
    catalog: &QuestionCatalog,
    responses: &BTreeMap<QuestionId, ChecklistResponse>,
) -> InspectionProgress {
    let total = catalog.total_questions();
    let answered = responses
        .values()
        .filter(|response| !response.response.is_empty())
        .count();
    let percentage = if total > 0 {
        ((answered as f64 / total as f64) * 100.0).round() as u8
    } else {
        0
    };

    InspectionProgress {
        answered,
        total,
        percentage,
    }
}
