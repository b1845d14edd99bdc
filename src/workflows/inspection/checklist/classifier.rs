//! Answer polarity classification.
//!
//! Admin-defined checklists carry free-form option text, so polarity is
//! derived from fixed keyword sets unless the option carries an explicit
//! type. The keyword sets are private to this module; swapping in another
//! strategy (for example catalogs that always type their options) does not
//! touch the evaluator or the recommendation generator.

use super::domain::{AnswerPolarity, ChecklistQuestion};

// Scanned before the positive set: "non-present" and "non-compliant" would
// otherwise match their positive counterparts by substring.
const NEGATIVE_KEYWORDS: [&str; 7] = [
    "non-present",
    "no",
    "not available",
    "non-compliant",
    "non-functional",
    "inoperational",
    "n/a",
];

const POSITIVE_KEYWORDS: [&str; 6] = [
    "present",
    "yes",
    "available",
    "compliant",
    "functional",
    "operational",
];

/// Classify a chosen response against a question's configured options.
///
/// Pure and idempotent; called on every response change and on every
/// aggregate recompute. Unmatched responses classify `Neutral`.
pub fn classify(question: &ChecklistQuestion, response: &str) -> AnswerPolarity {
    let wanted = response.trim().to_lowercase();
    for option in &question.options {
        if option.text().trim().to_lowercase() == wanted {
            return option
                .polarity_override()
                .unwrap_or_else(|| derive_polarity(option.text()));
        }
    }
    AnswerPolarity::Neutral
}

fn derive_polarity(text: &str) -> AnswerPolarity {
    let lowered = text.to_lowercase();
    if NEGATIVE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return AnswerPolarity::Negative;
    }
    if POSITIVE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return AnswerPolarity::Positive;
    }
    AnswerPolarity::Neutral
}
