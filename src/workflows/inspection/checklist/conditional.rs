//! Lifecycle of conditional follow-up fields and document expiry.
//!
//! Field maps exist only while the parent question's trigger response is
//! selected; presence or absence of a map entry is the lifecycle signal.
//! Two independent expiry sources feed the evaluator: the explicit
//! "document expired" checkbox and date-valued field values whose parsed
//! date lies in the past.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ChecklistQuestion, QuestionId};

/// Fixed note appended to a question's notes when its document is marked
/// expired. Removal strips exactly this substring.
pub const EXPIRY_NOTE: &str = "Document/Permit has expired.";

/// Window, in days, within which a document counts as expiring soon.
const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

/// Derived expiry facts for one date-valued conditional field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExpiry {
    pub field_name: String,
    pub expires_on: NaiveDate,
    pub days_until: i64,
    pub is_expired: bool,
    /// Informational only; the evaluator never reads this.
    pub is_expiring_soon: bool,
}

/// Runtime state owned by the conditional field manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ConditionalState {
    pub fields: BTreeMap<QuestionId, BTreeMap<String, String>>,
    pub expired_flags: BTreeMap<QuestionId, bool>,
}

impl ConditionalState {
    /// Install a fresh field map for the question, every configured field set to
    /// the empty string. Activation always re-initializes wholesale, so
    /// reselecting the trigger response discards earlier edits.
    pub fn activate(&mut self, question: &ChecklistQuestion) {
        let Some(logic) = &question.conditional_logic else {
            return;
        };
        let blank = logic
            .fields
            .iter()
            .map(|field| (field.name.clone(), String::new()))
            .collect();
        self.fields.insert(question.id.clone(), blank);
    }

    /// Remove the field map and the expired flag for the question. Removal,
    /// not clearing: absence means "not conditional-active".
    pub fn deactivate(&mut self, id: &QuestionId) {
        self.fields.remove(id);
        self.expired_flags.remove(id);
    }

    pub fn is_active(&self, id: &QuestionId) -> bool {
        self.fields.contains_key(id)
    }

    /// Store a field value. Returns `false` (and warns) when the question's
    /// conditional fields are not active.
    pub fn set_field(&mut self, id: &QuestionId, field_name: &str, value: &str) -> bool {
        match self.fields.get_mut(id) {
            Some(values) => {
                values.insert(field_name.to_string(), value.to_string());
                true
            }
            None => {
                warn!(question_id = %id.0, field_name, "conditional fields inactive; ignoring edit");
                false
            }
        }
    }

    pub fn set_expired_flag(&mut self, id: &QuestionId, expired: bool) {
        self.expired_flags.insert(id.clone(), expired);
    }

    pub fn expired_flag(&self, id: &QuestionId) -> Option<bool> {
        self.expired_flags.get(id).copied()
    }

    pub fn any_flag_set(&self) -> bool {
        self.expired_flags.values().any(|flag| *flag)
    }

    /// Derive expiry facts for every stored date-valued field across all
    /// questions. Unparseable or empty values are skipped.
    pub fn field_expiries(&self, today: NaiveDate) -> Vec<(QuestionId, FieldExpiry)> {
        let mut expiries = Vec::new();
        for (id, values) in &self.fields {
            for (name, value) in values {
                if !is_expiry_field(name) {
                    continue;
                }
                if let Some(expiry) = field_expiry(name, value, today) {
                    expiries.push((id.clone(), expiry));
                }
            }
        }
        expiries
    }

    pub fn any_field_expired(&self, today: NaiveDate) -> bool {
        self.field_expiries(today)
            .iter()
            .any(|(_, expiry)| expiry.is_expired)
    }
}

/// Field names containing `expiry` or `expiration` carry dates.
pub(crate) fn is_expiry_field(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("expiry") || lowered.contains("expiration")
}

/// Compute expiry facts for one field value, or `None` when the value is
/// empty or does not parse as a date.
pub(crate) fn field_expiry(name: &str, value: &str, today: NaiveDate) -> Option<FieldExpiry> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }
    let Some(expires_on) = parse_expiry_date(raw) else {
        warn!(field_name = name, value = raw, "unparseable expiry date; treating as not expired");
        return None;
    };

    let days_until = (expires_on - today).num_days();
    Some(FieldExpiry {
        field_name: name.to_string(),
        expires_on,
        days_until,
        is_expired: days_until < 0,
        is_expiring_soon: (0..=EXPIRING_SOON_WINDOW_DAYS).contains(&days_until),
    })
}

fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

/// Append the fixed expiry note exactly once.
pub(crate) fn append_expiry_note(notes: &str) -> String {
    if notes.contains(EXPIRY_NOTE) {
        return notes.to_string();
    }
    if notes.is_empty() {
        EXPIRY_NOTE.to_string()
    } else {
        format!("{notes}\n{EXPIRY_NOTE}")
    }
}

/// Remove the fixed expiry note and trim the remainder. Idempotent: notes
/// without the note pass through trimmed only when the note was present.
pub(crate) fn strip_expiry_note(notes: &str) -> String {
    if !notes.contains(EXPIRY_NOTE) {
        return notes.to_string();
    }
    notes.replace(EXPIRY_NOTE, "").trim().to_string()
}
