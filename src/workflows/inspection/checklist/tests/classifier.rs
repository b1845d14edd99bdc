use super::common::*;
use crate::workflows::inspection::checklist::classifier::classify;
use crate::workflows::inspection::checklist::domain::{AnswerOption, AnswerPolarity};

#[test]
fn classification_is_case_and_whitespace_insensitive() {
    let question = plain_question("q-x", "Grease trap maintained", "Sanitation", &["Yes", "No"]);

    assert_eq!(classify(&question, " YES "), classify(&question, "yes"));
    assert_eq!(classify(&question, " YES "), AnswerPolarity::Positive);
    assert_eq!(classify(&question, "No"), AnswerPolarity::Negative);
}

#[test]
fn negative_keywords_win_over_positive_substrings() {
    // "Non-Present" contains "present" and "Non-Compliant" contains
    // "compliant"; the negative scan must run first.
    let question = plain_question(
        "q-x",
        "Sanitary Permit",
        "Permits",
        &["Present", "Non-Present", "Compliant", "Non-Compliant"],
    );

    assert_eq!(classify(&question, "Non-Present"), AnswerPolarity::Negative);
    assert_eq!(classify(&question, "Non-Compliant"), AnswerPolarity::Negative);
    assert_eq!(classify(&question, "Present"), AnswerPolarity::Positive);
    assert_eq!(classify(&question, "Compliant"), AnswerPolarity::Positive);
}

#[test]
fn keyword_set_covers_all_fixed_terms() {
    let negatives = ["Non-Present", "No", "Not Available", "Non-Functional", "Inoperational", "N/A"];
    let positives = ["Present", "Yes", "Available", "Functional", "Operational"];
    let mut options: Vec<&str> = negatives.to_vec();
    options.extend_from_slice(&positives);
    let question = plain_question("q-x", "Any requirement", "General", &options);

    for option in negatives {
        assert_eq!(classify(&question, option), AnswerPolarity::Negative, "{option}");
    }
    for option in positives {
        assert_eq!(classify(&question, option), AnswerPolarity::Positive, "{option}");
    }
}

#[test]
fn explicit_option_polarity_wins_over_keywords() {
    let question = typed_question();

    // Neither "Serviceable" nor "Condemned" matches the keyword sets.
    assert_eq!(classify(&question, "Serviceable"), AnswerPolarity::Positive);
    assert_eq!(classify(&question, "condemned"), AnswerPolarity::Negative);
}

#[test]
fn unmatched_option_text_is_neutral() {
    let question = plain_question(
        "q-x",
        "Pest control records",
        "Sanitation",
        &["Partially maintained"],
    );

    assert_eq!(
        classify(&question, "Partially maintained"),
        AnswerPolarity::Neutral
    );
}

#[test]
fn response_without_matching_option_is_neutral() {
    let question = plain_question("q-x", "Waste bins covered", "Sanitation", &["Yes", "No"]);

    assert_eq!(classify(&question, "Maybe"), AnswerPolarity::Neutral);
    assert_eq!(classify(&question, ""), AnswerPolarity::Neutral);
}

#[test]
fn classify_is_idempotent_under_repeated_calls() {
    let question = plain_question("q-x", "Sanitary Permit", "Permits", &["Present", "Non-Present"]);

    let first = classify(&question, "Non-Present");
    for _ in 0..3 {
        assert_eq!(classify(&question, "Non-Present"), first);
    }
}

#[test]
fn typed_options_deserialize_from_mixed_catalog_json() {
    let raw = r#"["Present", {"text": "Condemned", "type": "negative"}]"#;
    let options: Vec<AnswerOption> = serde_json::from_str(raw).expect("options parse");

    assert_eq!(options[0], AnswerOption::Text("Present".to_string()));
    assert_eq!(options[1].polarity_override(), Some(AnswerPolarity::Negative));
}
