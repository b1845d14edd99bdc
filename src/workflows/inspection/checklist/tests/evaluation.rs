use chrono::Duration;

use super::common::*;
use crate::workflows::inspection::checklist::domain::ComplianceVerdict;
use crate::workflows::inspection::checklist::session::InspectionSession;

#[test]
fn empty_session_is_compliant_with_zero_progress() {
    let session = session();

    let snapshot = session.snapshot(fixed_today());

    assert_eq!(snapshot.verdict, ComplianceVerdict::Compliant);
    assert_eq!(snapshot.progress.answered, 0);
    assert_eq!(snapshot.progress.percentage, 0);
    assert!(snapshot.recommendations.is_empty());
}

#[test]
fn any_negative_answer_forces_not_compliant() {
    let mut session = session();
    session.set_response(&qid("q-permit"), "Present");
    session.set_response(&qid("q-handwash"), "Available");
    session.set_response(&qid("q-housekeeping"), "No");

    let snapshot = session.snapshot(fixed_today());

    assert_eq!(snapshot.verdict, ComplianceVerdict::NotCompliant);
}

#[test]
fn all_positive_without_expiry_is_compliant() {
    let mut session = session();
    session.set_response(&qid("q-permit"), "Present");
    session.set_response(&qid("q-handwash"), "Available");
    session.set_response(&qid("q-extinguisher"), "Serviceable");
    session.set_response(&qid("q-housekeeping"), "Yes");

    let snapshot = session.snapshot(fixed_today());

    assert_eq!(snapshot.verdict, ComplianceVerdict::Compliant);
    assert_eq!(snapshot.progress.percentage, 100);
}

#[test]
fn expired_checkbox_overrides_all_positive_answers() {
    let mut session = session();
    session.set_response(&qid("q-permit"), "Present");
    session.set_response(&qid("q-handwash"), "Available");
    session.set_response(&qid("q-extinguisher"), "Serviceable");
    session.set_response(&qid("q-housekeeping"), "Yes");
    session.set_expired_flag(&qid("q-permit"), true);

    let snapshot = session.snapshot(fixed_today());

    assert_eq!(snapshot.verdict, ComplianceVerdict::NotCompliant);
}

#[test]
fn expired_date_field_overrides_single_positive_answer() {
    let today = fixed_today();
    let mut session = InspectionSession::new(super::common::catalog());
    session.set_response(&qid("q-permit"), "Present");
    session.set_field(
        &qid("q-permit"),
        "expiry_date",
        &(today - Duration::days(1)).to_string(),
    );

    let snapshot = session.snapshot(today);

    assert_eq!(snapshot.verdict, ComplianceVerdict::NotCompliant);
}

#[test]
fn neutral_answers_keep_the_verdict_compliant_despite_expiry() {
    let mut session = session();
    session.set_response(&qid("q-permit"), "Present");
    // Free-text answer that matches no configured option.
    session.set_response(&qid("q-housekeeping"), "Partially");
    session.set_expired_flag(&qid("q-permit"), true);

    let snapshot = session.snapshot(fixed_today());

    // Not all answers are positive, so the expiry source does not flip the
    // verdict on its own.
    assert_eq!(snapshot.verdict, ComplianceVerdict::Compliant);
}

#[test]
fn clearing_the_expired_flag_restores_compliance() {
    let mut session = session();
    session.set_response(&qid("q-permit"), "Present");
    session.set_response(&qid("q-handwash"), "Available");
    session.set_response(&qid("q-extinguisher"), "Serviceable");
    session.set_response(&qid("q-housekeeping"), "Yes");
    session.set_expired_flag(&qid("q-permit"), true);
    session.set_expired_flag(&qid("q-permit"), false);

    let snapshot = session.snapshot(fixed_today());

    assert_eq!(snapshot.verdict, ComplianceVerdict::Compliant);
}

#[test]
fn progress_counts_non_empty_answers_over_the_whole_catalog() {
    let mut session = InspectionSession::new(ten_question_catalog());
    for n in 1..=4 {
        session.set_response(&qid(&format!("q-{n:02}")), "Yes");
    }

    let snapshot = session.snapshot(fixed_today());

    assert_eq!(snapshot.progress.answered, 4);
    assert_eq!(snapshot.progress.total, 10);
    assert_eq!(snapshot.progress.percentage, 40);
}

#[test]
fn cleared_answers_do_not_count_toward_progress() {
    let mut session = InspectionSession::new(ten_question_catalog());
    session.set_response(&qid("q-01"), "Yes");
    session.set_response(&qid("q-02"), "Yes");
    session.set_response(&qid("q-02"), "");

    let snapshot = session.snapshot(fixed_today());

    // The cleared response entry survives; only its text is empty.
    assert!(session.response(&qid("q-02")).is_some());
    assert_eq!(snapshot.progress.answered, 1);
    assert_eq!(snapshot.progress.percentage, 10);
}

#[test]
fn verdict_is_recomputed_rather_than_cached() {
    let mut session = session();
    session.set_response(&qid("q-housekeeping"), "No");
    assert_eq!(
        session.snapshot(fixed_today()).verdict,
        ComplianceVerdict::NotCompliant
    );

    session.set_response(&qid("q-housekeeping"), "Yes");
    assert_eq!(
        session.snapshot(fixed_today()).verdict,
        ComplianceVerdict::Compliant
    );
}
