mod common;

use common::fixtures::{alice, session, session_with, today, valid_user};
use dirty_tracker::{
    ExitAction, ExitLog, GateOutcome, Observation, PromptChoice, Surface, TrackerConfig,
    TrackerState,
    snapshot::snapshot_model::{FieldMap, FieldValue},
    tracker::tracker_model::IgnoreReason,
};

// =========================================================================
// Opening
// =========================================================================

#[test]
fn user_form_is_tracked_from_open() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());

    assert!(s.is_open());
    assert_eq!(s.state(), TrackerState::Active);
    assert!(!s.dirty());
    assert_eq!(
        s.tracker().baseline().as_str(),
        r#"{"username":"alice","password":"","selectedPatients":[1]}"#
    );
}

#[test]
fn blank_form_uses_schema_defaults() {
    let mut s = session(Surface::User);
    s.on_open(None, today());

    assert_eq!(s.fields().text("username"), "");
    assert_eq!(s.fields().get("selectedPatients"), Some(&FieldValue::Ids(vec![])));
}

#[test]
fn patient_record_is_formatted_for_inputs() {
    let record = FieldMap::new()
        .with("nom_complet", "Amina Ben Salah")
        .with("cin", 1234567i64)
        .with("date_naissance", "1980-05-17T00:00:00.000Z")
        .with("cause_fin", FieldValue::Null)
        .with("id", 42i64);

    let mut s = session(Surface::Patient);
    s.on_open(Some(&record), today());

    let f = s.fields();
    assert_eq!(f.text("date_naissance"), "1980-05-17");
    assert_eq!(f.text("cin"), "01234567");
    assert_eq!(f.text("cause_fin"), "");
    assert!(!f.contains_key("id"), "Unknown keys are not form fields");

    let keys: Vec<&str> = f.keys().collect();
    assert_eq!(keys.first(), Some(&"nom_complet"));
    assert_eq!(keys.last(), Some(&"cause_fin"));
}

#[test]
fn new_medical_record_opens_on_today() {
    let mut s = session(Surface::MedicalRecord);
    s.on_open(None, today());

    assert_eq!(s.current_snapshot().as_str(), r#"{"date":"2025-06-01","content":""}"#);
}

#[test]
fn unreadable_record_date_falls_back_to_today() {
    let record = FieldMap::new().with("date", "garbage").with("content", "<p>x</p>");

    let mut s = session(Surface::MedicalRecord);
    s.on_open(Some(&record), today());

    assert_eq!(
        s.current_snapshot().as_str(),
        r#"{"date":"2025-06-01","content":"<p>x</p>"}"#
    );
}

#[test]
fn unreadable_patient_date_stays_empty() {
    let record = FieldMap::new().with("date_naissance", "garbage");

    let mut s = session(Surface::Patient);
    s.on_open(Some(&record), today());

    assert_eq!(s.fields().text("date_naissance"), "");
}

#[test]
fn new_medical_record_saves_without_touching_the_date() {
    let mut s = session(Surface::MedicalRecord);
    s.on_open(None, today());
    s.mark_dependency_ready();
    s.tick();
    s.on_field_change("content", "<p>Séance sans incident</p>");

    let saved = s.submit(today()).unwrap();
    assert_eq!(saved.text("date"), "2025-06-01");
}

#[test]
fn patient_baseline_waits_two_cycles() {
    let mut s = session(Surface::Patient);
    s.on_open(None, today());
    assert_eq!(s.state(), TrackerState::Initializing);

    // Select widgets settle during the first cycles.
    assert_eq!(
        s.on_field_change("sexe", ""),
        Observation::Ignored(IgnoreReason::Initializing)
    );
    s.tick();
    s.tick();

    assert_eq!(s.state(), TrackerState::Active);
    s.on_field_change("nom_complet", "Amina");
    assert!(s.dirty());
}

// =========================================================================
// Editing
// =========================================================================

#[test]
fn edit_then_revert_is_clean() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());

    s.on_field_change("password", "x");
    assert!(s.dirty());

    s.on_field_change("password", "");
    assert!(!s.dirty());
}

#[test]
fn changing_authorized_patients_is_an_edit() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());

    s.on_field_change("selectedPatients", vec![1u64, 2]);
    assert!(s.dirty());
}

#[test]
fn edits_before_open_are_ignored() {
    let mut s = session(Surface::User);

    assert_eq!(
        s.on_field_change("username", "bob"),
        Observation::Ignored(IgnoreReason::Uninitialized)
    );
    assert!(!s.dirty());
}

#[test]
fn editor_normalization_is_not_an_edit() {
    let record = FieldMap::new().with("date", "2024-03-01").with("content", "");

    let mut s = session(Surface::MedicalRecord);
    s.on_open(Some(&record), today());

    // The editor mounts and rewrites empty content.
    s.on_field_change("content", "<p></p>");
    s.mark_dependency_ready();
    s.tick();

    assert_eq!(s.state(), TrackerState::Active);
    assert!(!s.dirty());

    s.on_field_change("content", "<p>Dialyse 3x/semaine</p>");
    assert!(s.dirty());
}

#[test]
fn antecedent_without_editor_stays_untracked() {
    let mut s = session(Surface::Antecedent);
    s.on_open(Some(&FieldMap::new().with("content", "<p>HTA</p>")), today());

    for _ in 0..10 {
        s.tick();
    }
    s.on_field_change("content", "<p>HTA, diabète</p>");

    assert_eq!(s.state(), TrackerState::Initializing);
    assert!(!s.dirty());
}

#[test]
fn antecedent_timeout_tracks_anyway() {
    let config = TrackerConfig {
        capture_timeout_cycles: Some(3),
        ..TrackerConfig::default()
    };
    let mut s = session_with(Surface::Antecedent, config);
    s.on_open(Some(&FieldMap::new().with("content", "<p>HTA</p>")), today());

    s.tick();
    s.tick();
    s.tick();
    s.on_field_change("content", "<p>HTA, diabète</p>");

    assert!(s.dirty());
}

// =========================================================================
// Saving
// =========================================================================

#[test]
fn successful_submit_resets_and_closes() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("password", "secret");
    s.on_field_change("selectedPatients", vec![1u64, 4]);
    assert!(s.dirty());

    let saved = s.submit(today()).unwrap();
    assert_eq!(saved, valid_user());
    assert!(!s.dirty());
    assert!(!s.is_open());
    assert_eq!(s.state(), TrackerState::Resetting);
}

#[test]
fn close_right_after_save_does_not_prompt() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("password", "secret");
    s.submit(today()).unwrap();

    let mut log = ExitLog::default();
    let outcome = s.confirm_close(&mut log);

    assert_eq!(outcome, GateOutcome::Proceeded(ExitAction::Close));
    assert!(!s.is_prompting());
}

#[test]
fn failed_submit_keeps_edits_and_dirty_flag() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("username", "al");

    let errors = s.submit(today()).unwrap_err();
    assert_eq!(
        errors.for_field("username"),
        Some("Username must be at least 3 characters")
    );
    assert!(s.is_open());
    assert!(s.dirty());
    assert_eq!(s.fields().text("username"), "al");
}

// =========================================================================
// Leaving
// =========================================================================

#[test]
fn clean_close_proceeds() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());

    let mut log = ExitLog::default();
    assert_eq!(s.confirm_close(&mut log), GateOutcome::Proceeded(ExitAction::Close));
    assert!(!s.is_open());
    assert!(s.fields().is_empty());
    assert_eq!(log.performed, vec![ExitAction::Close]);
}

#[test]
fn dirty_close_prompts_then_stay_keeps_editing() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("password", "x");

    let mut log = ExitLog::default();
    assert_eq!(s.confirm_close(&mut log), GateOutcome::Prompted);
    assert!(s.is_prompting());
    assert!(s.prompt().is_some());

    assert_eq!(s.resolve_prompt(PromptChoice::Stay, &mut log), GateOutcome::Stayed);
    assert!(s.is_open());
    assert!(s.dirty());
    assert_eq!(s.fields().text("password"), "x");
    assert!(log.performed.is_empty());
}

#[test]
fn dirty_category_switch_then_discard() {
    let mut s = session(Surface::Antecedent);
    s.on_open(Some(&FieldMap::new().with("content", "<p>HTA</p>")), today());
    s.mark_dependency_ready();
    s.tick();
    s.on_field_change("content", "<p>HTA, diabète</p>");
    assert!(s.dirty());

    let mut log = ExitLog::default();
    let target = ExitAction::ChangeCategory("Chirurgicaux".into());
    assert_eq!(s.request_exit(target.clone(), &mut log), GateOutcome::Prompted);
    assert_eq!(
        s.resolve_prompt(PromptChoice::Discard, &mut log),
        GateOutcome::Proceeded(target.clone())
    );

    assert_eq!(log.performed, vec![target]);
    assert!(!s.dirty());
    assert!(!s.is_open());
}

#[test]
fn explicit_close_drops_pending_prompt() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("password", "x");

    let mut log = ExitLog::default();
    s.confirm_close(&mut log);
    s.on_close();

    assert!(!s.is_prompting());
    assert!(!s.dirty());
    assert_eq!(s.resolve_prompt(PromptChoice::Discard, &mut log), GateOutcome::NoPrompt);
}

#[test]
fn discard_resets_without_gate() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("password", "x");

    s.on_discard();
    assert!(!s.dirty());
    assert!(!s.is_open());
}

#[test]
fn reopen_after_close_starts_a_fresh_baseline() {
    let mut s = session(Surface::User);
    s.on_open(Some(&alice()), today());
    s.on_field_change("password", "x");
    s.on_close();

    let bob = FieldMap::new()
        .with("username", "bob")
        .with("password", "")
        .with("selectedPatients", vec![2u64]);
    s.on_open(Some(&bob), today());
    s.tick();

    assert_eq!(s.state(), TrackerState::Active);
    assert!(!s.dirty());
    s.on_field_change("username", "bobby");
    assert!(s.dirty());
}
