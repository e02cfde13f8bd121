use std::fs;

use chrono::{TimeZone, Utc};
use evidly_audit::workflows::audit::{
    AuditPhase, AuditWorkflow, DraftStore, FileDraftStore, ItemVerdict, MemoryDraftStore,
    SessionDraft, Severity,
};

fn started_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 20, 9, 30, 0).single().expect("valid timestamp")
}

fn temp_draft_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("evidly-audit-{tag}-{}.json", std::process::id()))
}

#[test]
fn resume_reproduces_sections_and_cursor() {
    let store = MemoryDraftStore::new();
    let mut first = AuditWorkflow::new(store.clone());
    first.start(started_at());
    first.set_status(0, 0, ItemVerdict::Pass).expect("pass");
    first.set_status(0, 2, ItemVerdict::Fail).expect("fail");
    first
        .set_severity(0, 2, Severity::Critical)
        .expect("severity");
    first
        .set_notes(0, 2, "Cooling exceeded two hours")
        .expect("notes");
    first.next_section().expect("navigate");
    first.set_status(1, 1, ItemVerdict::NotApplicable).expect("na");

    let original = first.session().expect("active").clone();

    // Simulate a restart: a fresh workflow sharing the same durable store.
    let mut revived = AuditWorkflow::new(store);
    assert!(revived.has_draft());
    revived.resume(Utc::now()).expect("draft resumes");

    assert_eq!(revived.phase(), AuditPhase::Walkthrough);
    let restored = revived.session().expect("restored session");
    assert_eq!(restored, &original);
    assert_eq!(restored.current_section_index(), 1);
    assert_eq!(restored.started_at(), started_at());
}

#[test]
fn resume_without_a_draft_is_a_recoverable_condition() {
    let mut workflow = AuditWorkflow::new(MemoryDraftStore::new());
    let err = workflow.resume(Utc::now()).expect_err("nothing saved");
    assert_eq!(
        err,
        evidly_audit::workflows::audit::AuditError::NoDraft
    );
    assert_eq!(workflow.phase(), AuditPhase::Overview);
}

#[test]
fn partial_draft_falls_back_to_template_defaults() {
    let store = MemoryDraftStore::new();
    let mut seeded = AuditWorkflow::new(store.clone());
    seeded.start(started_at());
    seeded.set_status(0, 0, ItemVerdict::Pass).expect("pass");

    // Truncate the saved draft to a single section and push the cursor out
    // of range, as a stale or hand-damaged checkpoint might.
    let mut draft = store.restore().expect("draft exists");
    draft.sections.truncate(1);
    draft.sections[0].items.truncate(2);
    draft.current_section = 99;
    draft.started_at = None;
    let mut store_handle = store.clone();
    store_handle.checkpoint(&draft).expect("write tampered draft");

    let mut revived = AuditWorkflow::new(store);
    revived.resume(Utc::now()).expect("partial draft resumes");

    let session = revived.session().expect("restored");
    assert_eq!(session.sections().len(), 7, "missing sections come from the template");
    assert_eq!(session.answered_count(), 1, "surviving answer is kept");
    assert_eq!(session.current_section_index(), 6, "cursor clamps to the last section");
}

#[test]
fn checkpoint_failure_never_interrupts_the_audit() {
    let mut workflow = AuditWorkflow::new(MemoryDraftStore::failing());
    workflow.start(started_at());

    workflow
        .set_status(0, 0, ItemVerdict::Pass)
        .expect("answer applies despite failed checkpoint");

    let session = workflow.session().expect("active");
    assert_eq!(session.answered_count(), 1);
    assert!(!workflow.has_draft(), "nothing was persisted");
}

#[test]
fn file_store_round_trips_a_draft() {
    let path = temp_draft_path("roundtrip");
    let _ = fs::remove_file(&path);

    let mut workflow = AuditWorkflow::new(FileDraftStore::new(&path));
    workflow.start(started_at());
    workflow.set_status(0, 0, ItemVerdict::Pass).expect("pass");
    workflow.set_status(0, 1, ItemVerdict::Fail).expect("fail");
    let original = workflow.session().expect("active").clone();

    let mut revived = AuditWorkflow::new(FileDraftStore::new(&path));
    revived.resume(Utc::now()).expect("file draft resumes");
    assert_eq!(revived.session().expect("restored"), &original);

    revived.reset();
    assert!(!path.exists(), "reset deletes the file");
}

#[test]
fn corrupt_file_draft_resolves_to_no_draft() {
    let path = temp_draft_path("corrupt");
    fs::write(&path, "{ this is not json").expect("write corrupt payload");

    let store = FileDraftStore::new(&path);
    assert!(store.restore().is_none());

    let mut workflow = AuditWorkflow::new(store);
    assert!(workflow.resume(Utc::now()).is_err());
    assert_eq!(workflow.phase(), AuditPhase::Overview);

    let _ = fs::remove_file(&path);
}

#[test]
fn discarding_an_absent_file_draft_is_not_an_error() {
    let path = temp_draft_path("absent");
    let _ = fs::remove_file(&path);

    let mut store = FileDraftStore::new(&path);
    store.discard().expect("absent draft discards cleanly");
}

#[test]
fn newer_checkpoints_supersede_older_ones() {
    let store = MemoryDraftStore::new();
    let mut workflow = AuditWorkflow::new(store.clone());
    workflow.start(started_at());

    workflow.set_status(0, 0, ItemVerdict::Pass).expect("pass");
    let earlier = store.restore().expect("first checkpoint");

    workflow.set_status(0, 0, ItemVerdict::NotApplicable).expect("na");
    let later = store.restore().expect("second checkpoint");

    assert_ne!(earlier, later, "overwrite semantics, last write wins");
    let fresh: SessionDraft = later;
    assert_eq!(
        fresh.sections[0].items[0],
        evidly_audit::workflows::audit::ItemStatus::NotApplicable
    );
}
