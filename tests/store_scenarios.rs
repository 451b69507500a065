//! End-to-end scenarios against file-backed storage.

use job_tracker::id::{RandomIdSupplier, SequentialIdSupplier};
use job_tracker::job::{
    visible_jobs, EditSession, FilterSelection, JobPatch, JobRecordInput, JobStore, Status,
    StoreError,
};
use job_tracker::storage::{FileStorage, Persistence, DEFAULT_STORAGE_KEY};

#[test]
fn collection_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let saved = {
        let mut store = JobStore::open(
            FileStorage::new(dir.path()),
            RandomIdSupplier,
            DEFAULT_STORAGE_KEY,
        );
        store
            .add(JobRecordInput::new("Saab", "Front-end developer", "2025-09-15"))
            .unwrap();
        let volvo = store
            .add(
                JobRecordInput::new("Volvo", "Backend developer", "2025-09-18")
                    .with_notes("Recruiter: Anna"),
            )
            .unwrap();
        store
            .update(
                &volvo.id,
                JobPatch {
                    status: Some(Status::Interviewing),
                    ..Default::default()
                },
            )
            .unwrap();
        store.jobs().to_vec()
    };

    let reopened = JobStore::open(
        FileStorage::new(dir.path()),
        RandomIdSupplier,
        DEFAULT_STORAGE_KEY,
    );
    assert_eq!(reopened.jobs(), saved.as_slice());
}

#[test]
fn first_run_and_corrupt_file_both_start_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::open(
        FileStorage::new(dir.path()),
        SequentialIdSupplier::default(),
        DEFAULT_STORAGE_KEY,
    );
    assert!(store.is_empty());

    std::fs::write(dir.path().join("jobList.json"), "[{\"broken\": ").unwrap();
    let store = JobStore::open(
        FileStorage::new(dir.path()),
        SequentialIdSupplier::default(),
        DEFAULT_STORAGE_KEY,
    );
    assert!(store.is_empty());
}

#[test]
fn legacy_index_statuses_are_rewritten_as_names() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = r#"[
        {"id":"a","companyName":"Saab","title":"Dev","dateApplied":"2025-09-15","status":0},
        {"id":"b","companyName":"Volvo","title":"Dev","dateApplied":"2025-09-16","status":3}
    ]"#;
    std::fs::write(dir.path().join("jobList.json"), legacy).unwrap();

    let mut store = JobStore::open(
        FileStorage::new(dir.path()),
        SequentialIdSupplier::default(),
        DEFAULT_STORAGE_KEY,
    );
    assert_eq!(store.jobs()[1].status, Status::Rejected);

    store.remove("a").unwrap();
    let raw = FileStorage::new(dir.path())
        .read(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    assert!(raw.contains("\"status\":\"Rejected\""));
    assert!(!raw.contains("\"id\":\"a\""));
}

#[test]
fn unwritable_storage_keeps_session_usable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();

    let mut store = JobStore::open(
        FileStorage::new(&blocker),
        SequentialIdSupplier::default(),
        DEFAULT_STORAGE_KEY,
    );
    let err = store
        .add(JobRecordInput::new("Saab", "Dev", "2025-09-15"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.is_dirty());

    let visible = store.visible(FilterSelection::Status(Status::Applied));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].company_name, "Saab");
}

#[test]
fn edit_filter_and_cancel_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JobStore::open(
        FileStorage::new(dir.path()),
        SequentialIdSupplier::default(),
        DEFAULT_STORAGE_KEY,
    );
    let first = store
        .add(JobRecordInput::new("Saab", "Dev", "2025-09-15"))
        .unwrap();
    let second = store
        .add(JobRecordInput::new("Volvo", "Dev", "2025-09-16").with_status(Status::Interviewing))
        .unwrap();

    let mut session = EditSession::default();
    session.begin(&first);
    session.draft_mut().unwrap().status = Status::Offered;
    session.cancel();
    assert_eq!(store.get(&first.id).unwrap().status, Status::Applied);

    let interviewing = visible_jobs(store.jobs(), FilterSelection::Status(Status::Interviewing));
    assert_eq!(interviewing, vec![&second]);

    session.begin(&second);
    session.draft_mut().unwrap().status = Status::Offered;
    session.submit(&mut store).unwrap();

    assert!(visible_jobs(store.jobs(), FilterSelection::Status(Status::Interviewing)).is_empty());
    let offered = store.visible(FilterSelection::Status(Status::Offered));
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].id, second.id);
}
