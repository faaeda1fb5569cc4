//! Lifecycle tests for the backup orchestration.
//!
//! Drives `run_backup` against a scratch base directory with a recording
//! tool runner, verifying step ordering, argument wiring and lock handling
//! without spawning any external process.

use mirrorlock::run::{RunOutcome, run_backup};
use mirrorlock::test_support::{FailOn, RecordingToolRunner, ScratchBase, ToolCall};

#[test]
fn tools_run_in_order_with_expected_arguments() {
    let scratch = ScratchBase::new().expect("scratch");
    let source = scratch.create_source_file("notes.txt").expect("source");
    scratch
        .write_filelist(&[source.to_str().expect("utf-8 path")])
        .expect("filelist");
    let tools = RecordingToolRunner::new();

    let outcome = run_backup(&scratch.layout, "auditor", &tools).expect("run");

    assert_eq!(outcome, RunOutcome::Completed { mirrored: 1 });
    assert_eq!(
        tools.calls(),
        vec![
            ToolCall::Mirror {
                sources: vec![source],
                dest: scratch.layout.dest_dir.clone(),
            },
            ToolCall::SnapshotAcls {
                dest: scratch.layout.dest_dir.clone(),
                snapshot: scratch.layout.acl_snapshot_path.clone(),
            },
            ToolCall::RestrictAcls {
                dest: scratch.layout.dest_dir.clone(),
                account: "auditor".to_string(),
            },
        ]
    );
    assert!(!scratch.layout.lock_path.exists());
}

#[test]
fn missing_paths_are_dropped_before_mirroring() {
    let scratch = ScratchBase::new().expect("scratch");
    let kept = scratch.create_source_file("kept.txt").expect("source");
    let missing = scratch.layout.base.join("never-created.txt");
    scratch
        .write_filelist(&[
            "# nightly selection",
            kept.to_str().expect("utf-8 path"),
            "",
            missing.to_str().expect("utf-8 path"),
        ])
        .expect("filelist");
    let tools = RecordingToolRunner::new();

    run_backup(&scratch.layout, "backup", &tools).expect("run");

    match tools.calls().first() {
        Some(ToolCall::Mirror { sources, .. }) => assert_eq!(sources, &vec![kept]),
        other => panic!("expected mirror call first, got {other:?}"),
    }
}

#[test]
fn mirror_failure_stops_the_sequence_and_frees_the_lock() {
    let scratch = ScratchBase::new().expect("scratch");
    let source = scratch.create_source_file("notes.txt").expect("source");
    scratch
        .write_filelist(&[source.to_str().expect("utf-8 path")])
        .expect("filelist");
    let tools = RecordingToolRunner::failing_on(FailOn::Mirror);

    let err = run_backup(&scratch.layout, "backup", &tools).unwrap_err();

    assert!(err.to_string().contains("Mirror failed (injected)"));
    assert_eq!(tools.calls().len(), 1);
    assert!(matches!(tools.calls().first(), Some(ToolCall::Mirror { .. })));
    assert!(
        !scratch.layout.lock_path.exists(),
        "lock marker must be removed on failure"
    );
}

#[test]
fn snapshot_failure_skips_the_restrict_step() {
    let scratch = ScratchBase::new().expect("scratch");
    let source = scratch.create_source_file("notes.txt").expect("source");
    scratch
        .write_filelist(&[source.to_str().expect("utf-8 path")])
        .expect("filelist");
    let tools = RecordingToolRunner::failing_on(FailOn::SnapshotAcls);

    run_backup(&scratch.layout, "backup", &tools).unwrap_err();

    let steps: Vec<&'static str> = tools
        .calls()
        .iter()
        .map(|call| match call {
            ToolCall::Mirror { .. } => "mirror",
            ToolCall::SnapshotAcls { .. } => "snapshot",
            ToolCall::RestrictAcls { .. } => "restrict",
        })
        .collect();
    assert_eq!(steps, vec!["mirror", "snapshot"]);
    assert!(!scratch.layout.lock_path.exists());
}

#[test]
fn restrict_failure_still_frees_the_lock() {
    let scratch = ScratchBase::new().expect("scratch");
    let source = scratch.create_source_file("notes.txt").expect("source");
    scratch
        .write_filelist(&[source.to_str().expect("utf-8 path")])
        .expect("filelist");
    let tools = RecordingToolRunner::failing_on(FailOn::RestrictAcls);

    run_backup(&scratch.layout, "backup", &tools).unwrap_err();

    assert_eq!(tools.calls().len(), 3);
    assert!(!scratch.layout.lock_path.exists());
}

#[test]
fn missing_path_list_fails_before_locking() {
    let scratch = ScratchBase::new().expect("scratch");
    let tools = RecordingToolRunner::new();

    let err = run_backup(&scratch.layout, "backup", &tools).unwrap_err();

    assert!(format!("{err:#}").contains("read path list"));
    assert!(tools.calls().is_empty());
    assert!(!scratch.layout.lock_path.exists());
}
