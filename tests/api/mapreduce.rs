//! tests/api/mapreduce.rs
use crate::helpers::{
    annotations_dir, expected_annotation_counts, read_output, scratch_dir, settings,
};
use claims::{assert_err, assert_ok};
use gocount::error::JobError;
use gocount::job::JobStatus;
use gocount::mappers::{MALFORMED_RECORDS, MISSING_TERM_CODE};
use gocount::startup::{build_job, run};
use gocount::storage::SUCCESS_MARKER;
use std::fs;

#[tokio::test]
async fn should_count_annotations_in_a_directory() {
    let dir = scratch_dir();
    let output = dir.join("out");

    let report = assert_ok!(run(&annotations_dir(), &output, &settings(4, 3, true)).await);

    assert_eq!(read_output(&output), expected_annotation_counts());
    assert!(output.join(SUCCESS_MARKER).is_file());
    assert_eq!(report.map_tasks, 2);
    assert_eq!(report.reduce_tasks, 3);
    assert_eq!(report.counters.map_input_records, 10);
    assert_eq!(report.counters.map_output_records, 7);
    assert_eq!(report.counters.reduce_output_records, 5);
    assert_eq!(report.counters.skipped(MALFORMED_RECORDS), 1);
    assert_eq!(report.counters.skipped(MISSING_TERM_CODE), 1);
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn output_should_not_depend_on_parallelism_or_combining() {
    let dir = scratch_dir();
    for (i, (workers, reduce_tasks, combine)) in
        [(1, 1, false), (1, 5, true), (8, 2, false), (3, 7, true)]
            .into_iter()
            .enumerate()
    {
        let output = dir.join(format!("out-{i}"));
        let settings = settings(workers, reduce_tasks, combine);
        assert_ok!(run(&annotations_dir(), &output, &settings).await);
        assert_eq!(read_output(&output), expected_annotation_counts());
    }
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn a_single_file_should_be_accepted_as_input() {
    let dir = scratch_dir();
    let output = dir.join("out");

    assert_ok!(run(&annotations_dir().join("bsub.gaf"), &output, &settings(2, 2, true)).await);

    assert_eq!(
        read_output(&output),
        expected_annotation_counts()
            .into_iter()
            .filter(|line| line.starts_with("bsub.gaf"))
            .collect::<Vec<_>>()
    );
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn configured_term_codes_should_replace_the_defaults() {
    let dir = scratch_dir();
    let output = dir.join("out");
    let mut settings = settings(2, 1, true);
    settings.job.term_codes = vec!["GO:0045808".into(), " GO:0008150 ".into()];

    assert_ok!(run(&annotations_dir(), &output, &settings).await);

    assert_eq!(
        read_output(&output),
        vec![
            "bsub.gaf\tP12345\tGO:0008150\t1",
            "spne.gaf\tQ8DN\tGO:0045808\t2",
        ]
    );
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn a_missing_input_should_fail_without_creating_output() {
    let dir = scratch_dir();
    let output = dir.join("out");
    let mut job = build_job(&dir.join("nowhere"), &output, &settings(1, 1, true));

    let error = assert_err!(job.run().await);

    assert!(matches!(error, JobError::InputNotFound(_)));
    assert_eq!(job.status(), JobStatus::Failed);
    assert!(!output.exists());
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn an_existing_output_should_be_left_alone() {
    let dir = scratch_dir();
    let output = dir.join("out");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("keep.txt"), "keep").unwrap();

    let error = assert_err!(run(&annotations_dir(), &output, &settings(1, 1, true)).await);

    assert!(matches!(error, JobError::OutputExists(_)));
    assert_eq!(fs::read_to_string(output.join("keep.txt")).unwrap(), "keep");
    assert!(!output.join(SUCCESS_MARKER).exists());
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn an_output_below_a_regular_file_should_fail() {
    let dir = scratch_dir();
    let blocker = dir.join("afile");
    fs::write(&blocker, "data").unwrap();

    let result = run(&annotations_dir(), &blocker.join("out"), &settings(1, 1, true)).await;

    let error = assert_err!(result);
    assert!(matches!(error, JobError::WriteOutput { .. }));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "data");
    fs::remove_dir_all(dir).unwrap();
}
