//! tests/api/cli.rs
use crate::helpers::{annotations_dir, expected_annotation_counts, read_output, scratch_dir};
use gocount::storage::SUCCESS_MARKER;
use std::fs;
use std::process::{Command, Output};

fn gocount(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gocount"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("Failed to run gocount")
}

#[test]
fn should_exit_zero_and_write_counts() {
    let dir = scratch_dir();
    let output = dir.join("out");

    let out = gocount(&[annotations_dir().as_os_str(), output.as_os_str()]);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(read_output(&output), expected_annotation_counts());
    assert!(output.join(SUCCESS_MARKER).is_file());
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn flags_should_override_configuration() {
    let dir = scratch_dir();
    let output = dir.join("out");
    let input = annotations_dir();

    let out = gocount(&[
        input.as_os_str(),
        output.as_os_str(),
        "--workers".as_ref(),
        "2".as_ref(),
        "--reduce-tasks".as_ref(),
        "1".as_ref(),
        "--no-combine".as_ref(),
        "--term-code".as_ref(),
        "GO:0045304".as_ref(),
    ]);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(output.join("part-r-00000")).unwrap(),
        "spne.gaf\tQ8DN\tGO:0045304\t1\n"
    );
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn a_missing_input_should_exit_one() {
    let dir = scratch_dir();
    let input = dir.join("nowhere");
    let output = dir.join("out");

    let out = gocount(&[input.as_os_str(), output.as_os_str()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!output.exists());
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn an_existing_output_should_exit_one() {
    let dir = scratch_dir();

    let out = gocount(&[annotations_dir().as_os_str(), dir.as_os_str()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.join(SUCCESS_MARKER).exists());
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_arguments_should_exit_one() {
    let out = gocount(&[annotations_dir().as_os_str()]);
    assert_eq!(out.status.code(), Some(1));

    let out = gocount(&[]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn help_should_exit_zero() {
    let out = gocount(&["--help".as_ref()]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
}

#[test]
fn an_unwritable_output_should_exit_one() {
    let dir = scratch_dir();
    let blocker = dir.join("afile");
    fs::write(&blocker, "data").unwrap();
    let output = blocker.join("out");

    let out = gocount(&[annotations_dir().as_os_str(), output.as_os_str()]);

    assert_eq!(out.status.code(), Some(1));
    fs::remove_dir_all(dir).unwrap();
}
