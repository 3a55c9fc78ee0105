//! tests/api/spec.rs
use gocount::spec::JobSpecification;
use std::path::Path;

#[test]
fn a_new_job_specification_should_run_serially_with_a_combiner() {
    let spec = JobSpecification::new("in", "out");
    assert_eq!(spec.input(), Path::new("in"));
    assert_eq!(spec.output(), Path::new("out"));
    assert_eq!(spec.workers(), 1);
    assert_eq!(spec.reduce_tasks(), 1);
    assert!(spec.combine());
}

#[test]
fn you_should_be_able_to_tune_a_job_specification() {
    let mut spec = JobSpecification::new("in", "out");
    spec.set_workers(8);
    spec.set_reduce_tasks(3);
    spec.set_combine(false);

    assert_eq!(spec.workers(), 8);
    assert_eq!(spec.reduce_tasks(), 3);
    assert!(!spec.combine());
}

#[test]
fn zero_workers_or_reduce_tasks_should_be_raised_to_one() {
    let mut spec = JobSpecification::new("in", "out");
    spec.set_workers(0);
    spec.set_reduce_tasks(0);

    assert_eq!(spec.workers(), 1);
    assert_eq!(spec.reduce_tasks(), 1);
}
