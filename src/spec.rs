//! src/spec.rs
use std::path::{Path, PathBuf};

/// Where a job reads from, where it writes to, and how it is parallelised.
#[derive(Debug, Clone)]
pub struct JobSpecification {
    input: PathBuf,
    output: PathBuf,
    workers: usize,
    reduce_tasks: usize,
    combine: bool,
}

impl JobSpecification {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        JobSpecification {
            input: input.into(),
            output: output.into(),
            workers: 1,
            reduce_tasks: 1,
            combine: true,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn set_workers(&mut self, workers: usize) {
        self.workers = workers.max(1);
    }

    pub fn reduce_tasks(&self) -> usize {
        self.reduce_tasks
    }

    pub fn set_reduce_tasks(&mut self, reduce_tasks: usize) {
        self.reduce_tasks = reduce_tasks.max(1);
    }

    /// Whether map tasks pre-aggregate their output with the reducer.
    pub fn combine(&self) -> bool {
        self.combine
    }

    pub fn set_combine(&mut self, combine: bool) {
        self.combine = combine;
    }
}
