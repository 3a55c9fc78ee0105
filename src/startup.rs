//! src/startup.rs
use crate::configuration::Settings;
use crate::error::JobError;
use crate::file_splitter::DirectorySplitter;
use crate::job::{JobReport, MapReduceJob};
use crate::mappers::GoTermMapper;
use crate::reducers::Adder;
use crate::spec::JobSpecification;
use std::path::Path;
use std::sync::Arc;

pub type GoCountJob = MapReduceJob<GoTermMapper, Adder>;

/// Counts configured term codes per (file, object id, term code) over the files in `input`.
pub fn build_job(input: &Path, output: &Path, settings: &Settings) -> GoCountJob {
    let mut spec = JobSpecification::new(input, output);
    spec.set_workers(settings.cluster.workers);
    spec.set_reduce_tasks(settings.cluster.reduce_tasks);
    spec.set_combine(settings.job.combine);

    let mapper = GoTermMapper::new(settings.job.term_code_set());
    if mapper.term_codes().is_empty() {
        tracing::warn!("No term codes configured, nothing will be counted");
    }
    let source = Arc::new(DirectorySplitter::new(spec.input()));

    MapReduceJob::new(spec, source, mapper, Adder)
}

#[tracing::instrument(name = "Count GO terms", skip(settings))]
pub async fn run(input: &Path, output: &Path, settings: &Settings) -> Result<JobReport, JobError> {
    let mut job = build_job(input, output, settings);
    tracing::info!(
        job_id = %job.id(),
        workers = job.spec().workers(),
        reduce_tasks = job.spec().reduce_tasks(),
        combine = job.spec().combine(),
        "submitting job"
    );
    job.run().await
}
