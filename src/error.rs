//! src/error.rs
use std::path::PathBuf;

#[derive(thiserror::Error)]
pub enum JobError {
    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
    #[error("Output directory already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Failed to list input path: {path}")]
    ListInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read input split: {path}")]
    ReadPartition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write output: {path}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("A worker task panicked or was cancelled")]
    WorkerPanicked(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

pub fn error_chain_fmt(
    f: &mut std::fmt::Formatter<'_>,
    e: &impl std::error::Error,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
