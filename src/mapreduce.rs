//! src/mapreduce.rs
use crate::error::JobError;
use crate::file_splitter::PartitionSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct InputSplit {
    id: Uuid,
    name: String,
    location: PathBuf,
}

impl InputSplit {
    pub fn new(name: &str, location: impl Into<PathBuf>) -> Self {
        InputSplit {
            id: Uuid::new_v4(),
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// The name records from this split are attributed to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

#[tracing::instrument(name = "Split inputs", skip_all)]
pub async fn split_inputs(source: Arc<dyn PartitionSource>) -> Result<Vec<InputSplit>, JobError> {
    let splits = tokio::task::spawn_blocking(move || source.splits()).await??;
    for split in &splits {
        tracing::debug!(
            split = split.name(),
            location = %split.location().display(),
            "input split"
        );
    }
    tracing::info!("{} input splits", splits.len());
    Ok(splits)
}
