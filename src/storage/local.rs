//! src/storage/local.rs
use crate::error::JobError;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Written last; its presence is what marks an output directory as complete.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// A job's output directory on the local filesystem.
#[derive(Debug)]
pub struct LocalStorage {
    root: PathBuf,
    /// Outermost ancestor of `root` that did not exist before `create`.
    created_parent: Option<PathBuf>,
}

impl LocalStorage {
    /// Creates the output directory. An existing directory is never reused.
    #[tracing::instrument(
        name = "Create output directory",
        skip_all,
        fields(path = %path.display())
    )]
    pub fn create(path: &Path) -> Result<Self, JobError> {
        let write_error = |source| JobError::WriteOutput {
            path: path.to_path_buf(),
            source,
        };
        let created_parent = path
            .ancestors()
            .skip(1)
            .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
            .last()
            .map(Path::to_path_buf);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        match fs::create_dir(path) {
            Ok(()) => Ok(Self {
                root: path.to_path_buf(),
                created_parent,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(JobError::OutputExists(path.to_path_buf()))
            }
            Err(e) => Err(write_error(e)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn part_path(&self, partition: usize) -> PathBuf {
        self.root.join(format!("part-r-{partition:05}"))
    }

    /// Writes `key<TAB>value` lines for one reduce partition and returns how many were written.
    #[tracing::instrument(name = "Write part", skip(self, records))]
    pub fn write_part<K: Display, V: Display>(
        &self,
        partition: usize,
        records: &[(K, V)],
    ) -> Result<u64, JobError> {
        let path = self.part_path(partition);
        let write_error = |source| JobError::WriteOutput {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        for (key, value) in records {
            writeln!(writer, "{key}\t{value}").map_err(write_error)?;
        }
        writer.flush().map_err(write_error)?;
        Ok(records.len() as u64)
    }

    #[tracing::instrument(name = "Commit output", skip(self), fields(path = %self.root.display()))]
    pub fn commit(&self) -> Result<(), JobError> {
        let path = self.root.join(SUCCESS_MARKER);
        File::create(&path).map_err(|source| JobError::WriteOutput { path, source })?;
        Ok(())
    }

    /// Removes everything this job wrote, including parent directories it had to
    /// create. Failures are logged, never returned.
    #[tracing::instrument(name = "Discard output", skip(self), fields(path = %self.root.display()))]
    pub fn discard(&self) {
        let target = self.created_parent.as_deref().unwrap_or(&self.root);
        if let Err(e) = fs::remove_dir_all(target) {
            tracing::warn!(error = %e, "Failed to remove incomplete output directory");
        }
    }
}
