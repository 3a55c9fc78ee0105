//! src/file_splitter.rs
use crate::error::JobError;
use crate::mapreduce::InputSplit;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

/// Lines of one split, in file order.
pub type Records = Box<dyn Iterator<Item = std::io::Result<String>> + Send>;

/// Where the input splits of a job come from.
pub trait PartitionSource: Send + Sync + 'static {
    fn splits(&self) -> Result<Vec<InputSplit>, JobError>;

    fn open(&self, split: &InputSplit) -> Result<Records, JobError>;
}

/// Names starting with `_` or `.` are bookkeeping files (markers, editor swap files)
/// and never treated as input.
fn is_hidden(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

fn read_lines<R: BufRead + Send + 'static>(reader: R) -> Records {
    Box::new(reader.split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            String::from_utf8(bytes)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
        })
    }))
}

/// One split per regular file of a directory, or a single split when pointed at a file.
#[derive(Debug, Clone)]
pub struct DirectorySplitter {
    path: PathBuf,
}

impl DirectorySplitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DirectorySplitter { path: path.into() }
    }

    fn list_error(&self, source: std::io::Error) -> JobError {
        JobError::ListInput {
            path: self.path.clone(),
            source,
        }
    }
}

impl PartitionSource for DirectorySplitter {
    #[tracing::instrument(
        name = "List input directory",
        skip(self),
        fields(path = %self.path.display())
    )]
    fn splits(&self) -> Result<Vec<InputSplit>, JobError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JobError::InputNotFound(self.path.clone()));
            }
            Err(e) => return Err(self.list_error(e)),
        };

        if metadata.is_file() {
            let name = self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string());
            return Ok(vec![InputSplit::new(&name, &self.path)]);
        }

        let mut splits = vec![];
        for entry in fs::read_dir(&self.path).map_err(|e| self.list_error(e))? {
            let entry = entry.map_err(|e| self.list_error(e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_hidden(&name) {
                tracing::trace!(name = %name, "skipping hidden file");
                continue;
            }
            let path = entry.path();
            let metadata = fs::metadata(&path).map_err(|source| JobError::ListInput {
                path: path.clone(),
                source,
            })?;
            if !metadata.is_file() {
                tracing::debug!(name = %name, "skipping non-file entry");
                continue;
            }
            splits.push(InputSplit::new(&name, path));
        }
        splits.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(splits)
    }

    fn open(&self, split: &InputSplit) -> Result<Records, JobError> {
        let file = File::open(split.location()).map_err(|source| JobError::ReadPartition {
            path: split.location().to_path_buf(),
            source,
        })?;
        Ok(read_lines(BufReader::new(file)))
    }
}

/// Named line sets held in memory. Each name becomes one split.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    files: BTreeMap<String, Arc<Vec<String>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<I, S>(mut self, name: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_file(name, lines);
        self
    }

    pub fn add_file<I, S>(&mut self, name: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.files.insert(name.to_string(), Arc::new(lines));
    }
}

impl PartitionSource for InMemorySource {
    fn splits(&self) -> Result<Vec<InputSplit>, JobError> {
        Ok(self
            .files
            .keys()
            .map(|name| InputSplit::new(name, name))
            .collect())
    }

    fn open(&self, split: &InputSplit) -> Result<Records, JobError> {
        let lines = self
            .files
            .get(split.name())
            .cloned()
            .ok_or_else(|| JobError::ReadPartition {
                path: split.location().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such split"),
            })?;
        Ok(Box::new(
            (0..lines.len()).map(move |i| Ok::<_, std::io::Error>(lines[i].clone())),
        ))
    }
}
