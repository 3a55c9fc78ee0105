//! src/worker.rs
use crate::counters::Counters;
use crate::emitter::{CombiningEmitter, MapOutput, PartitionedEmitter};
use crate::error::JobError;
use crate::file_splitter::{PartitionSource, Records};
use crate::functions::{MapEmitter, MapInput, Mapper, Reducer};
use crate::mapreduce::InputSplit;
use crate::storage::LocalStorage;
use std::collections::{BTreeMap, VecDeque};
use std::fmt::{self, Display};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WorkerId(Uuid);

impl WorkerId {
    pub fn new() -> Self {
        WorkerId(Uuid::new_v4())
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a worker reports back for each task it ran.
#[derive(Debug)]
pub struct TaskOutcome<O> {
    pub task_id: Uuid,
    pub worker_id: WorkerId,
    pub result: Result<O, JobError>,
}

type TaskQueue<T> = Arc<Mutex<VecDeque<(Uuid, T)>>>;

struct Worker {
    id: WorkerId,
}

impl Worker {
    #[tracing::instrument(name = "Worker", skip_all, fields(worker_id = %self.id))]
    async fn run<T, O, F>(
        self,
        queue: TaskQueue<T>,
        results: mpsc::Sender<TaskOutcome<O>>,
        execute: Arc<F>,
    ) where
        T: Send + 'static,
        O: Send + 'static,
        F: Fn(T) -> Result<O, JobError> + Send + Sync + 'static,
    {
        loop {
            let next = queue.lock().await.pop_front();
            let Some((task_id, task)) = next else {
                break;
            };
            let execute = Arc::clone(&execute);
            let result = tokio::task::spawn_blocking(move || (*execute)(task))
                .await
                .unwrap_or_else(|e| Err(JobError::WorkerPanicked(e)));
            tracing::debug!(%task_id, ok = result.is_ok(), "task finished");
            let outcome = TaskOutcome {
                task_id,
                worker_id: self.id,
                result,
            };
            if results.send(outcome).await.is_err() {
                // Coordinator gave up on this phase.
                break;
            }
        }
    }
}

/// A fixed number of workers draining a shared task queue. Every task runs on the
/// blocking thread pool; outcomes arrive on the returned channel in completion order.
pub struct WorkerPool<T> {
    queue: TaskQueue<T>,
    handles: JoinSet<()>,
}

impl<T: Send + 'static> WorkerPool<T> {
    pub fn spawn<O, F>(
        workers: usize,
        tasks: Vec<(Uuid, T)>,
        execute: F,
    ) -> (Self, mpsc::Receiver<TaskOutcome<O>>)
    where
        O: Send + 'static,
        F: Fn(T) -> Result<O, JobError> + Send + Sync + 'static,
    {
        let workers = workers.max(1);
        let queue: TaskQueue<T> = Arc::new(Mutex::new(tasks.into_iter().collect()));
        let execute = Arc::new(execute);
        let (tx, rx) = mpsc::channel(workers);
        let mut handles = JoinSet::new();
        for _ in 0..workers {
            let worker = Worker { id: WorkerId::new() };
            handles.spawn(worker.run(Arc::clone(&queue), tx.clone(), Arc::clone(&execute)));
        }
        (Self { queue, handles }, rx)
    }

    /// Stops handing out queued tasks and waits for the ones already running.
    /// Their outcomes are dropped along with `results`.
    pub async fn cancel<O>(self, results: mpsc::Receiver<TaskOutcome<O>>) -> Result<(), JobError> {
        drop(results);
        self.queue.lock().await.clear();
        self.join().await
    }

    pub async fn join(mut self) -> Result<(), JobError> {
        while let Some(joined) = self.handles.join_next().await {
            joined?;
        }
        Ok(())
    }
}

fn map_records<M, E>(
    records: Records,
    split: &InputSplit,
    mapper: &M,
    emitter: &mut E,
) -> Result<u64, JobError>
where
    M: Mapper,
    E: MapEmitter<M::Key, M::Value>,
{
    let mut count = 0;
    for line in records {
        let line = line.map_err(|source| JobError::ReadPartition {
            path: split.location().to_path_buf(),
            source,
        })?;
        mapper.map(&MapInput::new(split.name(), line), emitter);
        count += 1;
    }
    Ok(count)
}

/// Runs the mapper over one split, bucketing its output into `reduce_tasks` partitions.
#[tracing::instrument(name = "Map task", skip_all, fields(split = split.name()))]
pub fn execute_map<M, C>(
    source: &dyn PartitionSource,
    split: &InputSplit,
    mapper: &M,
    combiner: Option<&C>,
    reduce_tasks: usize,
) -> Result<MapOutput<M::Key, M::Value>, JobError>
where
    M: Mapper,
    C: Reducer<M::Key, Value = M::Value>,
{
    let records = source.open(split)?;
    let output = match combiner {
        Some(combiner) => {
            let mut emitter = CombiningEmitter::new(combiner, reduce_tasks);
            let input_records = map_records(records, split, mapper, &mut emitter)?;
            emitter.counters_mut().map_input_records = input_records;
            emitter.into_output()
        }
        None => {
            let mut emitter = PartitionedEmitter::new(reduce_tasks);
            let input_records = map_records(records, split, mapper, &mut emitter)?;
            emitter.counters_mut().map_input_records = input_records;
            emitter.into_output()
        }
    };
    tracing::debug!(
        input_records = output.counters.map_input_records,
        output_records = output.counters.map_output_records,
        "map task done"
    );
    Ok(output)
}

/// Groups one reduce partition by key, folds each group and writes the result.
#[tracing::instrument(name = "Reduce task", skip(pairs, reducer, storage))]
pub fn execute_reduce<K, R>(
    partition: usize,
    pairs: Vec<(K, R::Value)>,
    reducer: &R,
    storage: &LocalStorage,
) -> Result<Counters, JobError>
where
    K: Ord + Display,
    R: Reducer<K>,
    R::Value: Display,
{
    let mut groups: BTreeMap<K, Vec<R::Value>> = BTreeMap::new();
    for (key, value) in pairs {
        groups.entry(key).or_default().push(value);
    }

    let mut counters = Counters {
        reduce_input_groups: groups.len() as u64,
        ..Default::default()
    };
    if groups.is_empty() {
        return Ok(counters);
    }

    let records: Vec<(K, R::Value)> = groups
        .into_iter()
        .map(|(key, values)| {
            let value = reducer.reduce(&key, values.into_iter());
            (key, value)
        })
        .collect();
    counters.reduce_output_records = storage.write_part(partition, &records)?;
    Ok(counters)
}
