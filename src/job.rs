//! src/job.rs
use crate::counters::Counters;
use crate::error::JobError;
use crate::file_splitter::PartitionSource;
use crate::functions::{Mapper, Reducer};
use crate::mapreduce::{InputSplit, split_inputs};
use crate::master::{Master, TaskState};
use crate::spec::JobSpecification;
use crate::storage::LocalStorage;
use crate::worker::{WorkerPool, execute_map, execute_reduce};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: Uuid,
    pub map_tasks: usize,
    pub reduce_tasks: usize,
    pub counters: Counters,
    pub output: PathBuf,
}

/// Intermediate pairs of every map task, one bucket per reduce partition.
type Shuffle<K, V> = Vec<Vec<(K, V)>>;

pub struct MapReduceJob<M, R> {
    id: Uuid,
    spec: JobSpecification,
    source: Arc<dyn PartitionSource>,
    mapper: Arc<M>,
    reducer: Arc<R>,
    status: JobStatus,
}

impl<M, R> MapReduceJob<M, R>
where
    M: Mapper,
    R: Reducer<M::Key, Value = M::Value>,
{
    pub fn new(
        spec: JobSpecification,
        source: Arc<dyn PartitionSource>,
        mapper: M,
        reducer: R,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
            source,
            mapper: Arc::new(mapper),
            reducer: Arc::new(reducer),
            status: JobStatus::Submitted,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn spec(&self) -> &JobSpecification {
        &self.spec
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    fn set_status(&mut self, status: JobStatus) {
        tracing::info!(?status, "job status changed");
        self.status = status;
    }

    /// Runs the job to completion. On failure nothing this job wrote is left behind.
    #[tracing::instrument(
        name = "Run MapReduceJob",
        skip_all,
        fields(job_id = %self.id, input = %self.spec.input().display())
    )]
    pub async fn run(&mut self) -> Result<JobReport, JobError> {
        self.set_status(JobStatus::Running);
        let result = self.try_run().await;
        match &result {
            Ok(_) => self.set_status(JobStatus::Succeeded),
            Err(e) => {
                tracing::error!(error = ?e, "job failed");
                self.set_status(JobStatus::Failed);
            }
        }
        result
    }

    async fn try_run(&self) -> Result<JobReport, JobError> {
        // A missing or unreadable input is reported before the output is touched.
        let splits = split_inputs(Arc::clone(&self.source)).await?;
        let storage = Arc::new(LocalStorage::create(self.spec.output())?);
        let result = self.execute(splits, &storage).await;
        if result.is_err() {
            storage.discard();
        }
        result
    }

    async fn execute(
        &self,
        splits: Vec<InputSplit>,
        storage: &Arc<LocalStorage>,
    ) -> Result<JobReport, JobError> {
        let mut master = Master::new(splits, self.spec.reduce_tasks());
        let mut counters = Counters::default();

        let shuffle = self.run_map_phase(&mut master, &mut counters).await?;
        self.run_reduce_phase(&mut master, shuffle, storage, &mut counters)
            .await?;
        storage.commit()?;

        tracing::info!("job counters:\n{counters}");
        Ok(JobReport {
            job_id: self.id,
            map_tasks: master.map_tasks().len(),
            reduce_tasks: master.reduce_task_count(),
            counters,
            output: storage.root().to_path_buf(),
        })
    }

    #[tracing::instrument(name = "Map phase", skip_all)]
    async fn run_map_phase(
        &self,
        master: &mut Master,
        counters: &mut Counters,
    ) -> Result<Shuffle<M::Key, M::Value>, JobError> {
        let reduce_tasks = master.reduce_task_count();
        let tasks: Vec<(Uuid, InputSplit)> = master
            .map_tasks()
            .iter()
            .map(|task| (task.task_id, task.input_split.clone()))
            .collect();
        tracing::info!(
            map_tasks = tasks.len(),
            combine = self.spec.combine(),
            "starting map phase"
        );
        master.start_map_phase();

        let source = Arc::clone(&self.source);
        let mapper = Arc::clone(&self.mapper);
        let combiner = self.spec.combine().then(|| Arc::clone(&self.reducer));
        let (pool, mut results) =
            WorkerPool::spawn(self.spec.workers(), tasks, move |split: InputSplit| {
                execute_map(&*source, &split, &*mapper, combiner.as_deref(), reduce_tasks)
            });

        let mut shuffle: Shuffle<M::Key, M::Value> = (0..reduce_tasks).map(|_| vec![]).collect();
        while let Some(outcome) = results.recv().await {
            match outcome.result {
                Ok(output) => {
                    master.update_map_task(outcome.task_id, TaskState::Completed)?;
                    counters.merge(&output.counters);
                    for (bucket, pairs) in shuffle.iter_mut().zip(output.partitions) {
                        bucket.extend(pairs);
                    }
                }
                Err(e) => {
                    tracing::error!(
                        task_id = %outcome.task_id,
                        worker_id = %outcome.worker_id,
                        error = %e,
                        "map task failed"
                    );
                    if let Err(cancel_error) = pool.cancel(results).await {
                        tracing::warn!(error = %cancel_error, "failed to stop remaining workers");
                    }
                    master.update_map_task(outcome.task_id, TaskState::Failed)?;
                    return Err(e);
                }
            }
        }
        pool.join().await?;

        // Barrier: no key is final until every split has been mapped.
        if !master.map_phase_complete() {
            return Err(anyhow::anyhow!("Map phase ended with unfinished tasks").into());
        }
        Ok(shuffle)
    }

    #[tracing::instrument(name = "Reduce phase", skip_all)]
    async fn run_reduce_phase(
        &self,
        master: &mut Master,
        shuffle: Shuffle<M::Key, M::Value>,
        storage: &Arc<LocalStorage>,
        counters: &mut Counters,
    ) -> Result<(), JobError> {
        let tasks: Vec<(Uuid, (usize, Vec<(M::Key, M::Value)>))> = master
            .reduce_tasks()
            .iter()
            .zip(shuffle)
            .map(|(task, pairs)| (task.task_id, (task.partition, pairs)))
            .collect();
        tracing::info!(reduce_tasks = tasks.len(), "starting reduce phase");
        master.start_reduce_phase();

        let reducer = Arc::clone(&self.reducer);
        let storage = Arc::clone(storage);
        let (pool, mut results) = WorkerPool::spawn(
            self.spec.workers(),
            tasks,
            move |(partition, pairs): (usize, Vec<(M::Key, M::Value)>)| {
                execute_reduce(partition, pairs, &*reducer, &storage)
            },
        );

        while let Some(outcome) = results.recv().await {
            match outcome.result {
                Ok(task_counters) => {
                    master.update_reduce_task(outcome.task_id, TaskState::Completed)?;
                    counters.merge(&task_counters);
                }
                Err(e) => {
                    tracing::error!(
                        task_id = %outcome.task_id,
                        worker_id = %outcome.worker_id,
                        error = %e,
                        "reduce task failed"
                    );
                    if let Err(cancel_error) = pool.cancel(results).await {
                        tracing::warn!(error = %cancel_error, "failed to stop remaining workers");
                    }
                    master.update_reduce_task(outcome.task_id, TaskState::Failed)?;
                    return Err(e);
                }
            }
        }
        pool.join().await?;

        if !master.reduce_phase_complete() {
            return Err(anyhow::anyhow!("Reduce phase ended with unfinished tasks").into());
        }
        Ok(())
    }
}
