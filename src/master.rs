//! src/master.rs
use crate::mapreduce::InputSplit;
use anyhow::Context;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    InProgress,
    Completed,
    Failed,
}

#[derive(Clone, Debug)]
pub struct MapTask {
    pub task_id: Uuid,
    pub state: TaskState,
    pub input_split: InputSplit,
}

#[derive(Clone, Debug)]
pub struct ReduceTask {
    pub task_id: Uuid,
    pub state: TaskState,
    pub partition: usize,
}

/// Bookkeeping for every task of a job.
#[derive(Debug)]
pub struct Master {
    map_tasks: Vec<MapTask>,
    reduce_tasks: Vec<ReduceTask>,
}

impl Master {
    pub fn new(input_splits: Vec<InputSplit>, reduce_tasks: usize) -> Self {
        let map_tasks = input_splits
            .into_iter()
            .map(|input_split| MapTask {
                task_id: *input_split.id(),
                state: TaskState::Idle,
                input_split,
            })
            .collect();
        let reduce_tasks = (0..reduce_tasks.max(1))
            .map(|partition| ReduceTask {
                task_id: Uuid::new_v4(),
                state: TaskState::Idle,
                partition,
            })
            .collect();
        Master {
            map_tasks,
            reduce_tasks,
        }
    }

    pub fn map_tasks(&self) -> &Vec<MapTask> {
        &self.map_tasks
    }

    pub fn reduce_tasks(&self) -> &Vec<ReduceTask> {
        &self.reduce_tasks
    }

    pub fn reduce_task_count(&self) -> usize {
        self.reduce_tasks.len()
    }

    fn get_map_task(&mut self, task_id: Uuid) -> Option<&mut MapTask> {
        self.map_tasks
            .iter_mut()
            .find(|task| task.task_id == task_id)
    }

    fn get_reduce_task(&mut self, task_id: Uuid) -> Option<&mut ReduceTask> {
        self.reduce_tasks
            .iter_mut()
            .find(|task| task.task_id == task_id)
    }

    pub fn update_map_task(&mut self, task_id: Uuid, state: TaskState) -> anyhow::Result<()> {
        let task = self
            .get_map_task(task_id)
            .context(format!("Unknown map task: {task_id}"))?;
        tracing::debug!(%task_id, split = task.input_split.name(), ?state, "map task");
        task.state = state;
        Ok(())
    }

    pub fn update_reduce_task(&mut self, task_id: Uuid, state: TaskState) -> anyhow::Result<()> {
        let task = self
            .get_reduce_task(task_id)
            .context(format!("Unknown reduce task: {task_id}"))?;
        tracing::debug!(%task_id, partition = task.partition, ?state, "reduce task");
        task.state = state;
        Ok(())
    }

    pub fn start_map_phase(&mut self) {
        for task in self.map_tasks.iter_mut() {
            task.state = TaskState::InProgress;
        }
    }

    pub fn start_reduce_phase(&mut self) {
        for task in self.reduce_tasks.iter_mut() {
            task.state = TaskState::InProgress;
        }
    }

    /// True once every map task finished, i.e. every intermediate pair has been seen.
    pub fn map_phase_complete(&self) -> bool {
        self.map_tasks
            .iter()
            .all(|task| task.state == TaskState::Completed)
    }

    pub fn reduce_phase_complete(&self) -> bool {
        self.reduce_tasks
            .iter()
            .all(|task| task.state == TaskState::Completed)
    }
}
