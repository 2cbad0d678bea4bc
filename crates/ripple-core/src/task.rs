//! Deferred task queue.
//!
//! Tasks posted here run on the next turn of the event loop, after the code
//! that posted them has returned. This is the "run after the current event
//! has been fully handled" primitive.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, SchedulerError};

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
pub(crate) type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// Internal task data.
struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// FIFO queue of deferred tasks.
///
/// The queue only stores tasks; running them is the event loop's job so that
/// no lock is held while user code executes.
#[derive(Default)]
pub(crate) struct TaskQueue {
    tasks: VecDeque<TaskData>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a task. Returns the ID that can be used to cancel it.
    pub fn post(&mut self, task: BoxedTask) -> TaskId {
        let id = next_task_id();
        self.tasks.push_back(TaskData { id, task });
        id
    }

    /// Cancel a pending task.
    pub fn cancel(&mut self, id: TaskId) -> Result<()> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(SchedulerError::InvalidTaskId)?;
        self.tasks.remove(pos);
        Ok(())
    }

    /// Remove the oldest task, if any.
    pub fn pop_front(&mut self) -> Option<(TaskId, BoxedTask)> {
        self.tasks.pop_front().map(|data| (data.id, data.task))
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}
