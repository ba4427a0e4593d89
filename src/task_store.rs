use crate::error::{MissingPolicy, StoreError, StoreResult};
use crate::notify::{ChangeNotifier, Subscription};
use crate::task::{NewTask, Task, TaskStatus, generate_task_id};
use chrono::{Days, Local, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The two disjoint task collections.
///
/// A task id appears in exactly one of them: `available` holds unassigned
/// `Available` tasks, `assigned` holds `In Progress` and `Completed` tasks in
/// the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskCollections {
    pub available: Vec<Task>,
    pub assigned: Vec<Task>,
}

impl TaskCollections {
    fn contains(&self, task_id: &str) -> bool {
        self.available.iter().any(|t| t.id == task_id)
            || self.assigned.iter().any(|t| t.id == task_id)
    }

    pub fn len(&self) -> usize {
        self.available.len() + self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.available.iter().chain(self.assigned.iter())
    }
}

/// In-memory task board.
///
/// Every mutator is a single write-locked read-modify-write over both
/// collections, so no reader can observe a task in both or in neither.
/// Subscribers are notified after the lock has been released.
#[derive(Debug, Default)]
pub struct TaskStore {
    state: RwLock<TaskCollections>,
    notifier: ChangeNotifier,
    policy: MissingPolicy,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MissingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> MissingPolicy {
        self.policy
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// The available pool, newest first.
    pub fn available_tasks(&self) -> Vec<Task> {
        let mut tasks = self.state.read().available.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    /// The assigned set in pick order.
    pub fn assigned_tasks(&self) -> Vec<Task> {
        self.state.read().assigned.clone()
    }

    pub fn tasks_by_worker(&self, worker_id: &str) -> Vec<Task> {
        self.state
            .read()
            .assigned
            .iter()
            .filter(|t| t.assigned_to.as_deref() == Some(worker_id))
            .cloned()
            .collect()
    }

    /// Assigned tasks due on the current local calendar day.
    pub fn tasks_due_today(&self) -> Vec<Task> {
        self.tasks_due_on(Local::now().date_naive())
    }

    /// Assigned tasks whose due timestamp, in local time, falls on `day`.
    pub fn tasks_due_on(&self, day: NaiveDate) -> Vec<Task> {
        let Some(tomorrow) = day.checked_add_days(Days::new(1)) else {
            return Vec::new();
        };
        self.state
            .read()
            .assigned
            .iter()
            .filter(|t| {
                let due = t.due_at.with_timezone(&Local).date_naive();
                day <= due && due < tomorrow
            })
            .cloned()
            .collect()
    }

    /// Completed tasks, most recently completed first.
    pub fn completed_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .state
            .read()
            .assigned
            .iter()
            .filter(|t| t.is_completed())
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        tasks
    }

    pub fn find_task(&self, task_id: &str) -> Option<Task> {
        self.state.read().iter().find(|t| t.id == task_id).cloned()
    }

    /// Move a task from the available pool to `worker_id`.
    pub fn pick_task(
        &self,
        task_id: &str,
        worker_id: &str,
        worker_name: &str,
    ) -> StoreResult<Option<Task>> {
        let picked = {
            let mut state = self.state.write();
            let Some(idx) = state.available.iter().position(|t| t.id == task_id) else {
                let err = if state.contains(task_id) {
                    StoreError::conflict(task_id, "is already picked")
                } else {
                    StoreError::TaskNotFound(task_id.to_string())
                };
                drop(state);
                return self.reject("pick", err);
            };
            let mut task = state.available.remove(idx);
            task.status = TaskStatus::InProgress;
            task.assigned_to = Some(worker_id.to_string());
            task.assigned_to_name = Some(worker_name.to_string());
            state.assigned.push(task.clone());
            task
        };
        debug!(task_id, worker_id, "task picked");
        self.notifier.notify();
        Ok(Some(picked))
    }

    /// Return an in-progress task to the end of the available pool.
    ///
    /// Any caller may release any task; ownership checks belong to the caller.
    pub fn unpick_task(&self, task_id: &str) -> StoreResult<Option<Task>> {
        let released = {
            let mut state = self.state.write();
            let position = state.assigned.iter().position(|t| t.id == task_id);
            let idx = match position {
                Some(idx) if state.assigned[idx].status == TaskStatus::InProgress => idx,
                Some(_) => {
                    drop(state);
                    let err = StoreError::conflict(task_id, "is already completed");
                    return self.reject("unpick", err);
                }
                None => {
                    let err = if state.contains(task_id) {
                        StoreError::conflict(task_id, "is not picked")
                    } else {
                        StoreError::TaskNotFound(task_id.to_string())
                    };
                    drop(state);
                    return self.reject("unpick", err);
                }
            };
            let mut task = state.assigned.remove(idx);
            task.status = TaskStatus::Available;
            task.assigned_to = None;
            task.assigned_to_name = None;
            state.available.push(task.clone());
            task
        };
        debug!(task_id, "task released to pool");
        self.notifier.notify();
        Ok(Some(released))
    }

    /// Mark an in-progress task completed. Completion is final; completing
    /// again is rejected and keeps the original timestamp.
    pub fn complete_task(&self, task_id: &str) -> StoreResult<Option<Task>> {
        let completed = {
            let mut state = self.state.write();
            let position = state.assigned.iter().position(|t| t.id == task_id);
            let idx = match position {
                Some(idx) if !state.assigned[idx].is_completed() => idx,
                Some(_) => {
                    drop(state);
                    let err = StoreError::conflict(task_id, "is already completed");
                    return self.reject("complete", err);
                }
                None => {
                    let err = if state.contains(task_id) {
                        StoreError::conflict(task_id, "is not picked")
                    } else {
                        StoreError::TaskNotFound(task_id.to_string())
                    };
                    drop(state);
                    return self.reject("complete", err);
                }
            };
            let task = &mut state.assigned[idx];
            task.status = TaskStatus::Completed;
            task.completed_at = Some(Utc::now());
            task.clone()
        };
        debug!(task_id, "task completed");
        self.notifier.notify();
        Ok(Some(completed))
    }

    /// Post a new task into the available pool.
    pub fn create_task(&self, fields: NewTask) -> Task {
        let now = Utc::now();
        let task = Task::from_new(fields, generate_task_id(now), now);
        self.state.write().available.push(task.clone());
        debug!(task_id = %task.id, title = %task.title, "task created");
        self.notifier.notify();
        task
    }

    pub fn snapshot(&self) -> TaskCollections {
        self.state.read().clone()
    }

    /// Replace both collections wholesale, e.g. after loading from disk.
    pub fn restore(&self, collections: TaskCollections) {
        *self.state.write() = collections;
        self.notifier.notify();
    }

    fn reject(&self, action: &str, err: StoreError) -> StoreResult<Option<Task>> {
        warn!(action, error = %err, "task transition rejected");
        self.policy.apply(err)
    }
}
