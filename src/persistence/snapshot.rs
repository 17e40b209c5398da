use crate::domain::{Mode, Task, TaskId};
use serde::{Deserialize, Serialize};

/// Persisted controller state: timer position plus the task list.
///
/// Logical fields only; the host decides where the blob lives. Restoring
/// tolerates stale data (a selection pointing at a deleted or completed task,
/// a lagging next id, an over-long remaining) by repairing it on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub remaining_total_seconds: u64,
    pub sessions: u32,
    pub pomodoros_since_long_break: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "default_next_task_id")]
    pub next_task_id: TaskId,
    #[serde(default)]
    pub current_task_id: Option<TaskId>,
    /// RFC3339 timestamp of the save, informational only
    #[serde(default)]
    pub saved_at: Option<String>,
}

fn default_next_task_id() -> TaskId {
    1
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            mode: Mode::Work,
            remaining_total_seconds: 25 * 60,
            sessions: 0,
            pomodoros_since_long_break: 0,
            tasks: Vec::new(),
            next_task_id: 1,
            current_task_id: None,
            saved_at: None,
        }
    }
}
