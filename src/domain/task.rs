use serde::{Deserialize, Serialize};

/// Task identifiers are allocated sequentially by the owning list
pub type TaskId = u32;

/// Minimum estimated pomodoros per task; lower inputs are clamped up
pub const MIN_ESTIMATED_POMODOROS: u32 = 2;

/// A unit of work tracked against an estimated number of work intervals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub estimated_pomodoros: u32,
    /// Incremented only when a work interval tied to this task expires naturally
    pub completed_pomodoros: u32,
    pub completed: bool,
}

impl Task {
    fn new(id: TaskId, name: String, estimated_pomodoros: u32) -> Self {
        Self {
            id,
            name,
            estimated_pomodoros: estimated_pomodoros.max(MIN_ESTIMATED_POMODOROS),
            completed_pomodoros: 0,
            completed: false,
        }
    }

    /// Check if recorded progress has reached the estimate
    pub fn estimate_reached(&self) -> bool {
        self.completed_pomodoros >= self.estimated_pomodoros
    }

    /// Format progress as "completed / estimated"
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.completed_pomodoros, self.estimated_pomodoros)
    }
}

/// Owner of all tasks plus the active-task selection.
///
/// Id allocation, deletion, completion toggling, and selection live here; the
/// cycle controller only reads the active task and increments its progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: TaskId,
    current_id: Option<TaskId>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            current_id: None,
        }
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from persisted parts, repairing a stale selection or
    /// a next_id that lags behind stored ids
    pub fn from_parts(tasks: Vec<Task>, next_id: TaskId, current_id: Option<TaskId>) -> Self {
        let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let current_id =
            current_id.filter(|id| tasks.iter().any(|t| t.id == *id && !t.completed));
        Self {
            tasks,
            next_id: next_id.max(max_id + 1),
            current_id,
        }
    }

    /// Add a task and return its id. Estimates below the minimum are clamped.
    pub fn add(&mut self, name: impl Into<String>, estimated_pomodoros: u32) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task::new(id, name.into(), estimated_pomodoros));
        id
    }

    /// Remove a task, deselecting it if it was the active one
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        if self.current_id == Some(id) {
            self.current_id = None;
        }
        self.tasks.remove(index);
        true
    }

    /// Toggle a task's completed flag. Completing the active task deselects it.
    /// Returns the new completed state.
    pub fn toggle_completed(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        if completed && self.current_id == Some(id) {
            self.current_id = None;
        }
        Some(completed)
    }

    /// Apply a new estimate (clamped to the minimum), returning the value stored
    pub fn set_estimate(&mut self, id: TaskId, estimated_pomodoros: u32) -> Option<u32> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.estimated_pomodoros = estimated_pomodoros.max(MIN_ESTIMATED_POMODOROS);
        Some(task.estimated_pomodoros)
    }

    /// Rename a task. Blank names are ignored.
    pub fn rename(&mut self, id: TaskId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Change the active-task selection. Selecting a missing or completed
    /// task is declined; `None` always clears the selection.
    pub fn select(&mut self, id: Option<TaskId>) -> bool {
        match id {
            None => {
                self.current_id = None;
                true
            }
            Some(id) => {
                if self.tasks.iter().any(|t| t.id == id && !t.completed) {
                    self.current_id = Some(id);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// The active task, if one is selected
    pub fn current(&self) -> Option<&Task> {
        self.current_id.and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Task> {
        match self.current_id {
            Some(id) => self.get_mut(id),
            None => None,
        }
    }

    pub fn current_id(&self) -> Option<TaskId> {
        self.current_id
    }

    pub fn next_id(&self) -> TaskId {
        self.next_id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks, for snapshotting
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}
