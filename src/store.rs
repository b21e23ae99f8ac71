use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::models::{status_glyph, Deadline, Priority, Task};
use crate::storage::{read_tasks, write_tasks};

/// Ordering produced by the last listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Earliest deadline first, undated tasks last.
    #[default]
    Deadline,
    /// High priority first, unprioritised tasks last.
    Priority,
}

impl SortKey {
    pub fn toggled(self) -> SortKey {
        match self {
            SortKey::Deadline => SortKey::Priority,
            SortKey::Priority => SortKey::Deadline,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Deadline => "deadline",
            SortKey::Priority => "priority",
        }
    }
}

/// Result of a name search.
#[derive(Debug, PartialEq, Eq)]
pub enum Search<'a> {
    /// The query was blank; nothing was searched.
    Cancelled,
    /// Tasks whose description contains the query, possibly none.
    Matches(Vec<&'a Task>),
}

/// The in-memory task list and everything that can be done to it.
///
/// Index-based operations take a 1-based position in the ordering produced by
/// the most recent listing, with `0` meaning "cancel". The `*_by_id` variants
/// address a task independently of ordering.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    order: SortKey,
}

impl TaskStore {
    pub fn new() -> TaskStore {
        TaskStore::default()
    }

    /// Builds a store holding `tasks` in the given order.
    pub fn from_tasks(tasks: Vec<Task>) -> TaskStore {
        let mut store = TaskStore::new();
        store.replace(tasks);
        store
    }

    /// Opens the task file at `path`, starting empty if it does not exist yet.
    pub fn open(path: &Path) -> Result<TaskStore> {
        if !path.exists() {
            debug!(path = %path.display(), "task file missing, starting empty");
            return Ok(TaskStore::new());
        }
        Ok(TaskStore::from_tasks(read_tasks(path)?))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in their current order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn order(&self) -> SortKey {
        self.order
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validates the raw fields, appends a new incomplete task and re-sorts by
    /// deadline. Empty category, deadline and priority fall back to their
    /// defaults.
    ///
    /// Returns the id of the new task.
    pub fn add(&mut self, description: &str, category: &str, deadline: &str, priority: &str) -> Result<u64> {
        let task = deadline
            .parse::<Deadline>()
            .and_then(|d| Ok((d, priority.parse::<Priority>()?)))
            .and_then(|(d, p)| Task::new(description, category, d, p))
            .inspect_err(|e| warn!(error = %e, "task rejected"))?;
        Ok(self.insert(task))
    }

    /// Appends an already built task, stamping it with a fresh id.
    pub fn insert(&mut self, mut task: Task) -> u64 {
        let id = self.stamp();
        task.id = id;
        debug!(id, description = %task.description, "task added");
        self.tasks.push(task);
        self.list_by_deadline();
        id
    }

    /// Sorts in place by deadline and returns the new ordering.
    pub fn list_by_deadline(&mut self) -> &[Task] {
        self.list_by(SortKey::Deadline)
    }

    /// Sorts in place by priority rank and returns the new ordering.
    pub fn list_by_priority(&mut self) -> &[Task] {
        self.list_by(SortKey::Priority)
    }

    /// Stable sort by `key`; ties keep their previous relative order.
    pub fn list_by(&mut self, key: SortKey) -> &[Task] {
        match key {
            SortKey::Deadline => self.tasks.sort_by_key(|t| t.deadline),
            SortKey::Priority => self.tasks.sort_by_key(|t| t.priority.rank()),
        }
        self.order = key;
        &self.tasks
    }

    /// Numbered display lines for the current ordering, starting at 1.
    pub fn report(&self) -> Vec<String> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {}", i + 1, t))
            .collect()
    }

    /// Maps a 1-based row of the current ordering to a task id.
    ///
    /// `0` yields `Ok(None)`.
    pub fn id_at(&self, index: usize) -> Result<Option<u64>> {
        if index == 0 {
            return Ok(None);
        }
        self.tasks
            .get(index - 1)
            .map(|t| Some(t.id))
            .ok_or(TaskError::IndexOutOfRange { index, len: self.tasks.len() })
    }

    /// Flips the completion flag of the task at `index`.
    pub fn toggle_status(&mut self, index: usize) -> Result<String> {
        let Some(id) = self.id_at(index).inspect_err(|e| warn!(error = %e, "toggle rejected"))? else {
            return Ok("No status modified".to_string());
        };
        let task = self.toggle_by_id(id)?;
        Ok(format!("Task: {} | Status: {}", task.description, status_glyph(task.status)))
    }

    /// Removes the task at `index`.
    pub fn remove(&mut self, index: usize) -> Result<String> {
        let Some(id) = self.id_at(index).inspect_err(|e| warn!(error = %e, "remove rejected"))? else {
            return Ok("No task removed".to_string());
        };
        let task = self.remove_by_id(id)?;
        Ok(format!("Task removed: {}", task.description))
    }

    pub fn toggle_by_id(&mut self, id: u64) -> Result<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id).ok_or(TaskError::UnknownId(id))?;
        task.status = !task.status;
        debug!(id, status = task.status, "status toggled");
        Ok(task)
    }

    pub fn remove_by_id(&mut self, id: u64) -> Result<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id).ok_or(TaskError::UnknownId(id))?;
        let task = self.tasks.remove(pos);
        debug!(id, description = %task.description, "task removed");
        Ok(task)
    }

    /// Case-insensitive substring search over descriptions.
    ///
    /// A blank query cancels the search instead of matching everything.
    /// Otherwise the query is matched as typed, surrounding spaces included.
    pub fn search_by_name(&self, query: &str) -> Search<'_> {
        if query.trim().is_empty() {
            return Search::Cancelled;
        }
        let needle = query.to_lowercase();
        Search::Matches(self.tasks.iter().filter(|t| t.matches(&needle)).collect())
    }

    pub fn delete_all(&mut self) -> String {
        if self.tasks.is_empty() {
            return "No tasks to delete".to_string();
        }
        debug!(count = self.tasks.len(), "deleting all tasks");
        self.tasks.clear();
        "All tasks have been deleted.".to_string()
    }

    /// Writes every task to `path` in the current order, overwriting it.
    pub fn save(&self, path: &Path) -> Result<String> {
        write_tasks(path, &self.tasks).inspect_err(|e| warn!(error = %e, "save failed"))?;
        info!(path = %path.display(), count = self.tasks.len(), "tasks saved");
        Ok(format!("Tasks saved successfully to {}", path.display()))
    }

    /// Replaces the whole collection with the tasks stored at `path`.
    ///
    /// On failure the current tasks are left as they were.
    pub fn load(&mut self, path: &Path) -> Result<String> {
        let tasks = read_tasks(path).inspect_err(|e| warn!(error = %e, "load failed"))?;
        self.replace(tasks);
        info!(path = %path.display(), count = self.tasks.len(), "tasks loaded");
        Ok(format!("Tasks loaded successfully from {}", path.display()))
    }

    fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        for task in &mut self.tasks {
            self.next_id += 1;
            task.id = self.next_id;
        }
    }

    fn stamp(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
