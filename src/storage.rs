use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};
use crate::models::{parse_status_glyph, status_glyph, Deadline, Priority, Task};

/// File name used when nothing else is configured.
pub const DEFAULT_FILE: &str = "tasks.txt";

/// Environment variable that overrides the default task file.
pub const PATH_ENV: &str = "TASKS_DB";

/// Returns the path to the task file.
///
/// The path is determined in the following order:
/// 1. `explicit`, usually the `--file` flag.
/// 2. `TASKS_DB` environment variable.
/// 3. `./tasks.txt`.
pub fn db_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
}

/// On-disk shape of one task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TaskRecord {
    pub description: String,
    pub category: String,
    pub deadline: String,
    pub priority: String,
    pub status: String,
}

impl From<&Task> for TaskRecord {
    fn from(t: &Task) -> Self {
        TaskRecord {
            description: t.description.clone(),
            category: t.category.clone(),
            deadline: t.deadline.to_string(),
            priority: t.priority.name().to_string(),
            status: status_glyph(t.status).to_string(),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(r: TaskRecord) -> Result<Task> {
        let deadline = Deadline::from_canonical(&r.deadline)?;
        let priority = Priority::from_name(&r.priority)?;
        let mut task = Task::new(&r.description, &r.category, deadline, priority)?;
        task.status = parse_status_glyph(&r.status)?;
        Ok(task)
    }
}

/// Reads every task stored at `path`, in file order.
///
/// Fails as a whole if any record is malformed.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let s = fs::read_to_string(path).map_err(|source| TaskError::Io { path: path.to_path_buf(), source })?;
    let records: Vec<TaskRecord> = serde_json::from_str(&s)?;
    records.into_iter().map(Task::try_from).collect()
}

/// Saves the given tasks to `path`.
///
/// Overwrites the existing file.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;

    let io_err = |source| TaskError::Io { path: path.to_path_buf(), source };
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(io_err)?;
    f.write_all(&buf).map_err(io_err)?;
    Ok(())
}
