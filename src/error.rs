use std::path::PathBuf;
use thiserror::Error;

/// Every recoverable failure the task core can report.
///
/// None of these are fatal: front ends print them and carry on.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Description field cannot be empty!")]
    EmptyDescription,

    #[error("Description cannot exceed {max} characters (got {len})!")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Invalid date format '{0}', use YYYY-MM-DD")]
    InvalidDeadline(String),

    #[error("Invalid priority '{0}', use low, medium or high")]
    InvalidPriority(String),

    #[error("Invalid status '{0}', expected [✔] or [ ]")]
    InvalidStatus(String),

    #[error("Task {index} does not exist (valid range 1..={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No task with id {0}")]
    UnknownId(u64),

    #[error("Could not access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed task file: {0}")]
    Format(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
