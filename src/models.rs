use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TaskError;

/// Longest description a task may carry, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 30;
/// Category width used by the display line.
pub const CATEGORY_DISPLAY_LEN: usize = 20;
/// Placeholder stored when a category or deadline is skipped.
pub const NONE_SENTINEL: &str = "none";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How important a task is.
///
/// Sorting goes through [`Priority::rank`], so `High` lists first and `None` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::High, Priority::Medium, Priority::Low, Priority::None];

    /// Sort rank, lower comes first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::None => 3,
        }
    }

    /// Upper-case name used in the task file (`HIGH`, `NONE`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
            Priority::None => "NONE",
        }
    }

    /// Lower-case label used on screen.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }
}

impl Priority {
    /// Strict inverse of [`Priority::name`] used for the task file.
    ///
    /// Case-insensitive, but blank or padded names are rejected.
    pub fn from_name(name: &str) -> Result<Priority, TaskError> {
        Priority::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| TaskError::InvalidPriority(name.to_string()))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    /// Case-insensitive; an empty token means "no priority".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Ok(Priority::None);
        }
        Priority::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| TaskError::InvalidPriority(token.to_string()))
    }
}

/// Due date of a task, or no due date at all.
///
/// Variant order makes `Unset` sort after every date, which is the same order
/// the canonical text (`2024-01-15` < `none`) gives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Deadline {
    On(NaiveDate),
    #[default]
    Unset,
}

impl Deadline {
    /// Strict inverse of the canonical text used for the task file:
    /// exactly `none` or `YYYY-MM-DD`.
    pub fn from_canonical(text: &str) -> Result<Deadline, TaskError> {
        if text == NONE_SENTINEL {
            return Ok(Deadline::Unset);
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Deadline::On)
            .map_err(|_| TaskError::InvalidDeadline(text.to_string()))
    }

    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Deadline::On(d) => Some(d),
            Deadline::Unset => None,
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::On(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Deadline::Unset => f.write_str(NONE_SENTINEL),
        }
    }
}

impl FromStr for Deadline {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() || token.eq_ignore_ascii_case(NONE_SENTINEL) {
            return Ok(Deadline::Unset);
        }
        NaiveDate::parse_from_str(token, DATE_FORMAT)
            .map(Deadline::On)
            .map_err(|_| TaskError::InvalidDeadline(token.to_string()))
    }
}

impl From<NaiveDate> for Deadline {
    fn from(d: NaiveDate) -> Self {
        Deadline::On(d)
    }
}

/// Glyph shown for a task's completion flag.
pub fn status_glyph(done: bool) -> &'static str {
    if done { "[✔]" } else { "[ ]" }
}

/// Inverse of [`status_glyph`].
pub fn parse_status_glyph(glyph: &str) -> Result<bool, TaskError> {
    match glyph {
        "[✔]" => Ok(true),
        "[ ]" => Ok(false),
        other => Err(TaskError::InvalidStatus(other.to_string())),
    }
}

/// Represents a single task in the tracker.
///
/// Equality compares the stored fields only, so a task read back from the
/// task file equals the one that was saved.
#[derive(Debug, Clone)]
pub struct Task {
    /// Process-local identifier stamped by the store. Not persisted and
    /// ignored by `==`.
    pub id: u64,
    /// Short text of the task, 1 to 30 characters.
    pub description: String,
    /// Free-form grouping, `"none"` when skipped.
    pub category: String,
    pub deadline: Deadline,
    pub priority: Priority,
    /// Whether the task has been completed.
    pub status: bool,
}

impl Task {
    /// Builds an incomplete task, filling the `none` defaults.
    ///
    /// The description is trimmed and must be 1 to 30 characters long.
    pub fn new(description: &str, category: &str, deadline: Deadline, priority: Priority) -> Result<Task, TaskError> {
        let description = validate_description(description)?;
        let category = category.trim();
        Ok(Task {
            id: 0,
            description,
            category: if category.is_empty() { NONE_SENTINEL.to_string() } else { category.to_string() },
            deadline,
            priority,
            status: false,
        })
    }

    /// Shorthand for checking whether the description contains `needle`,
    /// which must already be lower case.
    pub fn matches(&self, needle: &str) -> bool {
        self.description.to_lowercase().contains(needle)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Task) -> bool {
        self.description == other.description
            && self.category == other.category
            && self.deadline == other.deadline
            && self.priority == other.priority
            && self.status == other.status
    }
}

impl Eq for Task {}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Description: {:.desc$}, Category: {:.cat$}, Deadline: {}, Priority: {}, Status: {}",
            self.description,
            self.category,
            self.deadline,
            self.priority,
            status_glyph(self.status),
            desc = MAX_DESCRIPTION_LEN,
            cat = CATEGORY_DISPLAY_LEN,
        )
    }
}

/// Trims `raw` and checks it fits the description limits.
pub fn validate_description(raw: &str) -> Result<String, TaskError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyDescription);
    }
    let len = trimmed.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(TaskError::DescriptionTooLong { len, max: MAX_DESCRIPTION_LEN });
    }
    Ok(trimmed.to_string())
}
