use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Task priority. Files written by other producers may carry values outside
/// the three known names; those are preserved verbatim and sort after `Low`
/// rather than failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
    #[serde(untagged)]
    Other(String),
}

impl Priority {
    /// Ordering rank used by the priority sort: High < Medium < Low < unknown.
    pub fn sort_rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
            Self::Other(_) => 3,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Other(value) => value,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// One to-do item. All six fields are written on every save; on load,
/// `description`, `due_date`, and `completed` default when absent, while a
/// record without `id` or `title` is unparseable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Build a task with a freshly generated id. Rejects blank titles and
    /// due dates that are not `YYYY-MM-DD`.
    pub fn new(
        title: &str,
        description: &str,
        priority: Priority,
        due_date: Option<&str>,
    ) -> Result<Self, StoreError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoreError::invalid_input("title is required"));
        }

        let due_date = match due_date {
            Some(value) => Some(parse_due_date(value)?),
            None => None,
        };

        Ok(Self {
            id: generate_task_id(),
            title: trimmed.to_string(),
            description: description.trim().to_string(),
            priority,
            due_date,
            completed: false,
        })
    }
}

/// Timestamp-derived id in `<unix_seconds>.<microseconds>` form.
pub fn generate_task_id() -> String {
    let micros = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000;
    format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}

/// Validate an ISO `YYYY-MM-DD` due date and return it in canonical form.
pub fn parse_due_date(raw: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim();
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(trimmed, &format)
        .map_err(|_| StoreError::invalid_input("due date must be YYYY-MM-DD"))?;
    date.format(&format)
        .map_err(|err| StoreError::invalid_input(err.to_string()))
}
