use crate::model::Task;

/// Secondary ordering applied within each completion group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Priority,
    DueDate,
    Name,
}

impl SortKey {
    /// Accepts the names used in config files and CLI flags.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "priority" => Some(Self::Priority),
            "due_date" | "due-date" | "due" => Some(Self::DueDate),
            "name" | "title" => Some(Self::Name),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Name => "name",
        }
    }
}

// Absent due dates sort after every real ISO date.
const NO_DUE_DATE: &str = "9999-12-31";

/// Display ordering over the task list. Incomplete tasks always come before
/// completed ones; the requested key orders within each group. The sort is
/// stable, so ties keep input order.
pub fn sorted(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut view = tasks.to_vec();
    match key {
        SortKey::Priority => {
            view.sort_by_key(|task| (task.completed, task.priority.sort_rank()));
        }
        SortKey::DueDate => {
            view.sort_by(|a, b| {
                let a_key = (a.completed, a.due_date.as_deref().unwrap_or(NO_DUE_DATE));
                let b_key = (b.completed, b.due_date.as_deref().unwrap_or(NO_DUE_DATE));
                a_key.cmp(&b_key)
            });
        }
        SortKey::Name => {
            view.sort_by_key(|task| (task.completed, task.title.to_lowercase()));
        }
    }
    view
}
