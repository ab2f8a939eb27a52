use clap::{Parser, Subcommand, ValueEnum};
use tasklist_core::model::Priority;
use tasklist_core::sort::SortKey;

#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "Single-user to-do list", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk" --priority high --due 2024-01-15
    Add {
        title: Option<String>,
        /// Free-form note attached to the task
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_enum)]
        priority: Option<PriorityArg>,
        /// Due date in ISO form
        #[arg(long, value_name = "YYYY-MM-DD")]
        due: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete 1700000000.123456
    Delete {
        id: String,
    },
    /// Flip a task between pending and completed
    ///
    /// Example: tasklist toggle 1700000000.123456
    Toggle {
        id: String,
    },
    /// List tasks in display order
    ///
    /// Example: tasklist list --sort due-date
    List {
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Priority,
    DueDate,
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Priority => SortKey::Priority,
            SortArg::DueDate => SortKey::DueDate,
            SortArg::Name => SortKey::Name,
        }
    }
}
