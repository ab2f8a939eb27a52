mod task;

pub use task::{Priority, Task, generate_task_id, parse_due_date};
