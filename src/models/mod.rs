pub mod priority;
pub mod status;
pub mod task;

pub use priority::Priority;
pub use status::TaskStatus;
pub use task::{NewTask, Task, TaskPatch, parse_due_date, DATE_FORMAT, TIMESTAMP_FORMAT};
