use thiserror::Error;

/// Rejected caller input. Always reported synchronously, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("priority {0} is out of range (expected 0-3)")]
    PriorityOutOfRange(i64),

    #[error("invalid priority: {0:?}")]
    InvalidPriority(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown status: {0:?}")]
    UnknownStatus(String),
}

/// Errors returned by the task store and the lifecycle policy.
///
/// A missing id is not an error: operations report it as `false` / `None`.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned: {0}")]
    Lock(String),
}

impl TaskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
