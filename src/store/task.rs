use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use tracing::{debug, info, warn};

use super::schema::apply_schema;
use crate::error::{TaskError, TaskResult};
use crate::models::{NewTask, Priority, Task, TaskPatch, TaskStatus, DATE_FORMAT, TIMESTAMP_FORMAT};

const TASK_COLUMNS: &str =
    "id, title, description, due_date, priority, status, created_at, completed_at";

/// Pending tasks, most urgent first. Tasks without a due date sort after
/// dated ones; id breaks the remaining ties. Older releases stored a blank
/// due date as `''`, which counts as undated.
const PENDING_ORDER: &str = "ORDER BY priority DESC, (due_date IS NULL OR trim(due_date) = ''), \
                             due_date ASC, id ASC";

/// How long a write waits for another process (e.g. the CLI) to release the
/// database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable CRUD over task records.
///
/// One connection behind a mutex; every operation takes the lock, runs in
/// its own transaction and commits before returning. No lock is held
/// between calls.
pub struct TaskStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl TaskStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> TaskResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_schema(&conn)?;
        info!(path = %path.display(), "task database opened");
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database; contents vanish when the store drops.
    #[cfg(test)]
    pub fn open_in_memory() -> TaskResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert a new pending task and return its id.
    pub fn create(&self, task: &NewTask) -> TaskResult<i64> {
        task.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (title, description, due_date, priority, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.title,
                task.description,
                task.due_date.map(format_date),
                i64::from(task.priority),
                TaskStatus::Pending.as_str(),
                now_text(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(task_id = id, title = %task.title, "task created");
        Ok(id)
    }

    /// Fetch one task. A missing id is `Ok(None)`.
    pub fn get(&self, id: i64) -> TaskResult<Option<Task>> {
        let conn = self.lock()?;
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All pending tasks, ordered for display as "today's tasks".
    ///
    /// Due dates are a sort key only: nothing is filtered by calendar date.
    pub fn list_pending_ordered(&self) -> TaskResult<Vec<Task>> {
        let conn = self.lock()?;
        query_tasks(
            &conn,
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE status = 'pending' {PENDING_ORDER}"),
        )
    }

    /// Pending tasks (display order) followed by completed ones, most
    /// recently completed first.
    pub fn list_all(&self) -> TaskResult<Vec<Task>> {
        let mut conn = self.lock()?;
        // Both queries read one snapshot.
        let tx = conn.transaction()?;
        let mut tasks = query_tasks(
            &tx,
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE status = 'pending' {PENDING_ORDER}"),
        )?;
        tasks.extend(query_tasks(
            &tx,
            &format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE status != 'pending' \
                 ORDER BY completed_at DESC, id DESC"
            ),
        )?);
        tx.commit()?;
        Ok(tasks)
    }

    /// Apply a partial update. Returns `false` if the id does not exist.
    ///
    /// Setting the status to completed stamps `completed_at` in the same
    /// write (a task that is already completed keeps its original stamp);
    /// setting it back to pending clears `completed_at`.
    pub fn update(&self, id: i64, patch: &TaskPatch) -> TaskResult<bool> {
        self.apply_patch(id, patch, None)
    }

    /// Like [`update`](Self::update), but only touches the row while its
    /// status is still `expected`. Used for one-way lifecycle transitions.
    pub(crate) fn update_if_status(
        &self,
        id: i64,
        patch: &TaskPatch,
        expected: TaskStatus,
    ) -> TaskResult<bool> {
        self.apply_patch(id, patch, Some(expected))
    }

    /// Permanently remove a task. Returns `false` if it did not exist.
    pub fn delete(&self, id: i64) -> TaskResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        tx.commit()?;

        if removed > 0 {
            info!(task_id = id, "task deleted");
        } else {
            warn!(task_id = id, "delete skipped, task not found");
        }
        Ok(removed > 0)
    }

    pub fn count_pending(&self) -> TaskResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = 'pending'",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn apply_patch(
        &self,
        id: i64,
        patch: &TaskPatch,
        expected: Option<TaskStatus>,
    ) -> TaskResult<bool> {
        // Validate the whole patch before writing any field.
        patch.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if patch.is_empty() {
            return Ok(row_exists(&tx, id, expected)?);
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(title) = &patch.title {
            assignments.push("title = ?");
            values.push(Value::Text(title.clone()));
        }
        if let Some(description) = &patch.description {
            assignments.push("description = ?");
            values.push(Value::Text(description.clone()));
        }
        if let Some(due_date) = &patch.due_date {
            assignments.push("due_date = ?");
            values.push(match due_date {
                Some(d) => Value::Text(format_date(*d)),
                None => Value::Null,
            });
        }
        if let Some(priority) = patch.priority {
            assignments.push("priority = ?");
            values.push(Value::Integer(priority.into()));
        }
        match patch.status {
            Some(TaskStatus::Completed) => {
                // SET expressions see the old row, so an already-completed
                // task keeps its first completion time.
                assignments.push("status = 'completed'");
                assignments.push(
                    "completed_at = CASE WHEN status = 'completed' AND completed_at IS NOT NULL \
                     THEN completed_at ELSE ? END",
                );
                values.push(Value::Text(now_text()));
            }
            Some(TaskStatus::Pending) => {
                assignments.push("status = 'pending'");
                assignments.push("completed_at = NULL");
            }
            None => {}
        }

        let mut sql = format!("UPDATE tasks SET {} WHERE id = ?", assignments.join(", "));
        values.push(Value::Integer(id));
        if let Some(expected) = expected {
            sql.push_str(" AND status = ?");
            values.push(Value::Text(expected.as_str().to_string()));
        }

        let changed = tx.execute(&sql, params_from_iter(values.iter()))?;
        tx.commit()?;

        if changed > 0 {
            info!(task_id = id, "task updated");
        } else {
            debug!(task_id = id, ?expected, "update matched no row");
        }
        Ok(changed > 0)
    }

    fn lock(&self) -> TaskResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| TaskError::Lock(e.to_string()))
    }
}

fn row_exists(tx: &Transaction<'_>, id: i64, expected: Option<TaskStatus>) -> rusqlite::Result<bool> {
    let found = match expected {
        Some(status) => tx
            .query_row(
                "SELECT 1 FROM tasks WHERE id = ?1 AND status = ?2",
                params![id, status.as_str()],
                |_| Ok(()),
            )
            .optional()?,
        None => tx
            .query_row("SELECT 1 FROM tasks WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?,
    };
    Ok(found.is_some())
}

fn query_tasks(conn: &Connection, sql: &str) -> TaskResult<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], row_to_task)?;

    let mut tasks = Vec::new();
    for row in rows {
        tasks.push(row?);
    }
    Ok(tasks)
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let due_text: Option<String> = row.get(3)?;
    let priority_value: Option<i64> = row.get(4)?;
    let status_text: Option<String> = row.get(5)?;
    let created_text: Option<String> = row.get(6)?;
    let completed_text: Option<String> = row.get(7)?;

    let due_date = due_text
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map_err(|e| conversion_error(3, Type::Text, e))
        })
        .transpose()?;

    let priority = Priority::new(priority_value.unwrap_or(0))
        .map_err(|e| conversion_error(4, Type::Integer, e))?;

    let status = match status_text {
        Some(s) => s
            .parse::<TaskStatus>()
            .map_err(|e| conversion_error(5, Type::Text, e))?,
        None => TaskStatus::Pending,
    };

    let created_at = match created_text {
        Some(s) => parse_timestamp(&s).map_err(|e| conversion_error(6, Type::Text, e))?,
        None => {
            return Err(rusqlite::Error::InvalidColumnType(
                6,
                "created_at".to_string(),
                Type::Null,
            ));
        }
    };

    let completed_at = completed_text
        .map(|s| parse_timestamp(&s).map_err(|e| conversion_error(7, Type::Text, e)))
        .transpose()?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        due_date,
        priority,
        status,
        created_at,
        completed_at,
    })
}

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
}

fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

fn now_text() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use std::sync::Arc;

    fn test_store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let store = TaskStore::open(&dir.path().join("tasks.db")).expect("open TaskStore");
        (dir, store)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_create_then_get_echoes_fields() {
        let (_dir, store) = test_store();

        let id = store
            .create(
                &NewTask::new("Buy milk")
                    .description("2 litres, semi-skimmed")
                    .due(date("2025-06-01"))
                    .priority(Priority::MEDIUM),
            )
            .expect("create");

        let task = store.get(id).expect("get").expect("task exists");
        assert_eq!(task.id, id);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2 litres, semi-skimmed");
        assert_eq!(task.due_date, Some(date("2025-06-01")));
        assert_eq!(task.priority, Priority::MEDIUM);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_create_defaults() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("Call mum")).unwrap();
        let task = store.get(id).unwrap().unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::NORMAL);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let store = TaskStore::open_in_memory().unwrap();
        let a = store.create(&NewTask::new("a")).unwrap();
        let b = store.create(&NewTask::new("b")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_empty_title_is_rejected_without_writing() {
        let store = TaskStore::open_in_memory().unwrap();
        store.create(&NewTask::new("existing")).unwrap();

        let err = store.create(&NewTask::new("")).unwrap_err();
        assert!(matches!(err, TaskError::Validation(ValidationError::EmptyTitle)));

        assert_eq!(store.count_pending().unwrap(), 1);
        assert_eq!(titles(&store.list_pending_ordered().unwrap()), vec!["existing"]);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = TaskStore::open_in_memory().unwrap();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_same_priority_orders_by_due_date() {
        let store = TaskStore::open_in_memory().unwrap();
        store
            .create(&NewTask::new("A").priority(Priority::URGENT).due(date("2025-01-05")))
            .unwrap();
        store
            .create(&NewTask::new("B").priority(Priority::URGENT).due(date("2025-01-02")))
            .unwrap();

        assert_eq!(titles(&store.list_pending_ordered().unwrap()), vec!["B", "A"]);
    }

    #[test]
    fn test_higher_priority_first_without_due_dates() {
        let store = TaskStore::open_in_memory().unwrap();
        store.create(&NewTask::new("C").priority(Priority::MEDIUM)).unwrap();
        store.create(&NewTask::new("D").priority(Priority::IMPORTANT)).unwrap();

        assert_eq!(titles(&store.list_pending_ordered().unwrap()), vec!["D", "C"]);
    }

    #[test]
    fn test_undated_tasks_sort_after_dated_then_by_id() {
        let store = TaskStore::open_in_memory().unwrap();
        store.create(&NewTask::new("undated-1")).unwrap();
        store.create(&NewTask::new("dated").due(date("2030-01-01"))).unwrap();
        store.create(&NewTask::new("undated-2")).unwrap();

        assert_eq!(
            titles(&store.list_pending_ordered().unwrap()),
            vec!["dated", "undated-1", "undated-2"]
        );
    }

    #[test]
    fn test_pending_list_ignores_calendar_date() {
        let store = TaskStore::open_in_memory().unwrap();
        store.create(&NewTask::new("long overdue").due(date("2001-01-01"))).unwrap();
        store.create(&NewTask::new("far future").due(date("2099-12-31"))).unwrap();

        assert_eq!(store.list_pending_ordered().unwrap().len(), 2);
    }

    #[test]
    fn test_update_partial_fields() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store
            .create(&NewTask::new("Draft").description("keep me").due(date("2025-03-01")))
            .unwrap();

        let patch = TaskPatch {
            title: Some("Final".to_string()),
            priority: Some(Priority::IMPORTANT),
            ..TaskPatch::default()
        };
        assert!(store.update(id, &patch).unwrap());

        let task = store.get(id).unwrap().unwrap();
        assert_eq!(task.title, "Final");
        assert_eq!(task.priority, Priority::IMPORTANT);
        assert_eq!(task.description, "keep me");
        assert_eq!(task.due_date, Some(date("2025-03-01")));
    }

    #[test]
    fn test_update_can_clear_due_date() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x").due(date("2025-03-01"))).unwrap();

        let patch = TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        };
        assert!(store.update(id, &patch).unwrap());
        assert_eq!(store.get(id).unwrap().unwrap().due_date, None);
    }

    #[test]
    fn test_update_missing_id_returns_false() {
        let store = TaskStore::open_in_memory().unwrap();
        let patch = TaskPatch {
            title: Some("ghost".to_string()),
            ..TaskPatch::default()
        };
        assert!(!store.update(99, &patch).unwrap());
        assert!(!store.update(99, &TaskPatch::default()).unwrap());
    }

    #[test]
    fn test_empty_patch_reports_existence() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x")).unwrap();
        assert!(store.update(id, &TaskPatch::default()).unwrap());
    }

    #[test]
    fn test_update_rejects_empty_title_and_keeps_row() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("keep")).unwrap();

        let patch = TaskPatch {
            title: Some("  ".to_string()),
            priority: Some(Priority::URGENT),
            ..TaskPatch::default()
        };
        let err = store.update(id, &patch).unwrap_err();
        assert!(err.is_validation());

        let task = store.get(id).unwrap().unwrap();
        assert_eq!(task.title, "keep");
        assert_eq!(task.priority, Priority::NORMAL);
    }

    #[test]
    fn test_completed_status_stamps_once() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x")).unwrap();

        assert!(store.update(id, &TaskPatch::status(TaskStatus::Completed)).unwrap());
        let first = store.get(id).unwrap().unwrap();
        assert_eq!(first.status, TaskStatus::Completed);
        let stamp = first.completed_at.expect("completed_at set");

        // Backdate the stamp directly; completing again must not overwrite it.
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "UPDATE tasks SET completed_at = '2020-01-01 08:00:00' WHERE id = ?1",
                params![id],
            )
            .unwrap();
        }
        assert!(store.update(id, &TaskPatch::status(TaskStatus::Completed)).unwrap());
        let again = store.get(id).unwrap().unwrap();
        assert_ne!(again.completed_at, Some(stamp));
        assert_eq!(
            again.completed_at.unwrap().format(TIMESTAMP_FORMAT).to_string(),
            "2020-01-01 08:00:00"
        );
    }

    #[test]
    fn test_reopen_clears_completed_at() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x")).unwrap();
        store.update(id, &TaskPatch::status(TaskStatus::Completed)).unwrap();
        assert_eq!(store.count_pending().unwrap(), 0);

        assert!(store.update(id, &TaskPatch::status(TaskStatus::Pending)).unwrap());
        let task = store.get(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());
        assert_eq!(store.count_pending().unwrap(), 1);
    }

    #[test]
    fn test_update_if_status_guards_transition() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x")).unwrap();
        let complete = TaskPatch::status(TaskStatus::Completed);

        assert!(store.update_if_status(id, &complete, TaskStatus::Pending).unwrap());
        assert!(!store.update_if_status(id, &complete, TaskStatus::Pending).unwrap());
        assert!(!store.update_if_status(404, &complete, TaskStatus::Pending).unwrap());
    }

    #[test]
    fn test_delete() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x")).unwrap();
        store.create(&NewTask::new("y")).unwrap();
        assert_eq!(store.count_pending().unwrap(), 2);

        assert!(store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
        assert_eq!(store.count_pending().unwrap(), 1);

        assert!(!store.delete(id).unwrap());
        assert_eq!(store.count_pending().unwrap(), 1);
    }

    #[test]
    fn test_delete_completed_task_keeps_pending_count() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("x")).unwrap();
        store.create(&NewTask::new("y")).unwrap();
        store.update(id, &TaskPatch::status(TaskStatus::Completed)).unwrap();

        assert_eq!(store.count_pending().unwrap(), 1);
        assert!(store.delete(id).unwrap());
        assert_eq!(store.count_pending().unwrap(), 1);
    }

    #[test]
    fn test_list_all_puts_completed_last() {
        let store = TaskStore::open_in_memory().unwrap();
        let done = store.create(&NewTask::new("done").priority(Priority::URGENT)).unwrap();
        store.create(&NewTask::new("open")).unwrap();
        store.update(done, &TaskPatch::status(TaskStatus::Completed)).unwrap();

        assert_eq!(titles(&store.list_all().unwrap()), vec!["open", "done"]);
        assert_eq!(titles(&store.list_pending_ordered().unwrap()), vec!["open"]);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tasks.db");

        let id = {
            let store = TaskStore::open(&path).unwrap();
            store.create(&NewTask::new("persist me")).unwrap()
        };

        let store = TaskStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.get(id).unwrap().unwrap().title, "persist me");
    }

    #[test]
    fn test_reads_rows_written_by_older_releases() {
        let (_dir, store) = test_store();
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "INSERT INTO tasks (title, description, due_date, priority, status, created_at) \
                 VALUES ('legacy', NULL, '', 2, 'pending', '2024-05-01 09:30:00')",
                [],
            )
            .unwrap();
        }

        let dated = store
            .create(&NewTask::new("dated").priority(Priority::IMPORTANT).due(date("2025-06-01")))
            .unwrap();

        let tasks = store.list_pending_ordered().unwrap();
        assert_eq!(titles(&tasks), vec!["dated", "legacy"]);
        assert_eq!(tasks[1].description, "");
        assert_eq!(tasks[1].due_date, None);
        assert_eq!(tasks[1].priority, Priority::IMPORTANT);

        store.update(dated, &TaskPatch::status(TaskStatus::Completed)).unwrap();
        let undated = store.create(&NewTask::new("undated").priority(Priority::IMPORTANT)).unwrap();
        let again = store
            .create(&NewTask::new("dated again").priority(Priority::IMPORTANT).due(date("2030-01-01")))
            .unwrap();
        assert!(undated < again);
        assert_eq!(
            titles(&store.list_all().unwrap()),
            vec!["dated again", "legacy", "undated", "dated"]
        );
    }

    #[test]
    fn test_corrupt_priority_is_a_storage_error() {
        let store = TaskStore::open_in_memory().unwrap();
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "INSERT INTO tasks (title, priority, status, created_at) \
                 VALUES ('bad', 9, 'pending', '2024-05-01 09:30:00')",
                [],
            )
            .unwrap();
        }
        assert!(matches!(store.list_pending_ordered(), Err(TaskError::Storage(_))));
    }

    #[test]
    fn test_concurrent_update_and_delete_leave_no_partial_row() {
        let (_dir, store) = test_store();
        let store = Arc::new(store);
        let ids: Vec<i64> = (0..20)
            .map(|i| store.create(&NewTask::new(format!("task {i}"))).unwrap())
            .collect();

        std::thread::scope(|s| {
            let updater = Arc::clone(&store);
            let update_ids = ids.clone();
            s.spawn(move || {
                for id in update_ids {
                    let patch = TaskPatch {
                        title: Some(format!("renamed {id}")),
                        priority: Some(Priority::URGENT),
                        status: Some(TaskStatus::Completed),
                        ..TaskPatch::default()
                    };
                    updater.update(id, &patch).unwrap();
                }
            });

            let deleter = Arc::clone(&store);
            let delete_ids = ids.clone();
            s.spawn(move || {
                for id in delete_ids.into_iter().step_by(2) {
                    deleter.delete(id).unwrap();
                }
            });
        });

        for id in ids {
            if let Some(task) = store.get(id).unwrap() {
                // Either fully updated or untouched.
                let updated = task.title.starts_with("renamed");
                assert_eq!(task.priority == Priority::URGENT, updated);
                assert_eq!(task.status == TaskStatus::Completed, updated);
                assert_eq!(task.completed_at.is_some(), updated);
            }
        }
    }
}
