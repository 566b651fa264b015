//! Task lifecycle rules on top of [`TaskStore`].
//!
//! Completing a task is a one-way transition: pending -> completed, stamped
//! with the completion time and answered with a short encouragement.

use rand::seq::SliceRandom;
use tracing::info;

use crate::error::TaskResult;
use crate::models::{TaskPatch, TaskStatus};
use crate::store::TaskStore;

/// Shown after a task is completed. Never empty.
pub const ENCOURAGEMENTS: &[&str] = &[
    "Brilliant! Today's effort really shows. ✨",
    "Doesn't finishing a task feel great? Keep it up! 🚀",
    "Your persistence is working wonders! 💪",
    "One step closer to the goal. Every step counts! ✨",
    "Closer to the finish line than yesterday. Keep going! 🚀",
    "More refreshing than a cup of coffee! ☕",
    "Your efficiency is amazing. Keep going! 💯",
    "Every finished task brings success a little nearer! 🏆",
    "Your progress is plain to see. Be proud! 👏",
    "Persistence pays off, and you did it! 🌟",
];

/// Fields a caller may change after creation. `id` and `created_at` are
/// fixed; `completed_at` follows `status`.
pub fn mutable_fields() -> &'static [&'static str] {
    &["title", "description", "due_date", "priority", "status"]
}

/// Mark a pending task completed.
///
/// Returns `(true, message)` on the transition, `(false, "")` if the id is
/// unknown or the task was already completed.
pub fn complete(store: &TaskStore, id: i64) -> TaskResult<(bool, String)> {
    let changed =
        store.update_if_status(id, &TaskPatch::status(TaskStatus::Completed), TaskStatus::Pending)?;
    if !changed {
        return Ok((false, String::new()));
    }

    let message = pick_encouragement();
    info!(task_id = id, %message, "task completed");
    Ok((true, message))
}

fn pick_encouragement() -> String {
    ENCOURAGEMENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Well done!")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTask, Priority};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_complete_transitions_once() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.create(&NewTask::new("Write report")).unwrap();

        let (ok, message) = complete(&store, id).unwrap();
        assert!(ok);
        assert!(ENCOURAGEMENTS.contains(&message.as_str()));

        let task = store.get(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed_at.is_some());

        assert_eq!(complete(&store, id).unwrap(), (false, String::new()));
        assert_eq!(store.get(id).unwrap().unwrap().completed_at, task.completed_at);
    }

    #[test]
    fn test_complete_missing_id() {
        let store = TaskStore::open_in_memory().unwrap();
        assert_eq!(complete(&store, 7).unwrap(), (false, String::new()));
    }

    #[test]
    fn test_mutable_fields() {
        let fields = mutable_fields();
        assert_eq!(fields.len(), 5);
        assert!(!fields.contains(&"id"));
        assert!(!fields.contains(&"created_at"));
    }

    #[test]
    fn test_buy_milk_pay_rent_flow() {
        let store = TaskStore::open_in_memory().unwrap();

        let milk = store
            .create(
                &NewTask::new("Buy milk")
                    .priority(Priority::MEDIUM)
                    .due(date("2025-06-01")),
            )
            .unwrap();
        let rent = store
            .create(
                &NewTask::new("Pay rent")
                    .priority(Priority::URGENT)
                    .due(date("2025-06-02")),
            )
            .unwrap();
        assert_eq!((milk, rent), (1, 2));

        let titles: Vec<String> = store
            .list_pending_ordered()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Pay rent", "Buy milk"]);

        let (ok, message) = complete(&store, milk).unwrap();
        assert!(ok);
        assert!(!message.is_empty());

        let pending = store.list_pending_ordered().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Pay rent");
        assert_eq!(store.count_pending().unwrap(), 1);
    }
}
