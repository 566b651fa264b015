//! SQLite persistence for tasks.
//!
//! The store is the only component that opens or writes the database file.

mod schema;
mod task;

pub use task::TaskStore;
