//! Embedded SQLite task repository.

mod repository;

pub use repository::SqliteTaskRepository;
