//! Repository layer mapping change-log domain types to SQLite

pub mod hydration;
pub mod queries;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteStore;
