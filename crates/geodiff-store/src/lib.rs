//! geodiff Store - SQLite persistence for the change log
//!
//! Provides:
//! - Connection helpers and pragmas
//! - Embedded migrations with checksum verification
//! - `SqliteStore`, implementing every collaborator trait of `geodiff-core`
//! - Read-side queries for changesets and audit records

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
