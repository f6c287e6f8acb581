//! geodiff Engine - Run orchestration layer
//!
//! Coordinates the change pipeline in `geodiff-core` with the SQLite
//! backend in `geodiff-store`: reads the change stream, owns the run
//! transaction and reports the outcome.

pub mod commands;
pub mod config;
pub mod reader;

pub use commands::apply_changes::{apply_changes, ApplyOptions, RunSummary};
pub use commands::changeset_report::{changeset_report, ChangesetReport};
pub use config::WriterConfig;
pub use reader::ChangeReader;
