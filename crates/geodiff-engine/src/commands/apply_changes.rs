//! Run orchestration for a change stream.
//!
//! ## Pipeline (in order):
//! 1. Open one transaction on the connection
//! 2. Feed each `(action, snapshot)` through the change processor
//! 3. Finalize the run: one summary recomputation per touched changeset
//! 4. Commit, or roll back on `dry_run`
//!
//! Any error before the commit drops the transaction, so a failed run
//! leaves the database as it was.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use geodiff_core::errors::Result;
use geodiff_core::{ChangeAction, ChangeProcessor, EntitySnapshot, RunReport};
use geodiff_core_types::RunId;
use geodiff_store::errors::from_rusqlite;
use geodiff_store::SqliteStore;
use rusqlite::Connection;
use serde::Serialize;

use crate::config::WriterConfig;

/// Options for a single apply run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// If true, compute everything but roll back instead of committing.
    pub dry_run: bool,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub report: RunReport,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn run_id(&self) -> &RunId {
        &self.report.run_id
    }
}

/// Apply a change stream to the database in a single transaction.
///
/// Items are consumed lazily; a reader error aborts the run like any other.
///
/// # Errors
///
/// Returns the first error raised by the reader, the processor (missing
/// timestamp, invalid action under `break`) or the store. Nothing is
/// committed in that case.
pub fn apply_changes<I>(
    conn: &mut Connection,
    changes: I,
    config: &WriterConfig,
    options: ApplyOptions,
) -> Result<RunSummary>
where
    I: IntoIterator<Item = Result<(ChangeAction, EntitySnapshot)>>,
{
    let start = Instant::now();
    let mut processor = ChangeProcessor::new(config.processor_options());
    let run_id = processor.run_id().clone();

    geodiff_core::log_op_start!(
        "apply_changes",
        run = run_id,
        invalid_actions = config.invalid_actions.as_str(),
        dry_run = options.dry_run
    );

    match run_in_transaction(conn, &mut processor, changes, options) {
        Ok(report) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            geodiff_core::log_op_end!(
                "apply_changes",
                duration_ms = duration_ms,
                run = run_id,
                processed = report.stats.processed,
                skipped = report.stats.skipped,
                invalid = report.stats.invalid,
                changesets = report.changesets.len()
            );
            Ok(RunSummary {
                report,
                dry_run: options.dry_run,
                duration_ms,
            })
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            let e = if e.run_id().is_some() {
                e
            } else {
                e.with_run_id(run_id)
            };
            geodiff_core::log_op_error!("apply_changes", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

fn run_in_transaction<I>(
    conn: &mut Connection,
    processor: &mut ChangeProcessor,
    changes: I,
    options: ApplyOptions,
) -> Result<RunReport>
where
    I: IntoIterator<Item = Result<(ChangeAction, EntitySnapshot)>>,
{
    let tx = conn.transaction().map_err(from_rusqlite)?;

    let report = {
        let mut store = SqliteStore::new(&tx);
        for item in changes {
            let (action, entity) = item.map_err(|e| e.with_run_id(processor.run_id().clone()))?;
            processor.process(&mut store, action, &entity)?;
        }
        processor.finalize_run(&mut store)?
    };

    if options.dry_run {
        tx.rollback().map_err(from_rusqlite)?;
    } else {
        tx.commit().map_err(from_rusqlite)?;
    }
    Ok(report)
}
