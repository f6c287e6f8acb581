//! Operation logging macros.
//!
//! Every operation emits one `start` event and then either `end` or
//! `end_error`, each tagged with `component` and `op`. A change run passes
//! its id as `run = <RunId>` so every event of the run can be correlated
//! through the `run_id` field. `log_op_error!` reads the run, entity and
//! changeset straight out of the [`ExError`](crate::errors::ExError) context.

use geodiff_core_types::RunId;

#[doc(hidden)]
pub use geodiff_core_types::schema as __schema;

#[doc(hidden)]
pub fn __run_field(run: &RunId) -> &str {
    run.as_str()
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use geodiff_core::log_op_start;
/// # use geodiff_core_types::RunId;
/// let run_id = RunId::new();
/// log_op_start!("apply_changes", run = run_id, dry_run = false);
/// log_op_start!("finalize_run", changeset_id = 500);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, run = $run:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::macros::__schema::EVENT_START,
            run_id = $crate::logging_facility::macros::__run_field(&$run),
            $($($field)*)?
        )
    };
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::macros::__schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use geodiff_core::log_op_end;
/// # use geodiff_core_types::RunId;
/// let run_id = RunId::new();
/// log_op_end!("apply_changes", duration_ms = 42, run = run_id, processed = 3);
/// log_op_end!("finalize_run", duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr, run = $run:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::macros::__schema::EVENT_END,
            duration_ms = $duration,
            run_id = $crate::logging_facility::macros::__run_field(&$run),
            $($($field)*)?
        )
    };
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::macros::__schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation
///
/// Accepts anything convertible into `ExError`. Besides the stable
/// `err.code`, the event carries whichever of `run_id`, `entity_type`,
/// `entity_id` and `changeset_id` the error knows about.
///
/// # Example
///
/// ```
/// # use geodiff_core::{log_op_error, errors::GeoDiffError, model::EntityType};
/// let err = GeoDiffError::MissingTimestamp { entity_type: EntityType::Point, entity_id: 1 };
/// log_op_error!("apply_changes", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::macros::__schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            run_id = ex_err.run_id().map(|r| r.as_str()),
            entity_type = ex_err.entity_type().map(|t| t.as_str()),
            entity_id = ex_err.entity_id(),
            changeset_id = ex_err.changeset_id(),
            $($($field)*)?
        );
    }};
}
