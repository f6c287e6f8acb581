//! Structured logging for change runs
//!
//! Every operation is bracketed by a start event and either an end or an
//! end_error event, all carrying the canonical fields from
//! `geodiff_core_types::schema`:
//!
//! ```rust
//! use geodiff_core::logging_facility::{init, Profile};
//! use geodiff_core::{log_op_end, log_op_start};
//! use geodiff_core_types::RunId;
//!
//! init(Profile::Development);
//! let run_id = RunId::new();
//! log_op_start!("apply_changes", run = run_id);
//! log_op_end!("apply_changes", duration_ms = 12, run = run_id, processed = 3);
//! ```
//!
//! Failures go through `log_op_error!`, which accepts anything convertible
//! into [`crate::errors::ExError`] and records its code plus the run, entity
//! and changeset the error carries.
//! Tests assert on emitted events through [`init_test_capture`].

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
