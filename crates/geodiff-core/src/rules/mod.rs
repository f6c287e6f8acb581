//! Consistency rules applied before a change is recorded.

pub mod validation;

pub use validation::{classify_action, validate_action, ActionVerdict, InvalidAction, InvalidActionReason};
