//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_ENTITY_TYPE: &str = "entity_type";
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_CHANGESET_ID: &str = "changeset_id";
pub const FIELD_ACTION: &str = "action";

// Run counters
pub const FIELD_PROCESSED: &str = "processed";
pub const FIELD_SKIPPED: &str = "skipped";
pub const FIELD_INVALID: &str = "invalid";
pub const FIELD_CHANGESETS: &str = "changesets";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_INVALID_ACTION: &str = "invalid_action";
