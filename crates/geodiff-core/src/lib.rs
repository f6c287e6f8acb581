//! geodiff Core - change-diff and changeset-aggregation kernel
//!
//! This crate turns a stream of versioned geographic entity changes into
//! audit records, including:
//! - Entity, geometry, change and changeset models
//! - Geometry normalization for degenerate one-point lines
//! - Tag set comparison with symmetric difference
//! - Action validation against the last known entity version
//! - Change diff building into immutable `ChangeRecord` values
//! - Changeset aggregation with a bounded FIFO id cache
//! - Collaborator traits for the entity store, changeset store and sink
//!
//! Transaction control and persistence live outside this crate; every
//! store interaction goes through the traits in [`collaborators`].

pub mod changeset;
pub mod collaborators;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod policy;
pub mod processor;
pub mod rules;
pub mod users;

// Re-export commonly used types
pub use changeset::{ChangesetAggregator, ChangesetIdCache, EnsureOutcome};
pub use collaborators::{ChangeSink, ChangeStore, ChangesetStore, EntityStore, UserStore};
pub use diff::{build_change, compare_tags, normalize_geometry};
pub use errors::{ExError, ExErrorKind, GeoDiffError, Result};
pub use model::{
    ChangeAction, ChangeRecord, ChangesetRecord, Coordinate, EntitySnapshot, EntityType,
    Geometry, RelationMember, Tags, User,
};
pub use ops::MemoryStore;
pub use policy::InvalidActionsMode;
pub use processor::{ChangeOutcome, ChangeProcessor, ProcessorOptions, RunReport, RunStats};
pub use rules::{validate_action, ActionVerdict, InvalidAction, InvalidActionReason};
pub use users::UserRegistry;
