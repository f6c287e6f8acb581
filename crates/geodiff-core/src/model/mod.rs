pub mod action;
pub mod change;
pub mod changeset;
pub mod entity;
pub mod geometry;

pub use action::ChangeAction;
pub use change::ChangeRecord;
pub use changeset::{ChangesetRecord, ANONYMOUS_USER_ID};
pub use entity::{EntitySnapshot, EntityType, RelationMember, Tags, User};
pub use geometry::{Coordinate, Geometry};
