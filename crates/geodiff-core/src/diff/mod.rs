//! Change diff computation.
//!
//! Turns an `(action, previous?, next)` triple into an immutable
//! [`ChangeRecord`](crate::model::ChangeRecord).
//!
//! ## Entry point
//!
//! ```
//! use geodiff_core::diff::build_change;
//! use geodiff_core::model::{ChangeAction, EntitySnapshot, EntityType, Geometry};
//!
//! let prev = EntitySnapshot::new(EntityType::Point, 1, 2, 10)
//!     .with_tag("name", "A")
//!     .with_geometry(Geometry::point(1.0, 2.0));
//! let next = EntitySnapshot::new(EntityType::Point, 1, 3, 11)
//!     .with_tag("name", "A")
//!     .with_geometry(Geometry::point(1.0, 2.5));
//!
//! let record = build_change(ChangeAction::Modify, Some(&prev), &next);
//! assert!(!record.tags_changed);
//! assert!(record.geometry_changed);
//! ```
//!
//! ## Guarantees
//!
//! - **Purity**: inputs are borrowed immutably; the record owns copies.
//! - **Normalization symmetry**: both sides go through
//!   [`normalize::normalize_geometry`] before comparison.
//! - **Totality**: missing previous state, tags or geometry is data, never an error.

pub mod engine;
pub mod human_summary;
pub mod model;
pub mod normalize;
pub mod tags;

pub use engine::build_change;
pub use human_summary::render_change_summary;
pub use model::{TagComparison, TagValueChange};
pub use normalize::normalize_geometry;
pub use tags::compare_tags;
