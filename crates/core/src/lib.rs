//! Teamdeps core data models.
//!
//! This crate defines the domain vocabulary shared by the dependency
//! engine and its host adapters: item identities, the completion-status
//! lattice and its single aggregation rule, the work-item taxonomy, and
//! the naming conventions that tie teams and programs together.

#![warn(missing_docs)]

// Core identities
mod id;

// Statuses and aggregation
mod status;

// Item taxonomy
mod item;

// Naming conventions
mod team;
mod sprint;

// Change notifications
mod event;

// Re-exports
pub use id::{EventId, ItemId};
pub use status::{RollupStatus, Status};
pub use item::{Leaf, Milestone, WorkItem, EXTERNAL_DEPENDENCIES, INTERNAL_DEPENDENCIES};
pub use team::{team_name, Program, TEAM_GROUP_PREFIX};
pub use sprint::max_planned_sprint;
pub use event::{ChangeEvent, ChangeKind};

/// Timestamp type used across teamdeps.
pub type Time = chrono::DateTime<chrono::Utc>;
