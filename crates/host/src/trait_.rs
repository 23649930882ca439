//! Host capability abstraction.

use teamdeps_core::{ItemId, Program, WorkItem};

/// Error type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;

/// Errors that can occur in a host backend.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Item does not exist, or no longer exists
    #[error("no such item: {0}")]
    NotFound(ItemId),

    /// Program is not known to the host
    #[error("unknown program: {0}")]
    UnknownProgram(String),

    /// Program name pattern failed to compile
    #[error("bad program pattern: {0}")]
    BadPattern(#[from] regex::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and write capabilities the dependency engine needs from its
/// host environment.
///
/// Everything is synchronous: host state is in-process and immediately
/// available, and the engine never suspends mid-computation.
pub trait Host {
    // === Discovery ===

    /// Programs whose name matches `pattern` (a full-match regular
    /// expression), or the non-matching programs when `inverted` is set.
    fn find_programs(&self, pattern: &str, inverted: bool) -> Result<Vec<Program>>;

    /// Membership oracle: is `team` on `program`'s roster?
    fn is_team_in_program(&self, program: &str, team: &str) -> bool;

    // === Item reads ===

    /// Resolve a live item. Links, children, status, and tags travel
    /// with the resolved value.
    fn item(&self, id: ItemId) -> Result<WorkItem>;

    /// Milestones owned by `program`.
    fn milestones_of(&self, program: &str) -> Result<Vec<ItemId>>;

    /// Milestones the leaf is directly beneath.
    fn tagged_milestones(&self, leaf: ItemId) -> Vec<ItemId>;

    /// Milestones whose link set contains `leaf`.
    fn linking_milestones(&self, leaf: ItemId) -> Vec<ItemId>;

    /// Current value of a named custom text field.
    fn custom_field(&self, id: ItemId, field: &str) -> Option<String>;

    // === Write effects ===

    /// Overwrite a named custom text field.
    fn set_custom_field(&mut self, id: ItemId, field: &str, value: &str) -> Result<()>;

    /// Mark a milestone as needing attention. How the flag is rendered
    /// is the host's business; the engine only ever raises it.
    fn flag_attention(&mut self, milestone: ItemId) -> Result<()>;
}
