//! Change notifications delivered by the host.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, ItemId};
use crate::Time;

/// A change notification for a single item.
///
/// The host resolves its native event bus into these descriptors; the
/// engine resolves the item and dispatches on what it turns out to be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unique identifier
    #[serde(default)]
    pub id: EventId,

    /// The item that changed
    pub item: ItemId,

    /// The kind of fact that changed
    pub kind: ChangeKind,

    /// When the change was observed
    #[serde(default = "now")]
    pub at: Time,
}

impl ChangeEvent {
    /// Create a new change event for `item`.
    pub fn new(item: ItemId, kind: ChangeKind) -> Self {
        Self {
            id: EventId::new(),
            item,
            kind,
            at: now(),
        }
    }
}

fn now() -> Time {
    chrono::Utc::now()
}

/// The category of fact that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Completion status or completed flag changed
    Status,
    /// A custom field changed (the planned-sprint tag included)
    Field,
    /// The link set changed
    Links,
    /// Tagging under a milestone changed
    Tags,
}
