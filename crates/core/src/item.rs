//! Work item model - the tagged item taxonomy.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::status::Status;

/// Custom text field holding the internal-dependency summary.
pub const INTERNAL_DEPENDENCIES: &str = "Internal dependencies";

/// Custom text field holding the external-dependency summary.
pub const EXTERNAL_DEPENDENCIES: &str = "External dependencies";

/// A unit of work contributing to a milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Unique identifier
    pub id: ItemId,

    /// Item title
    pub name: String,

    /// Display name of the owning group
    pub group: String,

    /// Aggregated completion status
    pub status: Status,

    /// Explicit completed flag, set when the item is closed out
    pub completed: bool,

    /// `;`-delimited planned-sprint tag, if any
    pub planned_sprint: Option<String>,
}

/// A scheduled container whose explicit links define cross-team
/// dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier
    pub id: ItemId,

    /// Milestone title
    pub name: String,

    /// Display name of the owning group; for program milestones this is
    /// the program name
    pub group: String,

    /// Aggregated completion status
    pub status: Status,

    /// Explicit dependency links to items anywhere in the hierarchy
    pub links: Vec<ItemId>,

    /// Leaf items directly beneath this milestone
    pub children: Vec<ItemId>,
}

/// Any item in the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkItem {
    /// A unit of work
    Leaf(Leaf),
    /// A scheduled container
    Milestone(Milestone),
}

impl WorkItem {
    /// Unique identifier.
    pub fn id(&self) -> ItemId {
        match self {
            WorkItem::Leaf(leaf) => leaf.id,
            WorkItem::Milestone(milestone) => milestone.id,
        }
    }

    /// Item title.
    pub fn name(&self) -> &str {
        match self {
            WorkItem::Leaf(leaf) => &leaf.name,
            WorkItem::Milestone(milestone) => &milestone.name,
        }
    }

    /// Display name of the owning group.
    pub fn group(&self) -> &str {
        match self {
            WorkItem::Leaf(leaf) => &leaf.group,
            WorkItem::Milestone(milestone) => &milestone.group,
        }
    }

    /// Aggregated completion status, opaque to the caller.
    pub fn status(&self) -> Status {
        match self {
            WorkItem::Leaf(leaf) => leaf.status,
            WorkItem::Milestone(milestone) => milestone.status,
        }
    }

    /// Is the item closed out? A leaf counts as closed when its explicit
    /// completed flag is set or its aggregated status is Completed.
    pub fn is_closed(&self) -> bool {
        match self {
            WorkItem::Leaf(leaf) => leaf.completed || leaf.status == Status::Completed,
            WorkItem::Milestone(milestone) => milestone.status == Status::Completed,
        }
    }

    /// Raw planned-sprint tag. Only leaves carry one.
    pub fn planned_sprint(&self) -> Option<&str> {
        match self {
            WorkItem::Leaf(leaf) => leaf.planned_sprint.as_deref(),
            WorkItem::Milestone(_) => None,
        }
    }
}
