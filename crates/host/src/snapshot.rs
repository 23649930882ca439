//! Portfolio snapshot format.
//!
//! A snapshot is the JSON representation of a whole hierarchy: groups
//! (programs and team backlogs) and their items, including any derived
//! custom-field values and display colors, so a saved snapshot shows
//! the engine's output in place.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use teamdeps_core::{ItemId, Leaf, Milestone, Status, WorkItem};

use crate::trait_::Result;

/// A whole hierarchy as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Every group in the hierarchy, programs and team backlogs alike
    pub groups: Vec<GroupSnapshot>,
}

impl Portfolio {
    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the snapshot as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// One group and the items it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Group display name
    pub name: String,

    /// Items owned by the group
    pub items: Vec<ItemSnapshot>,
}

/// Discriminator for snapshot items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A unit of work
    Leaf,
    /// A scheduled container
    Milestone,
}

/// One item as stored in a snapshot. The owning group is implied by the
/// enclosing [`GroupSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Unique identifier
    pub id: ItemId,

    /// Item title
    pub name: String,

    /// Leaf or milestone
    pub kind: ItemKind,

    /// Aggregated completion status
    #[serde(default)]
    pub status: Status,

    /// Explicit completed flag (leaves)
    #[serde(default)]
    pub completed: bool,

    /// `;`-delimited planned-sprint tag (leaves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_sprint: Option<String>,

    /// Explicit dependency links (milestones)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ItemId>,

    /// Direct child leaves (milestones)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemId>,

    /// Named custom text fields, derived summaries included
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,

    /// Display color, if one has been applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ItemSnapshot {
    /// Materialize the snapshot entry as a live item owned by `group`.
    pub fn into_work_item(self, group: &str) -> WorkItem {
        match self.kind {
            ItemKind::Leaf => WorkItem::Leaf(Leaf {
                id: self.id,
                name: self.name,
                group: group.to_string(),
                status: self.status,
                completed: self.completed,
                planned_sprint: self.planned_sprint,
            }),
            ItemKind::Milestone => WorkItem::Milestone(Milestone {
                id: self.id,
                name: self.name,
                group: group.to_string(),
                status: self.status,
                links: self.links,
                children: self.children,
            }),
        }
    }

    /// Snapshot entry for a live item plus its host-side annotations.
    pub fn from_work_item(
        item: &WorkItem,
        fields: Option<&BTreeMap<String, String>>,
        color: Option<&String>,
    ) -> Self {
        let (kind, completed, planned_sprint, links, children) = match item {
            WorkItem::Leaf(leaf) => (
                ItemKind::Leaf,
                leaf.completed,
                leaf.planned_sprint.clone(),
                Vec::new(),
                Vec::new(),
            ),
            WorkItem::Milestone(milestone) => (
                ItemKind::Milestone,
                false,
                None,
                milestone.links.clone(),
                milestone.children.clone(),
            ),
        };
        Self {
            id: item.id(),
            name: item.name().to_string(),
            kind,
            status: item.status(),
            completed,
            planned_sprint,
            links,
            children,
            fields: fields.cloned().unwrap_or_default(),
            color: color.cloned(),
        }
    }
}
