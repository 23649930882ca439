//! In-memory host backend.
//!
//! Holds a whole portfolio in process: items, group membership, the
//! roster configuration, custom-field values, display colors, and the
//! reverse indexes the engine's incremental path needs. This is the
//! backend the CLI runs against and the fixture every engine test is
//! built on.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use teamdeps_core::{ItemId, Program, Status, WorkItem};

use crate::config::RosterConfig;
use crate::snapshot::{GroupSnapshot, ItemSnapshot, Portfolio};
use crate::trait_::{Host, HostError, Result};

/// Display color applied to a milestone flagged for attention.
pub const ALERT_COLOR: &str = "#DC6464";

/// Host backend holding the whole hierarchy in process.
pub struct MemoryHost {
    items: BTreeMap<ItemId, WorkItem>,
    /// Group names in load order
    groups: Vec<String>,
    config: RosterConfig,
    fields: HashMap<ItemId, BTreeMap<String, String>>,
    colors: HashMap<ItemId, String>,
    /// leaf -> milestones it is directly beneath
    tagged: HashMap<ItemId, Vec<ItemId>>,
    /// item -> milestones whose link set contains it
    linked_from: HashMap<ItemId, Vec<ItemId>>,
}

impl MemoryHost {
    /// Build a host from a portfolio snapshot and a roster
    /// configuration.
    pub fn new(portfolio: Portfolio, config: RosterConfig) -> Self {
        let mut items = BTreeMap::new();
        let mut fields: HashMap<ItemId, BTreeMap<String, String>> = HashMap::new();
        let mut colors = HashMap::new();
        let mut groups = Vec::new();
        for group in portfolio.groups {
            groups.push(group.name.clone());
            for snap in group.items {
                if !snap.fields.is_empty() {
                    fields.insert(snap.id, snap.fields.clone());
                }
                if let Some(color) = snap.color.clone() {
                    colors.insert(snap.id, color);
                }
                items.insert(snap.id, snap.into_work_item(&group.name));
            }
        }
        let mut host = Self {
            items,
            groups,
            config,
            fields,
            colors,
            tagged: HashMap::new(),
            linked_from: HashMap::new(),
        };
        host.rebuild_indexes();
        host
    }

    /// Snapshot the current state, derived annotations included.
    pub fn to_portfolio(&self) -> Portfolio {
        let mut groups: Vec<GroupSnapshot> = self
            .groups
            .iter()
            .map(|name| GroupSnapshot {
                name: name.clone(),
                items: Vec::new(),
            })
            .collect();
        for item in self.items.values() {
            let Some(group) = groups.iter_mut().find(|g| g.name == item.group()) else {
                continue;
            };
            group.items.push(ItemSnapshot::from_work_item(
                item,
                self.fields.get(&item.id()),
                self.colors.get(&item.id()),
            ));
        }
        Portfolio { groups }
    }

    /// Current display color of an item, if one has been applied.
    pub fn color(&self, id: ItemId) -> Option<&str> {
        self.colors.get(&id).map(String::as_str)
    }

    // === Authoring surface ===
    //
    // Item and link authoring belongs to the host, not the engine. These
    // setters are what a real host's editing UI would be doing between
    // change notifications; the CLI tests and engine tests drive them
    // directly.

    /// Set an item's aggregated status.
    pub fn set_status(&mut self, id: ItemId, status: Status) -> Result<()> {
        match self.item_mut(id)? {
            WorkItem::Leaf(leaf) => leaf.status = status,
            WorkItem::Milestone(milestone) => milestone.status = status,
        }
        Ok(())
    }

    /// Set a leaf's explicit completed flag. Milestones are left alone.
    pub fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<()> {
        if let WorkItem::Leaf(leaf) = self.item_mut(id)? {
            leaf.completed = completed;
        }
        Ok(())
    }

    /// Replace a leaf's planned-sprint tag.
    pub fn set_planned_sprint(&mut self, id: ItemId, tag: Option<String>) -> Result<()> {
        if let WorkItem::Leaf(leaf) = self.item_mut(id)? {
            leaf.planned_sprint = tag;
        }
        Ok(())
    }

    /// Add a dependency link from a milestone to `target`.
    pub fn link(&mut self, milestone: ItemId, target: ItemId) -> Result<()> {
        if let WorkItem::Milestone(m) = self.item_mut(milestone)? {
            if !m.links.contains(&target) {
                m.links.push(target);
            }
        }
        self.rebuild_indexes();
        Ok(())
    }

    /// Remove a dependency link from a milestone to `target`.
    pub fn unlink(&mut self, milestone: ItemId, target: ItemId) -> Result<()> {
        if let WorkItem::Milestone(m) = self.item_mut(milestone)? {
            m.links.retain(|&id| id != target);
        }
        self.rebuild_indexes();
        Ok(())
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut WorkItem> {
        self.items.get_mut(&id).ok_or(HostError::NotFound(id))
    }

    fn rebuild_indexes(&mut self) {
        self.tagged.clear();
        self.linked_from.clear();
        for item in self.items.values() {
            if let WorkItem::Milestone(milestone) = item {
                for &child in &milestone.children {
                    self.tagged.entry(child).or_default().push(milestone.id);
                }
                for &target in &milestone.links {
                    self.linked_from
                        .entry(target)
                        .or_default()
                        .push(milestone.id);
                }
            }
        }
    }
}

impl Host for MemoryHost {
    fn find_programs(&self, pattern: &str, inverted: bool) -> Result<Vec<Program>> {
        let re = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(self
            .groups
            .iter()
            .filter(|name| re.is_match(name) != inverted)
            .map(|name| Program::new(name.clone()))
            .collect())
    }

    fn is_team_in_program(&self, program: &str, team: &str) -> bool {
        self.config.is_team_in_program(program, team)
    }

    fn item(&self, id: ItemId) -> Result<WorkItem> {
        self.items.get(&id).cloned().ok_or(HostError::NotFound(id))
    }

    fn milestones_of(&self, program: &str) -> Result<Vec<ItemId>> {
        if !self.groups.iter().any(|name| name == program) {
            return Err(HostError::UnknownProgram(program.to_string()));
        }
        Ok(self
            .items
            .values()
            .filter_map(|item| match item {
                WorkItem::Milestone(m) if m.group == program => Some(m.id),
                _ => None,
            })
            .collect())
    }

    fn tagged_milestones(&self, leaf: ItemId) -> Vec<ItemId> {
        self.tagged.get(&leaf).cloned().unwrap_or_default()
    }

    fn linking_milestones(&self, leaf: ItemId) -> Vec<ItemId> {
        self.linked_from.get(&leaf).cloned().unwrap_or_default()
    }

    fn custom_field(&self, id: ItemId, field: &str) -> Option<String> {
        self.fields.get(&id).and_then(|fields| fields.get(field)).cloned()
    }

    fn set_custom_field(&mut self, id: ItemId, field: &str, value: &str) -> Result<()> {
        if !self.items.contains_key(&id) {
            return Err(HostError::NotFound(id));
        }
        self.fields
            .entry(id)
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn flag_attention(&mut self, milestone: ItemId) -> Result<()> {
        if !self.items.contains_key(&milestone) {
            return Err(HostError::NotFound(milestone));
        }
        self.colors.insert(milestone, ALERT_COLOR.to_string());
        Ok(())
    }
}
