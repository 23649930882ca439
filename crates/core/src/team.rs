//! Team and program naming conventions.

use serde::{Deserialize, Serialize};

/// Prefix that marks a group as a team backlog.
pub const TEAM_GROUP_PREFIX: &str = "Team - ";

/// A cross-team delivery initiative, identified by name.
///
/// The roster of member teams is owned by the host configuration and
/// queried through the membership oracle, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program name; also the owning-group name of its milestones
    pub name: String,
}

impl Program {
    /// Create a program handle by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Team name carried by a team-scoped group.
///
/// Returns `None` for groups that do not follow the `"Team - "` naming
/// convention; such groups never participate in dependency
/// classification.
pub fn team_name(group: &str) -> Option<&str> {
    group.strip_prefix(TEAM_GROUP_PREFIX)
}
