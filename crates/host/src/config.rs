//! Program roster configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::trait_::Result;

/// Which programs to monitor and which teams belong to each.
///
/// The pattern and inversion flag drive program discovery; the roster
/// table backs the team-membership oracle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Full-match pattern selecting monitored program names
    pub program_pattern: String,

    /// Monitor the programs that do NOT match instead
    #[serde(default)]
    pub inverted_match: bool,

    /// Program name to member team names
    #[serde(default)]
    pub programs: BTreeMap<String, BTreeSet<String>>,
}

impl RosterConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Is `team` on `program`'s roster? Unknown programs have empty
    /// rosters.
    pub fn is_team_in_program(&self, program: &str, team: &str) -> bool {
        self.programs
            .get(program)
            .map_or(false, |teams| teams.contains(team))
    }
}
