//! Internal-dependency rollup.

use std::collections::BTreeMap;

use teamdeps_core::max_planned_sprint;

use crate::classify::LinkedWork;

/// Label used for a team whose open items carry no qualifying sprint
/// token.
const NOT_SET: &str = "not set";

/// Summarize the internal partition of a milestone's links.
///
/// Closed targets drop out first. Each remaining team contributes its
/// furthest open planned sprint, reduced across the team's items by
/// plain string comparison (an item with no qualifying token sorts
/// below any that has one). A single remaining team is not an
/// actionable cross-team dependency, so anything short of two teams
/// yields the empty string. Entries are ordered ascending by rendered
/// sprint label, team name breaking ties, and joined with single
/// spaces.
pub fn compute_internal(internal: &[LinkedWork]) -> String {
    let mut furthest: BTreeMap<&str, Option<String>> = BTreeMap::new();
    for work in internal.iter().filter(|w| !w.closed) {
        let sprint = work.planned_sprint.as_deref().and_then(max_planned_sprint);
        let entry = furthest.entry(work.team.as_str()).or_insert(None);
        if sprint > *entry {
            *entry = sprint;
        }
    }
    if furthest.len() < 2 {
        return String::new();
    }
    let mut entries: Vec<(String, &str)> = furthest
        .iter()
        .map(|(team, sprint)| (sprint.as_deref().unwrap_or(NOT_SET).to_string(), *team))
        .collect();
    entries.sort();
    entries
        .iter()
        .map(|(label, team)| format!("{team} ({label})"))
        .collect::<Vec<_>>()
        .join(" ")
}
