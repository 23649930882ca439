//! External-dependency rollup.

use std::collections::{BTreeMap, BTreeSet};

use teamdeps_core::{RollupStatus, Status};

use crate::classify::LinkedWork;

/// Result of rolling up a milestone's external partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRollup {
    /// `"<Team> (<status>)"` tokens, deduplicated, sorted by full token
    /// text and joined with `", "`; empty when no external dependency
    /// exists
    pub summary: String,

    /// True iff at least one external team group exists. The host
    /// translates this into its needs-attention convention.
    pub has_external_dependency: bool,
}

/// Summarize the external partition of a milestone's links.
///
/// Each contributing team's statuses reduce to one label through the
/// single aggregation rule; one token per team, sorted by full token
/// text.
pub fn compute_external(external: &[LinkedWork]) -> ExternalRollup {
    let mut groups: BTreeMap<&str, Vec<Status>> = BTreeMap::new();
    for work in external {
        groups.entry(work.team.as_str()).or_default().push(work.status);
    }
    let tokens: BTreeSet<String> = groups
        .iter()
        .map(|(team, statuses)| {
            format!("{} ({})", team, RollupStatus::aggregate(statuses.iter().copied()))
        })
        .collect();
    ExternalRollup {
        has_external_dependency: !groups.is_empty(),
        summary: tokens.into_iter().collect::<Vec<_>>().join(", "),
    }
}
