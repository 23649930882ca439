//! Link classification relative to a program's roster.

use teamdeps_core::{team_name, ItemId, Milestone, Status};
use teamdeps_host::Host;

/// A milestone link resolved down to the facts the aggregators need.
#[derive(Debug, Clone)]
pub struct LinkedWork {
    /// Link target
    pub id: ItemId,

    /// Owning team, per the group naming convention
    pub team: String,

    /// Target's aggregated status
    pub status: Status,

    /// Target is closed out (explicit flag or aggregated Completed)
    pub closed: bool,

    /// Target's raw planned-sprint tag
    pub planned_sprint: Option<String>,
}

/// A milestone's links partitioned against a program roster.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Links whose team is on the program's roster
    pub internal: Vec<LinkedWork>,

    /// Team-scoped links outside the program
    pub external: Vec<LinkedWork>,
}

/// Partition a milestone's links into internal and external
/// dependencies relative to `program`.
///
/// Only team-scoped targets participate; targets that no longer resolve
/// are skipped. No ordering guarantee on either partition - downstream
/// aggregation sorts explicitly.
pub fn classify<H: Host + ?Sized>(host: &H, milestone: &Milestone, program: &str) -> Partition {
    let mut partition = Partition::default();
    for &link in &milestone.links {
        let Ok(item) = host.item(link) else {
            // Target vanished since the link was made.
            continue;
        };
        let Some(team) = team_name(item.group()) else {
            continue;
        };
        let work = LinkedWork {
            id: link,
            team: team.to_string(),
            status: item.status(),
            closed: item.is_closed(),
            planned_sprint: item.planned_sprint().map(str::to_string),
        };
        if host.is_team_in_program(program, &work.team) {
            partition.internal.push(work);
        } else {
            partition.external.push(work);
        }
    }
    partition
}
