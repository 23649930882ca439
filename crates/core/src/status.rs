//! Completion statuses and the status aggregation rule.

use serde::{Deserialize, Serialize};

/// Completion state of a work item, as reported by the host.
///
/// An item that aggregates from its own children reports the rollup of
/// those children here; the engine treats the value as opaque either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No status has been assigned
    #[default]
    NoStatus,
    /// Work has not started
    NotDone,
    /// Work is underway
    InProgress,
    /// Work is finished
    Completed,
    /// Work cannot proceed
    Blocked,
}

/// Aggregated completion label for a group of statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupStatus {
    /// Nothing in the group has made progress, or the group is empty
    NotDone,
    /// At least one member is blocked
    Blocked,
    /// Every member is completed
    Completed,
    /// Mixed progress
    InProgress,
}

impl RollupStatus {
    /// Reduce a group of statuses to a single label.
    ///
    /// Blocked dominates; then unanimous Completed; then unanimous
    /// NotDone/NoStatus; anything mixed is In progress. An empty group
    /// counts as Not done. This is the only aggregation rule in
    /// teamdeps; every summary value goes through it.
    pub fn aggregate<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        let statuses: Vec<Status> = statuses.into_iter().collect();
        if statuses.is_empty() {
            return RollupStatus::NotDone;
        }
        if statuses.iter().any(|s| *s == Status::Blocked) {
            return RollupStatus::Blocked;
        }
        if statuses.iter().all(|s| *s == Status::Completed) {
            return RollupStatus::Completed;
        }
        if statuses
            .iter()
            .all(|s| matches!(s, Status::NotDone | Status::NoStatus))
        {
            return RollupStatus::NotDone;
        }
        RollupStatus::InProgress
    }

    /// Display label used in summary tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            RollupStatus::NotDone => "Not done",
            RollupStatus::Blocked => "Blocked",
            RollupStatus::Completed => "Completed",
            RollupStatus::InProgress => "In progress",
        }
    }
}

impl std::fmt::Display for RollupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_is_not_done() {
        assert_eq!(RollupStatus::aggregate([]), RollupStatus::NotDone);
    }

    #[test]
    fn test_blocked_dominates() {
        assert_eq!(
            RollupStatus::aggregate([Status::Blocked, Status::Completed]),
            RollupStatus::Blocked
        );
        assert_eq!(
            RollupStatus::aggregate([Status::InProgress, Status::Blocked, Status::NotDone]),
            RollupStatus::Blocked
        );
    }

    #[test]
    fn test_unanimous_completed() {
        assert_eq!(
            RollupStatus::aggregate([Status::Completed, Status::Completed]),
            RollupStatus::Completed
        );
    }

    #[test]
    fn test_unstarted_mix_is_not_done() {
        assert_eq!(
            RollupStatus::aggregate([Status::NotDone, Status::NoStatus]),
            RollupStatus::NotDone
        );
    }

    #[test]
    fn test_partial_completion_is_in_progress() {
        assert_eq!(
            RollupStatus::aggregate([Status::NotDone, Status::Completed]),
            RollupStatus::InProgress
        );
        assert_eq!(
            RollupStatus::aggregate([Status::InProgress]),
            RollupStatus::InProgress
        );
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(RollupStatus::NotDone.to_string(), "Not done");
        assert_eq!(RollupStatus::Blocked.to_string(), "Blocked");
        assert_eq!(RollupStatus::Completed.to_string(), "Completed");
        assert_eq!(RollupStatus::InProgress.to_string(), "In progress");
    }
}
