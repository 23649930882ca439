//! The dependency engine - classification, aggregation, write-back.

use teamdeps_core::{
    ChangeEvent, ItemId, Milestone, Program, WorkItem, EXTERNAL_DEPENDENCIES,
    INTERNAL_DEPENDENCIES,
};
use teamdeps_host::{Host, Result};
use tracing::{debug, error, info, warn};

use crate::classify::classify;
use crate::external::compute_external;
use crate::internal::compute_internal;

/// Configuration for the dependency engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Full-match pattern selecting monitored program names
    pub program_pattern: String,

    /// Monitor the non-matching programs instead
    pub inverted_match: bool,
}

/// Pending writes for one milestone. Computation fills it in full
/// before any host write is issued, so the color and text effects land
/// together or not at all.
#[derive(Debug, Default)]
struct WriteSet {
    raise_attention: bool,
    fields: Vec<(ItemId, &'static str, String)>,
}

/// The dependency annotation engine.
///
/// Owns its host handle and the set of monitored programs. All entry
/// points are synchronous and take `&mut self`; whoever drives the
/// engine serializes resyncs and change notifications by construction.
pub struct DependencyEngine<H: Host> {
    host: H,
    config: EngineConfig,
    programs: Vec<Program>,
    enabled: bool,
}

impl<H: Host> DependencyEngine<H> {
    /// Create an engine. It stays inert until `initialize` succeeds.
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            programs: Vec::new(),
            enabled: false,
        }
    }

    /// Discover monitored programs, then run the first full resync.
    ///
    /// Discovery failure, or discovering nothing, leaves the engine
    /// disabled: every later entry point becomes a no-op instead of
    /// taking the host down.
    pub fn initialize(&mut self) {
        self.enabled = false;
        let found = self
            .host
            .find_programs(&self.config.program_pattern, self.config.inverted_match);
        let programs = match found {
            Ok(programs) => programs,
            Err(err) => {
                warn!("program discovery failed, engine disabled: {err}");
                return;
            }
        };
        if programs.is_empty() {
            warn!(
                pattern = %self.config.program_pattern,
                "no programs matched, engine disabled"
            );
            return;
        }
        info!(count = programs.len(), "monitoring programs");
        self.programs = programs;
        self.enabled = true;
        self.on_full_resync();
    }

    /// Is the engine processing notifications?
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Programs the engine monitors. Empty until `initialize` succeeds.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// The host handle.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host handle, for the authoring side that produces change
    /// notifications.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Recompute every monitored milestone from scratch. No diffing
    /// against prior values; a failure in one milestone is logged and
    /// does not abort the rest.
    pub fn on_full_resync(&mut self) {
        if !self.enabled {
            return;
        }
        let programs = self.programs.clone();
        for program in &programs {
            let milestones = match self.host.milestones_of(&program.name) {
                Ok(milestones) => milestones,
                Err(err) => {
                    error!(program = %program.name, "skipping program: {err}");
                    continue;
                }
            };
            for id in milestones {
                if let Err(err) = self.process_milestone(id, &program.name) {
                    error!(milestone = %id, "milestone recomputation failed: {err}");
                }
            }
        }
    }

    /// React to a single change notification.
    ///
    /// A notification that does not resolve, or resolves to an item
    /// outside every monitored program's hierarchy, is dropped without
    /// touching anything. A leaf change refreshes the internal summary
    /// of the milestones the leaf sits under or is linked from; a
    /// milestone change recomputes that one milestone in full.
    pub fn on_change(&mut self, event: &ChangeEvent) {
        if !self.enabled {
            return;
        }
        let Ok(item) = self.host.item(event.item) else {
            debug!(item = %event.item, "change for unresolvable item ignored");
            return;
        };
        debug!(item = %event.item, kind = ?event.kind, "processing change");
        match item {
            WorkItem::Leaf(leaf) => self.on_leaf_change(leaf.id),
            WorkItem::Milestone(milestone) => {
                if !self.monitored(&milestone.group) {
                    return;
                }
                let program = milestone.group.clone();
                if let Err(err) = self.process_milestone(milestone.id, &program) {
                    error!(milestone = %milestone.id, "milestone recomputation failed: {err}");
                }
            }
        }
    }

    fn monitored(&self, group: &str) -> bool {
        self.programs.iter().any(|p| p.name == group)
    }

    fn on_leaf_change(&mut self, leaf: ItemId) {
        let mut affected = self.host.tagged_milestones(leaf);
        for id in self.host.linking_milestones(leaf) {
            if !affected.contains(&id) {
                affected.push(id);
            }
        }
        for id in affected {
            let Ok(WorkItem::Milestone(milestone)) = self.host.item(id) else {
                continue;
            };
            if !self.monitored(&milestone.group) {
                continue;
            }
            if let Err(err) = self.refresh_internal(&milestone) {
                error!(milestone = %id, "internal summary refresh failed: {err}");
            }
        }
    }

    /// Recompute the internal summary only (leaf-change granularity).
    fn refresh_internal(&mut self, milestone: &Milestone) -> Result<()> {
        let partition = classify(&self.host, milestone, &milestone.group);
        let value = compute_internal(&partition.internal);
        for &child in &milestone.children {
            self.host
                .set_custom_field(child, INTERNAL_DEPENDENCIES, &value)?;
        }
        Ok(())
    }

    /// Full recomputation of one milestone: classify, aggregate both
    /// summaries, then apply the whole write-set.
    fn process_milestone(&mut self, id: ItemId, program: &str) -> Result<()> {
        let WorkItem::Milestone(milestone) = self.host.item(id)? else {
            return Ok(());
        };
        let partition = classify(&self.host, &milestone, program);
        let internal = compute_internal(&partition.internal);
        let rollup = compute_external(&partition.external);

        let mut writes = WriteSet {
            raise_attention: rollup.has_external_dependency,
            fields: Vec::new(),
        };
        for &child in &milestone.children {
            writes
                .fields
                .push((child, INTERNAL_DEPENDENCIES, internal.clone()));
            if rollup.summary.is_empty() && self.surfaced_elsewhere(child, id) {
                // Another milestone still surfaces an external dependency
                // through this leaf; clearing here would erase it.
                continue;
            }
            writes
                .fields
                .push((child, EXTERNAL_DEPENDENCIES, rollup.summary.clone()));
        }
        self.apply(id, writes)
    }

    /// Does any other milestone the leaf is tagged to currently surface
    /// a non-empty external summary? Recomputed from live state; the
    /// stored field is cache and may itself be stale.
    fn surfaced_elsewhere(&self, leaf: ItemId, current: ItemId) -> bool {
        for other in self.host.tagged_milestones(leaf) {
            if other == current {
                continue;
            }
            let Ok(WorkItem::Milestone(milestone)) = self.host.item(other) else {
                continue;
            };
            let partition = classify(&self.host, &milestone, &milestone.group);
            if compute_external(&partition.external).has_external_dependency {
                return true;
            }
        }
        false
    }

    fn apply(&mut self, milestone: ItemId, writes: WriteSet) -> Result<()> {
        if writes.raise_attention {
            self.host.flag_attention(milestone)?;
        }
        for (item, field, value) in &writes.fields {
            self.host.set_custom_field(*item, field, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use teamdeps_core::{ChangeKind, Status};
    use teamdeps_host::{
        GroupSnapshot, ItemKind, ItemSnapshot, MemoryHost, Portfolio, RosterConfig, ALERT_COLOR,
    };

    struct Fixture {
        groups: Vec<GroupSnapshot>,
    }

    impl Fixture {
        fn new(names: &[&str]) -> Self {
            Self {
                groups: names
                    .iter()
                    .map(|name| GroupSnapshot {
                        name: name.to_string(),
                        items: Vec::new(),
                    })
                    .collect(),
            }
        }

        fn add(&mut self, group: &str, item: ItemSnapshot) -> ItemId {
            let id = item.id;
            self.groups
                .iter_mut()
                .find(|g| g.name == group)
                .expect("fixture group")
                .items
                .push(item);
            id
        }

        fn leaf(&mut self, group: &str, status: Status, sprint: Option<&str>) -> ItemId {
            self.add(
                group,
                ItemSnapshot {
                    id: ItemId::new(),
                    name: "work".to_string(),
                    kind: ItemKind::Leaf,
                    status,
                    completed: false,
                    planned_sprint: sprint.map(str::to_string),
                    links: Vec::new(),
                    children: Vec::new(),
                    fields: BTreeMap::new(),
                    color: None,
                },
            )
        }

        fn milestone(&mut self, group: &str, links: Vec<ItemId>, children: Vec<ItemId>) -> ItemId {
            self.add(
                group,
                ItemSnapshot {
                    id: ItemId::new(),
                    name: "milestone".to_string(),
                    kind: ItemKind::Milestone,
                    status: Status::NotDone,
                    completed: false,
                    planned_sprint: None,
                    links,
                    children,
                    fields: BTreeMap::new(),
                    color: None,
                },
            )
        }

        fn engine(
            self,
            pattern: &str,
            rosters: &[(&str, &[&str])],
        ) -> DependencyEngine<MemoryHost> {
            let mut programs = BTreeMap::new();
            for (program, teams) in rosters {
                programs.insert(
                    program.to_string(),
                    teams.iter().map(|t| t.to_string()).collect(),
                );
            }
            let config = RosterConfig {
                program_pattern: pattern.to_string(),
                inverted_match: false,
                programs,
            };
            let host = MemoryHost::new(Portfolio { groups: self.groups }, config);
            let mut engine = DependencyEngine::new(
                host,
                EngineConfig {
                    program_pattern: pattern.to_string(),
                    inverted_match: false,
                },
            );
            engine.initialize();
            engine
        }
    }

    struct Standard {
        engine: DependencyEngine<MemoryHost>,
        alpha_work: ItemId,
        zeta_work: ItemId,
        feature_a: ItemId,
        feature_b: ItemId,
        milestone: ItemId,
    }

    /// One monitored program with an internal dependency on Alpha and
    /// Bravo and an external one on Zeta.
    fn standard() -> Standard {
        let mut fix = Fixture::new(&["Apollo", "Team - Alpha", "Team - Bravo", "Team - Zeta"]);
        let alpha_work = fix.leaf("Team - Alpha", Status::InProgress, Some("S3"));
        let bravo_work = fix.leaf("Team - Bravo", Status::NotDone, Some("S1"));
        let zeta_work = fix.leaf("Team - Zeta", Status::Blocked, None);
        let feature_a = fix.leaf("Apollo", Status::NotDone, None);
        let feature_b = fix.leaf("Apollo", Status::NotDone, None);
        let milestone = fix.milestone(
            "Apollo",
            vec![alpha_work, bravo_work, zeta_work],
            vec![feature_a, feature_b],
        );
        let engine = fix.engine("Apollo", &[("Apollo", &["Alpha", "Bravo"])]);
        Standard {
            engine,
            alpha_work,
            zeta_work,
            feature_a,
            feature_b,
            milestone,
        }
    }

    fn field(engine: &DependencyEngine<MemoryHost>, id: ItemId, name: &str) -> Option<String> {
        engine.host().custom_field(id, name)
    }

    #[test]
    fn test_initialize_derives_both_summaries_for_every_child() {
        let s = standard();
        for feature in [s.feature_a, s.feature_b] {
            assert_eq!(
                field(&s.engine, feature, INTERNAL_DEPENDENCIES).as_deref(),
                Some("Bravo (S1) Alpha (S3)")
            );
            assert_eq!(
                field(&s.engine, feature, EXTERNAL_DEPENDENCIES).as_deref(),
                Some("Zeta (Blocked)")
            );
        }
        assert_eq!(s.engine.host().color(s.milestone), Some(ALERT_COLOR));
    }

    #[test]
    fn test_resync_is_idempotent() {
        let mut s = standard();
        let before = s.engine.host().to_portfolio();
        s.engine.on_full_resync();
        assert_eq!(s.engine.host().to_portfolio(), before);
    }

    #[test]
    fn test_unresolvable_change_is_ignored() {
        let mut s = standard();
        let before = s.engine.host().to_portfolio();
        s.engine
            .on_change(&ChangeEvent::new(ItemId::new(), ChangeKind::Status));
        assert_eq!(s.engine.host().to_portfolio(), before);
    }

    #[test]
    fn test_changes_outside_monitored_programs_write_nothing() {
        let mut fix = Fixture::new(&["Apollo", "Gemini", "Team - Alpha", "Team - Zeta"]);
        let alpha_work = fix.leaf("Team - Alpha", Status::InProgress, Some("S2"));
        let zeta_work = fix.leaf("Team - Zeta", Status::Blocked, None);
        let gemini_feature = fix.leaf("Gemini", Status::NotDone, None);
        let gemini_milestone =
            fix.milestone("Gemini", vec![alpha_work, zeta_work], vec![gemini_feature]);
        let mut engine = fix.engine(
            "Apollo",
            &[("Apollo", &["Alpha"]), ("Gemini", &["Alpha"])],
        );
        assert!(engine.enabled());

        let before = engine.host().to_portfolio();
        engine.on_change(&ChangeEvent::new(gemini_milestone, ChangeKind::Links));
        engine.on_change(&ChangeEvent::new(alpha_work, ChangeKind::Status));
        assert_eq!(engine.host().to_portfolio(), before);
        assert!(engine.host().color(gemini_milestone).is_none());
    }

    #[test]
    fn test_bad_pattern_disables_the_engine() {
        let mut fix = Fixture::new(&["Apollo", "Team - Zeta"]);
        let zeta_work = fix.leaf("Team - Zeta", Status::Blocked, None);
        let feature = fix.leaf("Apollo", Status::NotDone, None);
        let milestone = fix.milestone("Apollo", vec![zeta_work], vec![feature]);
        let mut engine = fix.engine("(", &[]);
        assert!(!engine.enabled());

        let before = engine.host().to_portfolio();
        engine.on_full_resync();
        engine.on_change(&ChangeEvent::new(milestone, ChangeKind::Links));
        assert_eq!(engine.host().to_portfolio(), before);
    }

    #[test]
    fn test_empty_discovery_disables_the_engine() {
        let fix = Fixture::new(&["Apollo"]);
        let engine = fix.engine("Artemis", &[]);
        assert!(!engine.enabled());
        assert!(engine.programs().is_empty());
    }

    #[test]
    fn test_leaf_change_refreshes_internal_summaries() {
        let mut s = standard();
        // Alpha closes out its item; only Bravo remains, which is below
        // the two-team threshold.
        s.engine
            .host_mut()
            .set_status(s.alpha_work, Status::Completed)
            .unwrap();
        s.engine
            .on_change(&ChangeEvent::new(s.alpha_work, ChangeKind::Status));
        assert_eq!(
            field(&s.engine, s.feature_a, INTERNAL_DEPENDENCIES).as_deref(),
            Some("")
        );
        assert_eq!(
            field(&s.engine, s.feature_b, INTERNAL_DEPENDENCIES).as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_leaf_change_leaves_external_summaries_to_milestone_events() {
        let mut s = standard();
        s.engine
            .host_mut()
            .set_status(s.zeta_work, Status::Completed)
            .unwrap();
        s.engine
            .on_change(&ChangeEvent::new(s.zeta_work, ChangeKind::Status));
        // Leaf granularity refreshes internal summaries only.
        assert_eq!(
            field(&s.engine, s.feature_a, EXTERNAL_DEPENDENCIES).as_deref(),
            Some("Zeta (Blocked)")
        );

        s.engine
            .on_change(&ChangeEvent::new(s.milestone, ChangeKind::Links));
        assert_eq!(
            field(&s.engine, s.feature_a, EXTERNAL_DEPENDENCIES).as_deref(),
            Some("Zeta (Completed)")
        );
    }

    #[test]
    fn test_suppression_preserves_a_summary_surfaced_elsewhere() {
        let mut fix = Fixture::new(&["Apollo", "Team - Zeta"]);
        let zeta_work = fix.leaf("Team - Zeta", Status::Blocked, None);
        let shared = fix.leaf("Apollo", Status::NotDone, None);
        let quiet = fix.milestone("Apollo", Vec::new(), vec![shared]);
        let loud = fix.milestone("Apollo", vec![zeta_work], vec![shared]);
        let mut engine = fix.engine("Apollo", &[("Apollo", &["Alpha"])]);

        // Whatever order the resync visited the two milestones in, the
        // quiet one must not have erased what the loud one surfaced.
        assert_eq!(
            field(&engine, shared, EXTERNAL_DEPENDENCIES).as_deref(),
            Some("Zeta (Blocked)")
        );
        engine.on_change(&ChangeEvent::new(quiet, ChangeKind::Links));
        assert_eq!(
            field(&engine, shared, EXTERNAL_DEPENDENCIES).as_deref(),
            Some("Zeta (Blocked)")
        );

        // Once no milestone surfaces anything, the field clears.
        engine.host_mut().unlink(loud, zeta_work).unwrap();
        engine.on_change(&ChangeEvent::new(loud, ChangeKind::Links));
        assert_eq!(
            field(&engine, shared, EXTERNAL_DEPENDENCIES).as_deref(),
            Some("")
        );
        engine.on_change(&ChangeEvent::new(quiet, ChangeKind::Links));
        assert_eq!(
            field(&engine, shared, EXTERNAL_DEPENDENCIES).as_deref(),
            Some("")
        );

        // The attention flag is set-only; emptiness does not repaint.
        assert_eq!(engine.host().color(loud), Some(ALERT_COLOR));
        assert!(engine.host().color(quiet).is_none());
    }
}
