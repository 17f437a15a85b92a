// ── Diff planner ──
//
// Pure: compares current port modes against the target mode and decides
// what has to change. No I/O, no logging side effects beyond tracing.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::model::{DesiredState, PoeMode, PortSnapshot};

/// Port index → mode for every port that must change.
///
/// Only the planner inserts entries, so every entry is a PoE-capable port
/// whose current mode differs from the mode stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeMap<u32, PoeMode>);

impl ChangeSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<PoeMode> {
        self.0.get(&index).copied()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.contains_key(&index)
    }

    /// Entries in ascending port order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, PoeMode)> + '_ {
        self.0.iter().map(|(&i, &m)| (i, m))
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }
}

/// How the planner classified one requested port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanClass {
    /// Not in the device's port list.
    NotFound,
    /// Port cannot source power; left untouched.
    Unsupported,
    AlreadySatisfied,
    /// Pending change, present in the change set.
    Change,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPort {
    pub index: u32,
    pub label: Option<String>,
    /// `None` when the port was not found.
    pub current: Option<PoeMode>,
    pub class: PlanClass,
}

/// Planner output: per-port classification in request order plus the
/// change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub desired: DesiredState,
    pub target: PoeMode,
    pub ports: Vec<PlannedPort>,
    pub change_set: ChangeSet,
}

impl Plan {
    /// Requested ports that will change, in request order.
    pub fn changes(&self) -> impl Iterator<Item = &PlannedPort> {
        self.ports.iter().filter(|p| p.class == PlanClass::Change)
    }

    pub fn count(&self, class: PlanClass) -> usize {
        self.ports.iter().filter(|p| p.class == class).count()
    }
}

/// Classify every requested port and build the minimal change set.
///
/// Duplicate indices in `requested` are planned once, at their first
/// position.
pub fn plan(ports: &[PortSnapshot], requested: &[u32], desired: DesiredState) -> Plan {
    let target = desired.target_mode();
    let mut seen = HashSet::with_capacity(requested.len());
    let mut planned = Vec::with_capacity(requested.len());
    let mut changes = BTreeMap::new();

    for &index in requested {
        if !seen.insert(index) {
            debug!(port = index, "duplicate port in request, planned once");
            continue;
        }

        let Some(port) = ports.iter().find(|p| p.index == index) else {
            planned.push(PlannedPort {
                index,
                label: None,
                current: None,
                class: PlanClass::NotFound,
            });
            continue;
        };

        let class = if !port.poe_capable {
            PlanClass::Unsupported
        } else if port.mode == target {
            PlanClass::AlreadySatisfied
        } else {
            changes.insert(index, target);
            PlanClass::Change
        };

        planned.push(PlannedPort {
            index,
            label: port.label.clone(),
            current: Some(port.mode),
            class,
        });
    }

    Plan {
        desired,
        target,
        ports: planned,
        change_set: ChangeSet(changes),
    }
}
