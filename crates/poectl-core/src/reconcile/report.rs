// ── Reconciliation report ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;

use crate::model::{DesiredState, MacAddress, PoeMode};

/// Final state of one requested port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PortOutcome {
    AlreadySatisfied,
    ChangedAndVerified,
    /// Applied, but re-reads never showed the target mode.
    ChangedButUnverified,
    Unsupported,
    ApplyFailed,
    NotFound,
    /// Change planned but the run was aborted before applying.
    Planned,
}

impl PortOutcome {
    /// Port ended in the requested state.
    pub fn is_success(self) -> bool {
        matches!(self, Self::AlreadySatisfied | Self::ChangedAndVerified)
    }
}

/// Terminal phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Done,
    /// Stopped at the confirmation gate; nothing was applied.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortReport {
    pub index: u32,
    pub label: Option<String>,
    /// Mode at planning time. `None` for ports that were not found.
    pub before: Option<PoeMode>,
    pub target: PoeMode,
    /// Last known mode at the end of the run.
    pub after: Option<PoeMode>,
    pub outcome: PortOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub device: MacAddress,
    pub device_name: Option<String>,
    pub desired: DesiredState,
    pub status: RunStatus,
    /// One entry per requested port, in request order.
    pub ports: Vec<PortReport>,
    /// Rejection reason when the apply phase failed.
    pub apply_error: Option<String>,
    /// Verification reads performed (0 when verification did not run).
    pub verify_attempts: u32,
    /// True iff every requested port is already satisfied or changed and verified.
    pub overall_success: bool,
    pub finished_at: DateTime<Utc>,
}

impl ReconciliationReport {
    pub fn port(&self, index: u32) -> Option<&PortReport> {
        self.ports.iter().find(|p| p.index == index)
    }

    pub fn count(&self, outcome: PortOutcome) -> usize {
        self.ports.iter().filter(|p| p.outcome == outcome).count()
    }
}

pub(crate) fn all_succeeded(ports: &[PortReport]) -> bool {
    ports.iter().all(|p| p.outcome.is_success())
}
