// ── Reconciliation engine ──
//
// Plan → confirm → apply → verify, one pass per invocation. The engine
// talks to the controller only through the two collaborator traits below,
// so tests drive it with in-memory fakes and the CLI drives it with a
// `ControllerSession`.

use std::future::Future;

use crate::error::CoreError;
use crate::model::{DesiredState, DeviceSnapshot, MacAddress};

pub mod applicator;
pub mod planner;
pub mod reconciler;
pub mod report;
pub mod verifier;

pub use applicator::ApplyOutcome;
pub use planner::{ChangeSet, Plan, PlanClass, PlannedPort};
pub use reconciler::{Phase, Reconciler};
pub use report::{PortOutcome, PortReport, ReconciliationReport, RunStatus};
pub use verifier::{Verification, VerifyPolicy};

/// Reads the current port state of a device.
///
/// Errors are run-level failures (unreachable controller, rejected
/// session, unknown device); the engine never retries them except
/// during verification.
pub trait PortStateReader {
    fn fetch_port_states(
        &self,
        device: &MacAddress,
    ) -> impl Future<Output = Result<DeviceSnapshot, CoreError>> + Send;
}

/// Applies a batch of PoE mode changes to a device in one call.
///
/// Atomic at this boundary: an `Err` means none of the changes can be
/// assumed applied. The error's message is reported as the rejection reason.
pub trait PortModeWriter {
    fn apply_port_modes(
        &self,
        device: &MacAddress,
        changes: &ChangeSet,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Decides whether a planned change set may be applied.
pub trait Confirm {
    fn confirm(&mut self, plan: &Plan) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Plan) -> bool,
{
    fn confirm(&mut self, plan: &Plan) -> bool {
        self(plan)
    }
}

/// Input for one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub device: MacAddress,
    /// Requested port indices, in the order the report should use.
    pub ports: Vec<u32>,
    pub desired: DesiredState,
    /// Skip the confirmation gate.
    pub auto_confirm: bool,
}
