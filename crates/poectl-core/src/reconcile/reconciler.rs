// ── Reconciliation controller ──
//
// Planning → [AwaitingConfirmation] → [Applying] → [Verifying] → Done,
// or → Aborted at the gate. Strictly sequential, single pass.

use chrono::Utc;
use strum::Display;
use tracing::{debug, info, warn};

use super::applicator::{self, ApplyOutcome};
use super::planner::{self, Plan, PlanClass, PlannedPort};
use super::report::{self, PortOutcome, PortReport, ReconciliationReport, RunStatus};
use super::verifier::{self, Verification, VerifyPolicy};
use super::{Confirm, PortModeWriter, PortStateReader, ReconcileRequest};
use crate::error::CoreError;
use crate::model::PoeMode;

/// Engine phase. Each run moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Planning,
    AwaitingConfirmation,
    Applying,
    Verifying,
    Done,
    Aborted,
}

/// Drives one device toward a desired PoE state.
///
/// Holds borrowed collaborators; a single `ControllerSession` usually
/// serves as both reader and writer.
pub struct Reconciler<'a, R, W> {
    reader: &'a R,
    writer: &'a W,
    policy: VerifyPolicy,
}

impl<'a, R, W> Reconciler<'a, R, W>
where
    R: PortStateReader,
    W: PortModeWriter,
{
    pub fn new(reader: &'a R, writer: &'a W) -> Self {
        Self {
            reader,
            writer,
            policy: VerifyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: VerifyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the full cycle for `request`.
    ///
    /// Only the initial state read can fail the run. Apply rejections and
    /// unconverged ports are reported per port.
    pub async fn run<C: Confirm>(
        &self,
        request: &ReconcileRequest,
        mut confirm: C,
    ) -> Result<ReconciliationReport, CoreError> {
        let device = &request.device;
        let mut phase = Phase::Planning;
        debug!(%device, %phase, "reconciliation started");

        let snapshot = match self.reader.fetch_port_states(device).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                if e.is_unreachable() {
                    warn!(%device, error = %e, "controller unreachable, nothing planned");
                } else {
                    warn!(%device, error = %e, "initial state read failed");
                }
                return Err(e);
            }
        };
        let plan = planner::plan(&snapshot.ports, &request.ports, request.desired);
        log_plan(&plan);

        let mut apply = ApplyOutcome::Skipped;
        let mut verification = Verification::default();

        if plan.change_set.is_empty() {
            transition(&mut phase, Phase::Done);
        } else {
            if !request.auto_confirm {
                transition(&mut phase, Phase::AwaitingConfirmation);
                if !confirm.confirm(&plan) {
                    transition(&mut phase, Phase::Aborted);
                    info!(%device, "reconciliation aborted at confirmation");
                }
            }

            if phase != Phase::Aborted {
                transition(&mut phase, Phase::Applying);
                apply = applicator::apply(self.writer, device, &plan.change_set).await;

                if apply.is_applied() {
                    transition(&mut phase, Phase::Verifying);
                    verification =
                        verifier::verify(self.reader, device, &plan.change_set, self.policy).await;
                }
                transition(&mut phase, Phase::Done);
            }
        }

        let status = if phase == Phase::Aborted {
            RunStatus::Aborted
        } else {
            RunStatus::Done
        };

        let ports: Vec<PortReport> = plan
            .ports
            .iter()
            .map(|p| port_report(p, plan.target, status, &apply, &verification))
            .collect();
        let overall_success = report::all_succeeded(&ports);

        let apply_error = match apply {
            ApplyOutcome::Rejected { reason } => Some(reason),
            ApplyOutcome::Skipped | ApplyOutcome::Applied => None,
        };

        Ok(ReconciliationReport {
            device: device.clone(),
            device_name: snapshot.name,
            desired: request.desired,
            status,
            ports,
            apply_error,
            verify_attempts: verification.attempts_used,
            overall_success,
            finished_at: Utc::now(),
        })
    }
}

fn transition(phase: &mut Phase, next: Phase) {
    debug!(from = %phase, to = %next, "phase transition");
    *phase = next;
}

fn log_plan(plan: &Plan) {
    for port in &plan.ports {
        match port.class {
            PlanClass::Unsupported => warn!(port = port.index, "port has no PoE capability"),
            PlanClass::NotFound => warn!(port = port.index, "port not found on device"),
            PlanClass::AlreadySatisfied | PlanClass::Change => {}
        }
    }
    info!(
        target_mode = %plan.target,
        changes = plan.change_set.len(),
        satisfied = plan.count(PlanClass::AlreadySatisfied),
        "plan computed"
    );
}

fn port_report(
    planned: &PlannedPort,
    target: PoeMode,
    status: RunStatus,
    apply: &ApplyOutcome,
    verification: &Verification,
) -> PortReport {
    let (outcome, after) = match planned.class {
        PlanClass::NotFound => (PortOutcome::NotFound, None),
        PlanClass::Unsupported => (PortOutcome::Unsupported, planned.current),
        PlanClass::AlreadySatisfied => (PortOutcome::AlreadySatisfied, planned.current),
        PlanClass::Change => match (status, apply) {
            (RunStatus::Aborted, _) => (PortOutcome::Planned, planned.current),
            (_, ApplyOutcome::Rejected { .. } | ApplyOutcome::Skipped) => {
                (PortOutcome::ApplyFailed, planned.current)
            }
            (_, ApplyOutcome::Applied) => {
                let observed = verification.observed.get(&planned.index).copied();
                if verification.is_verified(planned.index) {
                    (PortOutcome::ChangedAndVerified, observed)
                } else {
                    (PortOutcome::ChangedButUnverified, observed)
                }
            }
        },
    };

    PortReport {
        index: planned.index,
        label: planned.label.clone(),
        before: planned.current,
        target,
        after,
        outcome,
    }
}
