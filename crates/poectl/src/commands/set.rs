//! `poectl set`: plan, confirm, apply and verify a PoE state change.

use std::io::{self, IsTerminal};
use std::time::Duration;

use owo_colors::OwoColorize;
use tabled::Tabled;
use tracing::warn;

use poectl_core::{
    Plan, PlanClass, PoeMode, PortOutcome, PortReport, ReconcileRequest, ReconciliationReport,
    Reconciler, RunStatus, VerifyPolicy,
};

use crate::cli::{GlobalOpts, OutputFormat, SetArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Port")]
    index: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Before")]
    before: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "After")]
    after: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

fn mode_cell(mode: Option<PoeMode>) -> String {
    mode.map_or_else(|| "-".into(), |m| m.to_string())
}

fn row(p: &PortReport) -> OutcomeRow {
    OutcomeRow {
        index: p.index,
        name: p.label.clone().unwrap_or_default(),
        before: mode_cell(p.before),
        target: p.target.to_string(),
        after: mode_cell(p.after),
        outcome: p.outcome.to_string(),
    }
}

fn plain_line(p: &PortReport) -> String {
    format!("{} {}", p.index, p.outcome)
}

// ── Plan / summary text ─────────────────────────────────────────────

fn describe_plan(plan: &Plan, color: bool) -> String {
    let mut lines = vec![format!(
        "Planned changes ({}, target mode {}):",
        plan.desired, plan.target
    )];
    for port in plan.changes() {
        let name = port
            .label
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        let from = mode_cell(port.current);
        let line = format!("  port {}{name}: {from} → {}", port.index, plan.target);
        lines.push(if color { line.yellow().to_string() } else { line });
    }
    for (class, label) in [
        (PlanClass::AlreadySatisfied, "already satisfied"),
        (PlanClass::Unsupported, "without PoE, skipped"),
        (PlanClass::NotFound, "not found, skipped"),
    ] {
        let n = plan.count(class);
        if n > 0 {
            lines.push(format!("  {n} port(s) {label}"));
        }
    }
    lines.join("\n")
}

fn summary(report: &ReconciliationReport, color: bool) -> String {
    let mut parts = Vec::new();
    for outcome in [
        PortOutcome::ChangedAndVerified,
        PortOutcome::AlreadySatisfied,
        PortOutcome::ChangedButUnverified,
        PortOutcome::ApplyFailed,
        PortOutcome::Unsupported,
        PortOutcome::NotFound,
        PortOutcome::Planned,
    ] {
        let n = report.count(outcome);
        if n > 0 {
            parts.push(format!("{n} {}", output::outcome_label(outcome, color)));
        }
    }

    let device = report
        .device_name
        .as_ref()
        .map_or_else(|| report.device.to_string(), |n| format!("{n} ({})", report.device));
    let mut text = format!("{device}: {}", parts.join(", "));
    if let Some(ref reason) = report.apply_error {
        text.push_str(&format!("\napply failed: {reason}"));
    }
    text
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (session, resolved) = super::connect(global).await?;

    let policy = VerifyPolicy::new(
        args.verify_attempts.unwrap_or(resolved.controller.verify.attempts),
        args.verify_delay
            .map_or(resolved.controller.verify.delay, Duration::from_secs),
    );
    let request = ReconcileRequest {
        device: args.switch,
        ports: args.ports.into_vec(),
        desired: args.state,
        auto_confirm: args.yes,
    };

    let color = output::should_color(global.color);
    let interactive = io::stdin().is_terminal();
    let mut needed_prompt = false;

    let confirm = |plan: &Plan| -> bool {
        if !interactive {
            needed_prompt = true;
            return false;
        }
        eprintln!("{}", describe_plan(plan, color));
        dialoguer::Confirm::new()
            .with_prompt(format!(
                "Apply {} change(s) to {}?",
                plan.change_set.len(),
                request.device
            ))
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "confirmation prompt failed");
                false
            })
    };

    let result = Reconciler::new(&session, &session)
        .with_policy(policy)
        .run(&request, confirm)
        .await;
    session.disconnect().await;
    let report = result?;

    let out = output::render_list(global.output, &report, &report.ports, row, plain_line)?;
    output::print_output(&out, global.quiet);
    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!("{}", summary(&report, color));
    }

    if needed_prompt {
        return Err(CliError::NonInteractiveRequiresYes {
            device: request.device.to_string(),
        });
    }

    match report.status {
        RunStatus::Aborted => Err(CliError::Cancelled),
        RunStatus::Done if report.overall_success => Ok(()),
        RunStatus::Done => Err(CliError::Incomplete {
            unsettled: report
                .ports
                .iter()
                .filter(|p| !p.outcome.is_success())
                .count(),
            total: report.ports.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poectl_core::{DesiredState, PortSnapshot, reconcile::planner};

    #[test]
    fn plan_description_lists_changes_and_skips() {
        let ports = vec![
            PortSnapshot::new(1, PoeMode::Auto, true).with_label("Camera"),
            PortSnapshot::new(2, PoeMode::Off, true),
            PortSnapshot::new(3, PoeMode::Off, false),
        ];
        let plan = planner::plan(&ports, &[1, 2, 3, 40], DesiredState::Disable);
        let text = describe_plan(&plan, false);

        assert!(text.contains("port 1 (Camera): auto → off"), "{text}");
        assert!(text.contains("1 port(s) already satisfied"));
        assert!(text.contains("1 port(s) without PoE"));
        assert!(text.contains("1 port(s) not found"));
        assert!(!text.contains("port 2:"));
    }
}
