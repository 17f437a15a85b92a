//! PoE reconciliation engine between `poectl-api` and the `poectl` CLI.
//!
//! This crate owns the domain model and the plan → apply → verify cycle
//! that drives switch ports toward a requested PoE state:
//!
//! - **[`ControllerSession`]** — An authenticated legacy-API session.
//!   Implements both collaborator traits ([`PortStateReader`] and
//!   [`PortModeWriter`]) and is passed explicitly into the engine.
//!
//! - **[`Reconciler`]** — Single-pass state machine: plan the minimal
//!   [`ChangeSet`], gate it behind an injected [`Confirm`] decision, apply
//!   it as one batched request, then verify convergence with a bounded
//!   [`VerifyPolicy`].
//!
//! - **[`ReconciliationReport`]** — Per-port [`PortOutcome`] in the
//!   caller's requested order, plus an overall success flag.
//!
//! - **Domain model** ([`model`]) — [`MacAddress`], the closed [`PoeMode`]
//!   enum, [`DesiredState`], and port/device snapshots converted from the
//!   raw API types in [`convert`].

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, TlsVerification};
pub use error::CoreError;
pub use reconcile::{
    ChangeSet, Confirm, Phase, Plan, PlanClass, PlannedPort, PortModeWriter, PortOutcome,
    PortReport, PortStateReader, ReconcileRequest, ReconciliationReport, Reconciler, RunStatus,
    VerifyPolicy,
};
pub use session::ControllerSession;

pub use model::{DesiredState, DeviceSnapshot, MacAddress, PoeMode, PortSnapshot};
