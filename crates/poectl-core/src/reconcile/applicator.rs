// ── Change applicator ──

use tracing::{info, warn};

use super::PortModeWriter;
use super::planner::ChangeSet;
use crate::model::MacAddress;

/// Result of the apply phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Empty change set; nothing was sent.
    Skipped,
    Applied,
    /// The write collaborator refused the batch. Nothing is assumed applied.
    Rejected { reason: String },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Submit every change in one call to the writer.
pub async fn apply<W: PortModeWriter>(
    writer: &W,
    device: &MacAddress,
    changes: &ChangeSet,
) -> ApplyOutcome {
    if changes.is_empty() {
        return ApplyOutcome::Skipped;
    }

    match writer.apply_port_modes(device, changes).await {
        Ok(()) => {
            info!(%device, ports = changes.len(), "port mode changes applied");
            ApplyOutcome::Applied
        }
        Err(e) => {
            warn!(%device, error = %e, "controller rejected port mode changes");
            ApplyOutcome::Rejected {
                reason: e.to_string(),
            }
        }
    }
}
