// ── Convergence verifier ──
//
// Re-reads device state after an apply and checks each changed port
// against its target mode. Bounded: `attempts` reads, each preceded by
// `delay`. Read failures spend an attempt and are otherwise ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::PortStateReader;
use super::planner::ChangeSet;
use crate::model::{MacAddress, PoeMode};

/// How hard to look for convergence after applying changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyPolicy {
    /// Number of re-reads. Never zero.
    pub attempts: u32,
    /// Wait before each re-read.
    pub delay: Duration,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl VerifyPolicy {
    /// Policy with at least one attempt.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// What the verifier saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Ports that reached their target mode.
    pub verified: BTreeSet<u32>,
    /// Last mode observed per changed port. Absent when no read saw it.
    pub observed: BTreeMap<u32, PoeMode>,
    /// Reads actually attempted, successful or not.
    pub attempts_used: u32,
}

impl Verification {
    pub fn is_verified(&self, index: u32) -> bool {
        self.verified.contains(&index)
    }
}

pub async fn verify<R: PortStateReader>(
    reader: &R,
    device: &MacAddress,
    changes: &ChangeSet,
    policy: VerifyPolicy,
) -> Verification {
    let mut result = Verification::default();
    let mut pending: BTreeSet<u32> = changes.indices().collect();
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        tokio::time::sleep(policy.delay).await;
        result.attempts_used = attempt;

        let snapshot = match reader.fetch_port_states(device).await {
            Ok(s) => s,
            Err(e) if e.is_auth_failure() => {
                warn!(%device, attempt, error = %e, "session rejected, verification stopped");
                break;
            }
            Err(e) => {
                warn!(%device, attempt, error = %e, "verification re-read failed");
                continue;
            }
        };

        pending.retain(|&index| {
            let Some(port) = snapshot.port(index) else {
                debug!(port = index, attempt, "changed port missing from re-read");
                return true;
            };
            result.observed.insert(index, port.mode);
            if changes.get(index) == Some(port.mode) {
                result.verified.insert(index);
                false
            } else {
                true
            }
        });

        debug!(attempt, pending = pending.len(), "verification pass complete");
        if pending.is_empty() {
            break;
        }
    }

    if pending.is_empty() {
        info!(%device, ports = result.verified.len(), "all changes verified");
    } else {
        warn!(
            %device,
            unverified = ?pending,
            attempts = result.attempts_used,
            "ports did not converge"
        );
    }

    result
}
