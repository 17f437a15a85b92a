//! Command handlers.

pub mod config_cmd;
pub mod set;
pub mod status;

use tracing::debug;

use poectl_core::ControllerSession;

use crate::cli::GlobalOpts;
use crate::config::{self, Resolved};
use crate::error::CliError;

/// Resolve configuration and open an authenticated session.
async fn connect(global: &GlobalOpts) -> Result<(ControllerSession, Resolved), CliError> {
    let resolved = config::resolve(global)?;
    debug!(
        profile = %resolved.profile,
        url = %resolved.controller.url,
        site = %resolved.controller.site,
        "connecting"
    );

    let session = ControllerSession::connect(&resolved.controller)
        .await
        .map_err(|e| CliError::from(e).for_profile(&resolved.profile))?;
    Ok((session, resolved))
}
