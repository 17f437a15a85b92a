//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Replace plaintext secrets before anything is printed.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redact(config::load_config(&path)?);
            let active = config::active_profile_name(global, &cfg);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| Ok(toml::to_string_pretty(c)?),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            if global.output == OutputFormat::Table && !global.quiet {
                eprintln!("# {} (active profile: {active})", path.display());
            }
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
