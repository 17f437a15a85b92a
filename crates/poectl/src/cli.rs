//! Clap derive structures for the `poectl` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use poectl_core::{DesiredState, MacAddress};

use crate::ports::PortList;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// poectl -- converge PoE state on UniFi switch ports
#[derive(Debug, Parser)]
#[command(
    name = "poectl",
    version,
    about = "Turn PoE on or off for UniFi switch ports, and verify it took",
    long_about = "Plans the minimal set of PoE mode changes for the requested ports,\n\
        applies them in one controller request, then re-reads the switch until\n\
        the ports report the new mode.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "POECTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "POECTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "POECTL_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Site name
    #[arg(long, short = 's', env = "POECTL_SITE", global = true)]
    pub site: Option<String>,

    /// Controller username
    #[arg(long, short = 'u', env = "POECTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password (prefer the keyring)
    #[arg(long, env = "POECTL_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "POECTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "POECTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "POECTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one port per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Drive ports to a PoE state and verify the result
    Set(SetArgs),

    /// Show the current PoE mode of switch ports
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SET / STATUS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Switch MAC address (aa:bb:cc:dd:ee:ff, aa-bb-..., aabb.ccdd.eeff)
    #[arg(value_name = "SWITCH_MAC")]
    pub switch: MacAddress,

    /// Port list, e.g. "1,3,5-8"
    #[arg(value_name = "PORTS")]
    pub ports: PortList,

    /// Desired PoE state (on|off)
    #[arg(long, value_name = "on|off")]
    pub state: DesiredState,

    /// Apply without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Verification re-reads after applying (overrides profile)
    #[arg(long, value_name = "N")]
    pub verify_attempts: Option<u32>,

    /// Seconds to wait before each verification re-read (overrides profile)
    #[arg(long, value_name = "SECS")]
    pub verify_delay: Option<u64>,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Switch MAC address
    #[arg(value_name = "SWITCH_MAC")]
    pub switch: MacAddress,

    /// Only show these ports, e.g. "1-8"
    #[arg(value_name = "PORTS")]
    pub ports: Option<PortList>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the loaded configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn set_parses_mac_ports_and_state() {
        let cli = Cli::try_parse_from([
            "poectl", "set", "AA-BB-CC-DD-EE-FF", "1,3-4", "--state", "off", "--yes",
        ])
        .map_err(|e| e.to_string());
        let args = match cli {
            Ok(Cli {
                command: Command::Set(args),
                ..
            }) => args,
            other => panic!("expected set command, got {other:?}"),
        };
        assert_eq!(args.switch.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(args.ports.into_vec(), vec![1, 3, 4]);
        assert_eq!(args.state, DesiredState::Disable);
        assert!(args.yes);
    }

    #[test]
    fn set_rejects_bad_state() {
        let res = Cli::try_parse_from([
            "poectl", "set", "aa:bb:cc:dd:ee:ff", "1", "--state", "sideways",
        ]);
        assert!(res.is_err());
    }
}
