//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one line per item.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use poectl_core::PortOutcome;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Outcome label, colored by severity when enabled.
pub fn outcome_label(outcome: PortOutcome, color: bool) -> String {
    let label = outcome.to_string();
    if !color {
        return label;
    }
    match outcome {
        PortOutcome::AlreadySatisfied | PortOutcome::ChangedAndVerified => {
            label.green().to_string()
        }
        PortOutcome::ChangedButUnverified | PortOutcome::Planned => label.yellow().to_string(),
        PortOutcome::Unsupported | PortOutcome::NotFound => label.dimmed().to_string(),
        PortOutcome::ApplyFailed => label.red().bold().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items in the chosen format.
///
/// `table` builds rows with `to_row`; `plain` emits `line_fn` per item;
/// structured formats serialize `data` as a whole.
pub fn render_list<T, D, R>(
    format: OutputFormat,
    data: &D,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    D: serde::Serialize + ?Sized,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(items.iter().map(line_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item; `table` and `plain` use pre-formatted text.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> Result<String, CliError>,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        port: u32,
        mode: &'static str,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                port: 1,
                mode: "auto",
            },
            Row {
                port: 2,
                mode: "off",
            },
        ]
    }

    fn render(format: OutputFormat) -> String {
        let items = rows();
        render_list(
            format,
            &items,
            &items,
            |r| Row {
                port: r.port,
                mode: r.mode,
            },
            |r| format!("{} {}", r.port, r.mode),
        )
        .unwrap()
    }

    #[test]
    fn formats_render() {
        assert!(render(OutputFormat::Table).contains("auto"));
        assert_eq!(render(OutputFormat::Plain), "1 auto\n2 off");
        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"port":1,"mode":"auto"},{"port":2,"mode":"off"}]"#
        );
        assert!(render(OutputFormat::Yaml).contains("mode: auto"));
    }

    #[test]
    fn uncolored_outcome_is_plain_text() {
        assert_eq!(
            outcome_label(PortOutcome::ApplyFailed, false),
            "apply-failed"
        );
        assert_ne!(
            outcome_label(PortOutcome::ApplyFailed, true),
            "apply-failed"
        );
    }
}
