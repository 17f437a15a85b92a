//! `poectl status`: read-only view of port PoE modes.

use serde::Serialize;
use tabled::Tabled;

use poectl_core::{MacAddress, PortSnapshot};

use crate::cli::{GlobalOpts, OutputFormat, StatusArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    index: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "PoE")]
    capable: &'static str,
    #[tabled(rename = "Mode")]
    mode: String,
}

fn row(p: &PortSnapshot) -> PortRow {
    PortRow {
        index: p.index,
        name: p.display_label(),
        capable: if p.poe_capable { "yes" } else { "no" },
        mode: if p.poe_capable {
            p.mode.to_string()
        } else {
            "-".into()
        },
    }
}

#[derive(Serialize)]
struct StatusView<'a> {
    device: &'a MacAddress,
    name: Option<&'a str>,
    model: Option<&'a str>,
    ports: &'a [PortSnapshot],
}

fn plain_line(p: &PortSnapshot) -> String {
    format!("{} {}", p.index, p.mode)
}

pub async fn handle(args: StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (session, _) = super::connect(global).await?;
    let snapshot = session.device_snapshot(&args.switch).await;
    session.disconnect().await;
    let snapshot = snapshot?;

    let ports: Vec<PortSnapshot> = match &args.ports {
        Some(filter) => snapshot
            .ports
            .iter()
            .filter(|p| filter.contains(p.index))
            .cloned()
            .collect(),
        None => snapshot.ports.clone(),
    };

    let view = StatusView {
        device: &snapshot.mac,
        name: snapshot.name.as_deref(),
        model: snapshot.model.as_deref(),
        ports: &ports,
    };

    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!(
            "{} ({})",
            snapshot.name.as_deref().unwrap_or("unnamed switch"),
            snapshot.mac
        );
    }

    let out = output::render_list(global.output, &view, &ports, row, plain_line)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
