//! Binary entry point for the tenancy exporter.
//!
//! ## Usage
//!
//! ```bash
//! # List the services and resource types that can be exported
//! tenancy-export --command list_export_resources
//!
//! # Export the networking of one compartment in 0.11 syntax, with state
//! tenancy-export --command export --snapshot tenancy.json \
//!     --compartment_name dev --services core --output_path ./dev \
//!     --tf_version 0.11 --generate_state
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::info;

use tenancy_export::{
    list_export_resources, run_export_command, Cli, Command, ExportStatus, LogLevel,
    SnapshotDiscovery,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);
    eprintln!(
        "{}",
        style(format!("tenancy-export {}", env!("CARGO_PKG_VERSION"))).dim()
    );

    match execute(&cli) {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("{}", style(format!("[ERROR]: {err:#}")).red());
            ExitCode::from(ExportStatus::Fail.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the selected command.
fn execute(cli: &Cli) -> anyhow::Result<ExportStatus> {
    match cli.command()? {
        Command::ListExportResources => {
            list_export_resources(&mut io::stdout().lock())
                .context("failed to list exportable resources")?;
            Ok(ExportStatus::Success)
        }
        Command::Export => {
            let args = cli.export_args()?;
            let snapshot = cli
                .snapshot
                .as_ref()
                .context("--snapshot is required for the export command")?;
            let discovery = SnapshotDiscovery::load(snapshot)?;

            let summary = run_export_command(&args, &discovery)?;
            for failure in &summary.failures {
                eprintln!(
                    "{}",
                    style(format!(
                        "failed to export {}: {}",
                        failure.resource_type, failure.error
                    ))
                    .red()
                );
            }
            info!(
                resources = summary.resources.len(),
                files = summary.files.len(),
                "export complete"
            );
            println!(
                "Exported {} resources from {} to {}",
                summary.resources.len(),
                summary.compartment_id,
                args.output_dir.display()
            );
            Ok(summary.status)
        }
    }
}
