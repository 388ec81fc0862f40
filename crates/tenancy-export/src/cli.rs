//! Command-line interface.
//!
//! Flag names keep the underscore spelling users of the exporter already
//! script against (`--compartment_id`, `--tf_version`, ...).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::args::{parse_duration, split_list, ExportCommandArgs};
use crate::error::{ExportError, Result};

/// Export a cloud tenancy as Terraform configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "tenancy-export", version, about = "Export a cloud tenancy as Terraform configuration")]
pub struct Cli {
    /// Command to run. Supported commands: 'export' and 'list_export_resources'.
    #[arg(long)]
    pub command: Option<String>,

    /// OCID of the compartment to export. Without a compartment id
    /// or name, the root compartment is exported.
    #[arg(long = "compartment_id")]
    pub compartment_id: Option<String>,

    /// Name of the compartment to export.
    #[arg(long = "compartment_name")]
    pub compartment_name: Option<String>,

    /// Directory receiving the generated configuration and state.
    #[arg(long = "output_path")]
    pub output_path: Option<PathBuf>,

    /// Comma-separated list of services to export. By default,
    /// every service is exported.
    #[arg(long)]
    pub services: Option<String>,

    /// Comma-separated list of services to leave out. A service
    /// present in both 'services' and 'exclude_services' is excluded.
    #[arg(long = "exclude_services")]
    pub exclude_services: Option<String>,

    /// Comma-separated list of resource IDs to export. By default,
    /// every resource is exported.
    #[arg(long)]
    pub ids: Option<String>,

    /// Also write a state file for the discovered resources.
    #[arg(long = "generate_state")]
    pub generate_state: bool,

    /// Terraform syntax version of the generated configuration: 0.11 or
    /// 0.12. The state file is always written for 0.12.
    #[arg(long = "tf_version", default_value = "0.12")]
    pub tf_version: String,

    /// How long API calls keep retrying on retryable errors.
    #[arg(long = "retry_timeout", default_value = "15s")]
    pub retry_timeout: String,

    /// Tenancy snapshot (JSON) to discover resources from.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Log level for tracing output. RUST_LOG takes precedence.
    #[arg(long = "log_level", value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Commands selectable with `--command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Export,
    ListExportResources,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

impl Cli {
    /// The selected command.
    pub fn command(&self) -> Result<Command> {
        match self.command.as_deref() {
            None | Some("") => Err(ExportError::MissingCommand),
            Some("export") => Ok(Command::Export),
            Some("list_export_resources") => Ok(Command::ListExportResources),
            Some(other) => Err(ExportError::UnknownCommand(other.to_string())),
        }
    }

    /// Builds and validates the `export` arguments.
    pub fn export_args(&self) -> Result<ExportCommandArgs> {
        let args = ExportCommandArgs {
            compartment_id: non_empty(self.compartment_id.as_deref()),
            compartment_name: non_empty(self.compartment_name.as_deref()),
            output_dir: self.output_path.clone().unwrap_or_default(),
            services: self.services.as_deref().map(split_list).unwrap_or_default(),
            exclude_services: self
                .exclude_services
                .as_deref()
                .map(split_list)
                .unwrap_or_default(),
            ids: self.ids.as_deref().map(split_list).unwrap_or_default(),
            generate_state: self.generate_state,
            tf_version: self.tf_version.parse()?,
            retry_timeout: parse_duration(&self.retry_timeout)?,
        };
        args.validate()?;
        Ok(args)
    }
}
