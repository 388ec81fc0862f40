//! Export a live cloud tenancy as Terraform configuration.
//!
//! The exporter walks one compartment of a tenancy, keeps the resources the
//! caller asked for, and writes:
//!
//! - one `<service>.tf` per service with exported resources
//! - `vars.tf` and `provider.tf`
//! - optionally `terraform.tfstate`, so the configuration starts out in sync
//!
//! Resources are read through the [`Discovery`] trait and narrowed with the
//! [`tenancy_filter`] engine.
//!
//! # Example
//!
//! ```no_run
//! use tenancy_export::{run_export_command, ExportCommandArgs, SnapshotDiscovery, TfVersion};
//!
//! let discovery = SnapshotDiscovery::load("tenancy.json")?;
//! let mut args = ExportCommandArgs::new("out");
//! args.services = vec!["core".to_string()];
//! args.tf_version = TfVersion::V0_11;
//!
//! let summary = run_export_command(&args, &discovery)?;
//! println!("exported {} resources", summary.resources.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod args;
pub mod catalog;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod export;
pub mod hcl;
pub mod retry;
pub mod state;

pub use args::{parse_duration, ExportCommandArgs, TfVersion};
pub use catalog::{list_export_resources, resolve_services, ServiceExport, CATALOG};
pub use cli::{Cli, Command, LogLevel};
pub use discovery::{Compartment, Discovery, DiscoveryError, Snapshot, SnapshotDiscovery};
pub use error::{ExportError, Result};
pub use export::{run_export_command, ExportStatus, ExportSummary, ResourceFailure};
pub use hcl::{render_resource, render_service_file, ExportedResource};
pub use retry::{retry_with_timeout, Backoff};
pub use state::TerraformState;
