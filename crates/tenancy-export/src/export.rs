//! The `export` command.
//!
//! Discovers the resources of one compartment, narrows them with the filter
//! engine, and writes Terraform configuration (plus, optionally, state) to
//! the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tenancy_filter::{Filter, Predicate, PredicateSet};
use tracing::{debug, error, info, info_span};

use crate::args::ExportCommandArgs;
use crate::catalog::{resolve_services, ServiceExport};
use crate::discovery::{Discovery, DiscoveryError};
use crate::error::{ExportError, Result};
use crate::hcl::{render_provider, render_service_file, render_vars, ExportedResource, Labeler};
use crate::retry::retry_with_timeout;
use crate::state::TerraformState;

/// Name of the generated state file.
pub const STATE_FILE: &str = "terraform.tfstate";

/// Outcome of an export, used as the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// Every resource type was discovered.
    Success = 0,
    /// Every resource type failed.
    Fail = 1,
    /// Some resource types failed, the rest were exported.
    PartialSuccess = 64,
}

impl ExportStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A resource type that could not be discovered.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFailure {
    pub resource_type: String,
    pub error: DiscoveryError,
}

/// What an export produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub status: ExportStatus,
    /// The compartment that was exported.
    pub compartment_id: String,
    pub resources: Vec<ExportedResource>,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
    pub failures: Vec<ResourceFailure>,
}

/// Runs the `export` command.
///
/// Fatal problems (invalid arguments, unknown services, a missing
/// compartment, unwritable output) are errors. Resource types that cannot
/// be discovered within the retry timeout are not: they are listed in
/// [`ExportSummary::failures`] and reflected in the status.
pub fn run_export_command(
    args: &ExportCommandArgs,
    discovery: &dyn Discovery,
) -> Result<ExportSummary> {
    args.validate()?;

    let compartment_id = resolve_compartment(args, discovery)?;
    let services = resolve_services(&args.services, &args.exclude_services)?;
    let _span = info_span!("export", compartment = %compartment_id).entered();
    info!(
        services = services.len(),
        tf_version = %args.tf_version,
        "starting export"
    );

    let filter = narrowing_filter(&compartment_id, &args.ids)?;
    let mut labeler = Labeler::new();
    let mut resources = Vec::new();
    let mut failures = Vec::new();
    let mut by_service: Vec<(&ServiceExport, Vec<ExportedResource>)> = Vec::new();
    let mut listed = 0usize;

    for service in services {
        let mut exported = Vec::new();
        for resource_type in service.resource_types {
            let outcome = retry_with_timeout(args.retry_timeout, || {
                discovery.list(resource_type, &compartment_id)
            });
            let records = match outcome {
                Ok(records) => {
                    listed += 1;
                    records
                }
                Err(e) => {
                    error!(resource_type, error = %e, "discovery failed");
                    failures.push(ResourceFailure {
                        resource_type: resource_type.to_string(),
                        error: e,
                    });
                    continue;
                }
            };

            let retained = filter.filter_cloned(&records);
            debug!(
                resource_type,
                discovered = records.len(),
                exported = retained.len(),
                "discovered resources"
            );
            for record in retained {
                exported.push(ExportedResource {
                    resource_type: resource_type.to_string(),
                    label: labeler.label(resource_type, &record),
                    record,
                });
            }
        }
        if !exported.is_empty() {
            by_service.push((service, exported));
        }
    }

    let status = export_status(listed, failures.len());

    let mut files = Vec::new();
    if status != ExportStatus::Fail {
        fs::create_dir_all(&args.output_dir).map_err(|e| ExportError::io(&args.output_dir, e))?;

        for (service, exported) in &by_service {
            let path = args.output_dir.join(format!("{}.tf", service.name));
            write_file(&path, &render_service_file(exported, args.tf_version))?;
            files.push(path);
        }

        let path = args.output_dir.join("vars.tf");
        write_file(&path, &render_vars(&compartment_id, args.tf_version))?;
        files.push(path);

        let path = args.output_dir.join("provider.tf");
        write_file(&path, &render_provider(args.tf_version))?;
        files.push(path);
    }

    for (_, exported) in by_service {
        resources.extend(exported);
    }

    if args.generate_state && status != ExportStatus::Fail {
        let path = args.output_dir.join(STATE_FILE);
        TerraformState::from_resources(&resources).write_to(&path)?;
        files.push(path);
    }

    info!(
        resources = resources.len(),
        failures = failures.len(),
        ?status,
        "export finished"
    );

    Ok(ExportSummary {
        status,
        compartment_id,
        resources,
        files,
        failures,
    })
}

/// `Fail` only when every attempted resource type failed to list.
fn export_status(listed: usize, failed: usize) -> ExportStatus {
    match (listed, failed) {
        (_, 0) => ExportStatus::Success,
        (0, _) => ExportStatus::Fail,
        _ => ExportStatus::PartialSuccess,
    }
}

fn resolve_compartment(args: &ExportCommandArgs, discovery: &dyn Discovery) -> Result<String> {
    if let Some(id) = &args.compartment_id {
        return Ok(id.clone());
    }
    let Some(name) = &args.compartment_name else {
        return Ok(discovery.root_compartment_id().to_string());
    };

    retry_with_timeout(args.retry_timeout, || discovery.find_compartment(name))?
        .map(|compartment| compartment.id)
        .ok_or_else(|| ExportError::CompartmentNotFound(name.clone()))
}

/// Keeps resources of the target compartment and, when given, the listed
/// IDs.
fn narrowing_filter(compartment_id: &str, ids: &[String]) -> Result<Filter> {
    let mut predicates =
        PredicateSet::new().with(Predicate::new("compartment_id", [compartment_id]));
    if !ids.is_empty() {
        predicates.insert(Predicate::new("id", ids.iter().cloned()));
    }
    Ok(predicates.compile()?)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| ExportError::io(path, e))
}
