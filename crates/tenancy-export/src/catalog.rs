//! Catalog of exportable services and their resource types.

use std::io::{self, Write};

use console::style;

use crate::error::{ExportError, Result};

/// A service and the compartment-scoped resource types exported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceExport {
    /// Service name as accepted by `--services`.
    pub name: &'static str,
    /// Terraform resource types, in dependency order.
    pub resource_types: &'static [&'static str],
}

/// Every service the exporter knows about.
pub static CATALOG: &[ServiceExport] = &[
    ServiceExport {
        name: "core",
        resource_types: &[
            "oci_core_vcn",
            "oci_core_internet_gateway",
            "oci_core_nat_gateway",
            "oci_core_route_table",
            "oci_core_security_list",
            "oci_core_network_security_group",
            "oci_core_subnet",
            "oci_core_instance",
            "oci_core_volume",
        ],
    },
    ServiceExport {
        name: "identity",
        resource_types: &["oci_identity_policy", "oci_identity_tag_namespace"],
    },
    ServiceExport {
        name: "object_storage",
        resource_types: &["oci_objectstorage_bucket"],
    },
    ServiceExport {
        name: "database",
        resource_types: &[
            "oci_database_autonomous_database",
            "oci_database_db_system",
        ],
    },
    ServiceExport {
        name: "load_balancer",
        resource_types: &[
            "oci_load_balancer_load_balancer",
            "oci_load_balancer_backend_set",
        ],
    },
    ServiceExport {
        name: "network_load_balancer",
        resource_types: &["oci_network_load_balancer_network_load_balancer"],
    },
    ServiceExport {
        name: "functions",
        resource_types: &["oci_functions_application", "oci_functions_function"],
    },
];

/// Looks up a service by name.
pub fn find_service(name: &str) -> Option<&'static ServiceExport> {
    CATALOG.iter().find(|service| service.name == name)
}

/// Computes the services an export covers.
///
/// An empty `services` list selects the whole catalog. A service named in
/// both lists is excluded. The result follows catalog order.
///
/// # Errors
///
/// Returns [`ExportError::UnknownService`] for a name in either list that
/// is not in the catalog.
pub fn resolve_services(
    services: &[String],
    exclude: &[String],
) -> Result<Vec<&'static ServiceExport>> {
    for name in services.iter().chain(exclude) {
        if find_service(name).is_none() {
            return Err(ExportError::UnknownService(name.clone()));
        }
    }

    Ok(CATALOG
        .iter()
        .filter(|service| services.is_empty() || services.iter().any(|s| s == service.name))
        .filter(|service| !exclude.iter().any(|s| s == service.name))
        .collect())
}

/// Prints every service and its resource types.
pub fn list_export_resources<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "List of exportable resources")?;
    for service in CATALOG {
        writeln!(out, "{}:", style(service.name).bold())?;
        for resource_type in service.resource_types {
            writeln!(out, "\t{resource_type}")?;
        }
    }
    Ok(())
}
