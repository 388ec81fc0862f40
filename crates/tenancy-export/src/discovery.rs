//! Resource discovery.
//!
//! The exporter reads a tenancy through the [`Discovery`] trait.
//! [`SnapshotDiscovery`] serves a tenancy captured as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tenancy_filter::{record_from_json, Record};

/// A discovery failure.
///
/// Retryable failures (throttling, transient service errors) are retried
/// until the export's retry timeout elapses. Fatal ones are not.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DiscoveryError {
    message: String,
    retryable: bool,
}

impl DiscoveryError {
    /// A failure worth retrying.
    pub fn retryable(message: impl Into<String>) -> Self {
        DiscoveryError {
            message: message.into(),
            retryable: true,
        }
    }

    /// A failure that retrying cannot fix.
    pub fn fatal(message: impl Into<String>) -> Self {
        DiscoveryError {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A compartment of the tenancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compartment {
    pub id: String,
    pub name: String,
}

/// Read access to a live tenancy.
pub trait Discovery {
    /// OCID of the tenancy, which is also its root compartment.
    fn root_compartment_id(&self) -> &str;

    /// Looks up a compartment by name.
    fn find_compartment(&self, name: &str) -> Result<Option<Compartment>, DiscoveryError>;

    /// Lists resources of one type.
    ///
    /// Implementations may return resources of other compartments; the
    /// exporter narrows the result itself.
    fn list(&self, resource_type: &str, compartment_id: &str)
        -> Result<Vec<Record>, DiscoveryError>;
}

/// On-disk shape of a tenancy snapshot.
///
/// ```json
/// {
///   "tenancy_id": "ocid1.tenancy.oc1..aaa",
///   "compartments": [{ "id": "ocid1.compartment.oc1..bbb", "name": "dev" }],
///   "resources": {
///     "oci_core_vcn": [{ "id": "ocid1.vcn.oc1..ccc", "compartment_id": "ocid1.compartment.oc1..bbb" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tenancy_id: String,
    #[serde(default)]
    pub compartments: Vec<Compartment>,
    #[serde(default)]
    pub resources: BTreeMap<String, Vec<serde_json::Map<String, serde_json::Value>>>,
}

/// Discovery backed by a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotDiscovery {
    tenancy_id: String,
    compartments: Vec<Compartment>,
    resources: BTreeMap<String, Vec<Record>>,
}

impl SnapshotDiscovery {
    pub fn new(snapshot: Snapshot) -> Self {
        let resources = snapshot
            .resources
            .into_iter()
            .map(|(resource_type, objects)| {
                let records = objects.into_iter().map(record_from_json).collect();
                (resource_type, records)
            })
            .collect();

        SnapshotDiscovery {
            tenancy_id: snapshot.tenancy_id,
            compartments: snapshot.compartments,
            resources,
        }
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DiscoveryError> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| DiscoveryError::fatal(format!("invalid snapshot: {e}")))?;
        Ok(SnapshotDiscovery::new(snapshot))
    }

    /// Reads a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            DiscoveryError::fatal(format!("cannot read snapshot '{}': {e}", path.display()))
        })?;
        SnapshotDiscovery::from_json(&json)
    }
}

impl Discovery for SnapshotDiscovery {
    fn root_compartment_id(&self) -> &str {
        &self.tenancy_id
    }

    fn find_compartment(&self, name: &str) -> Result<Option<Compartment>, DiscoveryError> {
        Ok(self.compartments.iter().find(|c| c.name == name).cloned())
    }

    fn list(
        &self,
        resource_type: &str,
        _compartment_id: &str,
    ) -> Result<Vec<Record>, DiscoveryError> {
        Ok(self
            .resources
            .get(resource_type)
            .cloned()
            .unwrap_or_default())
    }
}
