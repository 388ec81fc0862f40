//! Terraform state file generation.
//!
//! Exported resources are recorded in a version 4 state file, the format
//! Terraform 0.12 reads and writes, so that `terraform plan` against the
//! generated configuration starts from the discovered resources.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ExportError, Result};
use crate::hcl::ExportedResource;

/// State format version written by Terraform 0.12.
pub const STATE_VERSION: u32 = 4;

/// Terraform release recorded in generated state.
pub const TERRAFORM_VERSION: &str = "0.12.31";

const PROVIDER: &str = "provider.oci";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerraformState {
    pub version: u32,
    pub terraform_version: String,
    pub serial: u64,
    pub lineage: Uuid,
    pub outputs: BTreeMap<String, serde_json::Value>,
    pub resources: Vec<StateResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResource {
    pub mode: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub provider: String,
    pub instances: Vec<StateInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInstance {
    pub schema_version: u32,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl TerraformState {
    /// Builds a fresh state, with a new lineage, holding one managed
    /// resource per exported resource.
    pub fn from_resources(resources: &[ExportedResource]) -> Self {
        let resources = resources
            .iter()
            .map(|resource| StateResource {
                mode: "managed".to_string(),
                resource_type: resource.resource_type.clone(),
                name: resource.label.clone(),
                provider: PROVIDER.to_string(),
                instances: vec![StateInstance {
                    schema_version: 0,
                    attributes: resource
                        .record
                        .iter()
                        .map(|(key, value)| (key.clone(), serde_json::Value::from(value.clone())))
                        .collect(),
                }],
            })
            .collect();

        TerraformState {
            version: STATE_VERSION,
            terraform_version: TERRAFORM_VERSION.to_string(),
            serial: 1,
            lineage: Uuid::new_v4(),
            outputs: BTreeMap::new(),
            resources,
        }
    }

    /// Writes the state as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| ExportError::io(path, e))
    }
}
