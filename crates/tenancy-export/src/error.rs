//! Error types for the export command.

use std::io;
use std::path::PathBuf;

use crate::discovery::DiscoveryError;

/// Errors that can occur while exporting a tenancy.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// `--command` was not given.
    #[error("No command given. Supported commands: export, list_export_resources. Run with --help for usage.")]
    MissingCommand,

    /// `--command` names an unsupported command.
    #[error("No command '{0}' supported")]
    UnknownCommand(String),

    /// Command arguments are inconsistent or malformed.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// `tf_version` names a syntax version that cannot be generated.
    #[error("Invalid tf_version '{0}', supported values: 0.11, 0.12")]
    InvalidTfVersion(String),

    /// A duration flag could not be parsed.
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    /// A requested service is not in the catalog.
    #[error("Unknown service '{0}'. Run with --command list_export_resources to see supported services.")]
    UnknownService(String),

    /// No compartment carries the requested name.
    #[error("Compartment '{0}' not found")]
    CompartmentNotFound(String),

    /// The discovery collaborator failed.
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The narrowing predicates could not be compiled.
    #[error("Failed to filter resources: {0}")]
    Filter(#[from] tenancy_filter::FilterError),

    /// Writing an output file failed.
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serializing the state file failed.
    #[error("Failed to serialize state: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create an invalid-arguments error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
