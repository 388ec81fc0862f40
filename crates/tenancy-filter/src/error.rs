//! Error types for the filter crate.

use thiserror::Error;

/// Errors surfaced by a filter call.
///
/// Records that lack the targeted attribute, or whose attribute has a shape
/// that cannot be compared, are dropped silently and never produce an error.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A regex predicate carries a pattern that does not compile.
    #[error("invalid regex pattern '{pattern}' in filter '{name}': {source}")]
    InvalidRegex {
        /// Attribute the predicate targets.
        name: String,
        /// The offending pattern.
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
