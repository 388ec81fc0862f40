//! Export command arguments.
//!
//! [`ExportCommandArgs`] is the validated input of
//! [`run_export_command`](crate::run_export_command). The CLI builds it from
//! flags; tests and embedders build it directly.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ExportError, Result};

/// Terraform syntax version of the generated configuration.
///
/// The state file is always written in the 0.12 format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TfVersion {
    /// Terraform 0.11: interpolated references, every scalar quoted.
    V0_11,
    /// Terraform 0.12: first-class expressions.
    #[default]
    V0_12,
}

impl TfVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            TfVersion::V0_11 => "0.11",
            TfVersion::V0_12 => "0.12",
        }
    }
}

impl FromStr for TfVersion {
    type Err = ExportError;

    /// Accepts `0.11`, `0.12`, and the empty string (meaning `0.12`).
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0.11" => Ok(TfVersion::V0_11),
            "" | "0.12" => Ok(TfVersion::V0_12),
            other => Err(ExportError::InvalidTfVersion(other.to_string())),
        }
    }
}

impl fmt::Display for TfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default time API calls keep retrying for.
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(15);

/// Arguments of the `export` command.
#[derive(Debug, Clone)]
pub struct ExportCommandArgs {
    /// OCID of the compartment to export.
    pub compartment_id: Option<String>,
    /// Name of the compartment to export.
    pub compartment_name: Option<String>,
    /// Directory receiving the generated files.
    pub output_dir: PathBuf,
    /// Services to export. Empty means every service.
    pub services: Vec<String>,
    /// Services to leave out. Wins over `services`.
    pub exclude_services: Vec<String>,
    /// Resource IDs to export. Empty means every resource.
    pub ids: Vec<String>,
    /// Also write a `terraform.tfstate` for the exported resources.
    pub generate_state: bool,
    pub tf_version: TfVersion,
    pub retry_timeout: Duration,
}

impl ExportCommandArgs {
    /// Arguments exporting everything in the root compartment to `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ExportCommandArgs {
            compartment_id: None,
            compartment_name: None,
            output_dir: output_dir.into(),
            services: Vec::new(),
            exclude_services: Vec::new(),
            ids: Vec::new(),
            generate_state: false,
            tf_version: TfVersion::default(),
            retry_timeout: DEFAULT_RETRY_TIMEOUT,
        }
    }

    /// Checks the arguments for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidArguments`] if:
    /// - the output path is empty
    /// - both a compartment id and a compartment name are given
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ExportError::invalid(
                "output_path is required for the export command",
            ));
        }
        if self.compartment_id.is_some() && self.compartment_name.is_some() {
            return Err(ExportError::invalid(
                "specify either compartment_id or compartment_name, not both",
            ));
        }
        Ok(())
    }
}

/// Splits a comma-separated flag value. Items are trimmed and empty items
/// dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a duration such as `15s`, `1m30s`, `500ms` or `1.5h`.
///
/// The string is a sequence of decimal numbers, each with an optional
/// fraction and a unit suffix: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A
/// bare `0` is also accepted. Negative durations are rejected.
///
/// ```
/// use std::time::Duration;
/// use tenancy_export::parse_duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
/// assert!(parse_duration("15").is_err());
/// ```
pub fn parse_duration(value: &str) -> Result<Duration> {
    let invalid = |reason: &str| ExportError::InvalidDuration {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let s = value.strip_prefix('+').unwrap_or(value);
    if s.starts_with('-') {
        return Err(invalid("negative durations are not allowed"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(invalid("expected a number"));
        }
        let amount: f64 = number.parse().map_err(|_| invalid("malformed number"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };

        total_nanos += amount * scale;
        rest = next;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid("duration out of range"));
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
