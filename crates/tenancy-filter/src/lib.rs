//! Attribute predicate filtering for heterogeneous cloud resource records.
//!
//! Data sources list cloud resources as records: maps from attribute name to
//! a value of any shape. Users narrow those lists with filter blocks, each
//! naming an attribute and the values it may take. This crate applies such
//! filters.
//!
//! - Values of different shapes (strings, named string types, booleans,
//!   integers, floats, string lists) are normalised to comparable strings
//! - Targets match literally or, for regex predicates, anywhere inside a
//!   candidate
//! - Values within one predicate combine with OR; predicates combine with
//!   AND, even when they target the same attribute
//!
//! # Quick Start
//!
//! ```rust
//! use tenancy_filter::{apply_filters, record, Predicate, PredicateSet};
//!
//! let subnets = vec![
//!     record! { "display_name" => "public", "availability_domain" => "xblx:PHX-AD-1", "prohibit_public_ip_on_vnic" => false },
//!     record! { "display_name" => "private", "availability_domain" => "xblx:PHX-AD-2", "prohibit_public_ip_on_vnic" => true },
//!     record! { "display_name" => "db", "availability_domain" => "xblx:PHX-AD-2", "prohibit_public_ip_on_vnic" => true },
//! ];
//!
//! let filters = PredicateSet::new()
//!     .with(Predicate::regex("availability_domain", [r"\w*:PHX-AD-2"]))
//!     .with(Predicate::new("display_name", ["private", "public"]))
//!     .with(Predicate::new("prohibit_public_ip_on_vnic", ["true"]));
//!
//! let retained = apply_filters(Some(&filters), &subnets).unwrap();
//! assert_eq!(retained.len(), 1);
//! assert_eq!(retained[0]["display_name"].as_str(), Some("private"));
//! ```
//!
//! # Matching Semantics
//!
//! ```text
//! retained(r) = ∀ p ∈ predicates:
//!                 r has p.name
//!               ∧ r[p.name] coerces to candidates C
//!               ∧ ∃ t ∈ p.values, c ∈ C: t matches c
//! ```
//!
//! | Attribute shape | Candidates |
//! |-----------------|------------|
//! | string, named string type | the string |
//! | bool | `"true"` / `"false"` |
//! | integer | decimal form |
//! | float | shortest round-trip decimal (`1.1` → `"1.1"`) |
//! | string list | each element |
//! | anything else | none: the predicate fails |
//!
//! Missing attributes and unsupported shapes drop the record silently. A
//! regex that does not compile aborts the whole call with
//! [`FilterError::InvalidRegex`].

mod error;
mod filter;
#[cfg(feature = "serde")]
mod json;
mod predicate;
mod set;
mod traits;
mod value;

use std::collections::BTreeMap;

// Re-export public API
pub use error::{FilterError, Result};
pub use filter::{apply_filters, Filter};
#[cfg(feature = "serde")]
pub use json::record_from_json;
pub use predicate::{CompiledPredicate, Predicate};
pub use set::{fingerprint, PredicateSet};
pub use traits::{FilterEnum, Filterable};
pub use value::{AttrValue, Value};

/// A resource instance: attribute name to stored value.
pub type Record = BTreeMap<String, AttrValue>;

/// Builds a [`Record`] from `key => value` pairs.
///
/// Values go through [`AttrValue::from`].
///
/// ```
/// use tenancy_filter::{record, AttrValue};
///
/// let vcn = record! {
///     "display_name" => "vcn-1",
///     "cidr_blocks" => vec!["10.0.0.0/16"],
///     "is_ipv6enabled" => false,
/// };
/// assert_eq!(vcn["is_ipv6enabled"], AttrValue::Bool(false));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(
                ::std::string::String::from($key),
                $crate::AttrValue::from($value),
            );
        )+
        record
    }};
}
