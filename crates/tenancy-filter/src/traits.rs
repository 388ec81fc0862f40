//! Traits connecting caller types to the filter engine.
//!
//! [`Filterable`] is how the engine reads attributes out of a record, and
//! [`FilterEnum`] reduces named string types (API lifecycle enums, string
//! newtypes) to their underlying string before comparison.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::value::{AttrValue, Value};

/// A record whose attributes can be inspected by predicates.
///
/// Implemented for attribute maps out of the box. Structs can derive it with
/// `#[derive(Filterable)]` from `tenancy-macros`, or implement it manually:
///
/// ```
/// use tenancy_filter::{Filterable, Value};
///
/// struct Vcn {
///     display_name: String,
///     cidr_blocks: Vec<String>,
/// }
///
/// impl Filterable for Vcn {
///     fn attribute(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "display_name" => Some(Value::String(&self.display_name)),
///             "cidr_blocks" => Some(Value::strings(&self.cidr_blocks)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Filterable {
    /// Returns the value of the named attribute, or `None` if the record
    /// does not have it.
    fn attribute(&self, name: &str) -> Option<Value<'_>>;
}

impl Filterable for BTreeMap<String, AttrValue> {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(AttrValue::as_value)
    }
}

impl<S: BuildHasher> Filterable for HashMap<String, AttrValue, S> {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).map(AttrValue::as_value)
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        (**self).attribute(name)
    }
}

/// A named type whose underlying representation is a string.
///
/// Matching is defined on the underlying string, never on the Rust type, so
/// two different enums that share a member name compare equal to the same
/// target.
///
/// ```
/// use tenancy_filter::{FilterEnum, Value};
///
/// enum LifecycleState {
///     Available,
///     Terminated,
/// }
///
/// impl FilterEnum for LifecycleState {
///     fn filter_str(&self) -> &str {
///         match self {
///             LifecycleState::Available => "AVAILABLE",
///             LifecycleState::Terminated => "TERMINATED",
///         }
///     }
/// }
///
/// // A newtype over another named type delegates to it.
/// struct Custom(LifecycleState);
///
/// impl FilterEnum for Custom {
///     fn filter_str(&self) -> &str {
///         self.0.filter_str()
///     }
/// }
///
/// assert_eq!(Value::named(&Custom(LifecycleState::Terminated)), Value::String("TERMINATED"));
/// ```
pub trait FilterEnum {
    /// Returns the underlying string form.
    fn filter_str(&self) -> &str;
}

impl FilterEnum for str {
    fn filter_str(&self) -> &str {
        self
    }
}

impl FilterEnum for String {
    fn filter_str(&self) -> &str {
        self
    }
}

impl<T: FilterEnum + ?Sized> FilterEnum for &T {
    fn filter_str(&self) -> &str {
        (**self).filter_str()
    }
}
