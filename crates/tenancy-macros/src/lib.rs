//! Proc macros for the tenancy filter engine.
//!
//! - [`Filterable`] - Expose struct fields as filterable attributes

mod attrs;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `tenancy_filter::Filterable` for structs with named fields.
///
/// Only fields carrying a `#[filter(...)]` attribute are exposed.
///
/// # Field Attributes
///
/// | Attribute | Field type | Exposed as |
/// |-----------|------------|------------|
/// | `String` | `String` | string |
/// | `Bool` | `bool` | boolean |
/// | `Number` | integers up to 32 bits, `i64`, `f32`, `f64` | integer / float |
/// | `Strings` | `Vec<String>` | string list |
/// | `Enum` | any `FilterEnum` | its underlying string |
/// | `EnumList` | `Vec<T: FilterEnum>` | string list |
/// | `skip` | | not exposed |
/// | `rename = "..."` | | custom attribute name |
///
/// Each exposed field also gets an associated constant holding its
/// attribute name (`Vcn::DISPLAY_NAME`).
///
/// # Example
///
/// ```ignore
/// use tenancy_filter::{apply_filters, FilterEnum, Predicate, PredicateSet};
/// use tenancy_macros::Filterable;
///
/// #[derive(Clone, Copy)]
/// enum VcnState { Available, Terminated }
///
/// impl FilterEnum for VcnState {
///     fn filter_str(&self) -> &str {
///         match self {
///             VcnState::Available => "AVAILABLE",
///             VcnState::Terminated => "TERMINATED",
///         }
///     }
/// }
///
/// #[derive(Clone, Filterable)]
/// struct Vcn {
///     #[filter(String)]
///     display_name: String,
///     #[filter(Strings)]
///     cidr_blocks: Vec<String>,
///     #[filter(Enum, rename = "state")]
///     lifecycle_state: VcnState,
///     time_created: u64,
/// }
///
/// let filters = PredicateSet::new().with(Predicate::new(Vcn::STATE, ["AVAILABLE"]));
/// let available = apply_filters(Some(&filters), &vcns)?;
/// ```
#[proc_macro_derive(Filterable, attributes(filter))]
pub fn filterable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::filterable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
