//! Attribute values and their comparable string form.
//!
//! [`AttrValue`] is the owned value stored in a record. [`Value`] is the
//! borrowed view handed to predicates, and [`Value::coerce`] flattens it
//! into the candidate strings that predicate targets are compared against.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::traits::FilterEnum;

/// Owned attribute value, as stored in a [`Record`](crate::Record).
///
/// Records decoded from API payloads may carry any shape, so lists of
/// arbitrary values, nested maps and nulls are representable. Only the
/// string, boolean, numeric and string-list shapes can be filtered on; the
/// others fail every predicate that targets them.
///
/// # Example
///
/// ```
/// use tenancy_filter::{AttrValue, Value};
///
/// let state = AttrValue::from("AVAILABLE");
/// assert_eq!(state.as_value(), Value::String("AVAILABLE"));
///
/// let nums = AttrValue::from(vec![1i64, 2, 3]);
/// assert!(!nums.as_value().is_supported());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// String value, including the underlying form of named string types.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Sequence of strings.
    StringList(Vec<String>),
    /// Sequence of anything else. Not filterable.
    List(Vec<AttrValue>),
    /// Nested object. Not filterable.
    Map(BTreeMap<String, AttrValue>),
    /// Explicit null. Not filterable.
    Null,
}

impl AttrValue {
    /// Reduces a named string type to its underlying string.
    pub fn named<T: FilterEnum + ?Sized>(value: &T) -> Self {
        AttrValue::String(value.filter_str().to_string())
    }

    /// Reduces a sequence of named string types to a string list.
    pub fn named_list<T: FilterEnum>(values: &[T]) -> Self {
        AttrValue::StringList(values.iter().map(|v| v.filter_str().to_string()).collect())
    }

    /// Returns the borrowed view used for matching.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            AttrValue::String(s) => Value::String(s),
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Int(n) => Value::Int(*n),
            AttrValue::Float(f) => Value::Float(*f),
            AttrValue::StringList(items) => Value::strings(items),
            AttrValue::List(_) => Value::Unsupported("list"),
            AttrValue::Map(_) => Value::Unsupported("map"),
            AttrValue::Null => Value::Unsupported("null"),
        }
    }

    /// Returns `true` if this is an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's shape.
    pub fn shape(&self) -> &'static str {
        match self {
            AttrValue::String(_) => "string",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::StringList(_) => "string list",
            AttrValue::List(_) => "list",
            AttrValue::Map(_) => "map",
            AttrValue::Null => "null",
        }
    }
}

/// Borrowed view of an attribute value at match time.
///
/// [`Filterable`](crate::Filterable) implementations return this type. It
/// is the tagged form every stored shape is classified into before
/// comparison; anything that cannot be flattened to strings is
/// [`Value::Unsupported`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Sequence of strings (borrowed).
    Strings(Vec<&'a str>),
    /// Shape that cannot be compared. The payload names the shape.
    Unsupported(&'static str),
}

impl<'a> Value<'a> {
    /// View over a slice of owned strings.
    pub fn strings(values: &'a [String]) -> Self {
        Value::Strings(values.iter().map(String::as_str).collect())
    }

    /// Reduces a named string type to its underlying string.
    pub fn named<T: FilterEnum + ?Sized>(value: &'a T) -> Self {
        Value::String(value.filter_str())
    }

    /// Reduces a sequence of named string types to a string sequence.
    pub fn named_list<T: FilterEnum>(values: &'a [T]) -> Self {
        Value::Strings(values.iter().map(T::filter_str).collect())
    }

    /// Returns `false` for [`Value::Unsupported`].
    pub fn is_supported(&self) -> bool {
        !matches!(self, Value::Unsupported(_))
    }

    /// Short name of the value's shape.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Strings(_) => "string list",
            Value::Unsupported(shape) => *shape,
        }
    }

    /// Flattens the value into its comparable candidate strings.
    ///
    /// | Shape | Candidates |
    /// |-------|------------|
    /// | string | the string itself |
    /// | bool | `"true"` / `"false"` |
    /// | int | decimal representation |
    /// | float | shortest decimal that parses back to the same value |
    /// | string list | each element, in order |
    ///
    /// Returns `None` for unsupported shapes.
    ///
    /// ```
    /// use tenancy_filter::Value;
    ///
    /// assert_eq!(Value::Float(1.1).coerce().unwrap(), vec!["1.1"]);
    /// assert_eq!(Value::Bool(false).coerce().unwrap(), vec!["false"]);
    /// assert!(Value::Unsupported("list").coerce().is_none());
    /// ```
    pub fn coerce(&self) -> Option<Vec<Cow<'a, str>>> {
        match self {
            Value::String(s) => Some(vec![Cow::Borrowed(*s)]),
            Value::Bool(b) => Some(vec![Cow::Borrowed(if *b { "true" } else { "false" })]),
            Value::Int(n) => Some(vec![Cow::Owned(n.to_string())]),
            // Display for f64 is the shortest round-trip form and never
            // switches to exponent notation.
            Value::Float(f) => Some(vec![Cow::Owned(f.to_string())]),
            Value::Strings(items) => Some(items.iter().map(|s| Cow::Borrowed(*s)).collect()),
            Value::Unsupported(_) => None,
        }
    }
}

/// Widens an `f32` so that it prints the same shortest decimal.
///
/// A plain `as f64` cast of `1.1f32` prints as `1.100000023841858`.
fn widen_f32(n: f32) -> f64 {
    n.to_string().parse().unwrap_or(f64::from(n))
}

// Conversions into the borrowed view

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a [String]> for Value<'a> {
    fn from(values: &'a [String]) -> Self {
        Value::strings(values)
    }
}

impl<'a> From<&'a Vec<String>> for Value<'a> {
    fn from(values: &'a Vec<String>) -> Self {
        Value::strings(values)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value<'_> {
    fn from(n: f32) -> Self {
        Value::Float(widen_f32(n))
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

macro_rules! int_conversions {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(n: $ty) -> Self {
                    Value::Int(i64::from(n))
                }
            }

            impl From<$ty> for AttrValue {
                fn from(n: $ty) -> Self {
                    AttrValue::Int(i64::from(n))
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, u8, u16, u32);

// Conversions into the owned value

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<f32> for AttrValue {
    fn from(n: f32) -> Self {
        AttrValue::Float(widen_f32(n))
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Float(n)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        AttrValue::StringList(values)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(values: Vec<&str>) -> Self {
        AttrValue::StringList(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for AttrValue {
    fn from(values: &[&str]) -> Self {
        AttrValue::StringList(values.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(values: Vec<i64>) -> Self {
        AttrValue::List(values.into_iter().map(AttrValue::Int).collect())
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(values: Vec<AttrValue>) -> Self {
        AttrValue::List(values)
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrValue {
    fn from(map: BTreeMap<String, AttrValue>) -> Self {
        AttrValue::Map(map)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}
