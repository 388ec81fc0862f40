//! Predicates and their compiled matchers.
//!
//! A [`Predicate`] names an attribute and lists the target strings it may
//! take. [`CompiledPredicate`] is the same predicate ready for evaluation,
//! with regex targets compiled.

use std::borrow::Cow;

use regex::Regex;

use crate::error::{FilterError, Result};
use crate::traits::Filterable;
use crate::value::Value;

/// A single filter predicate.
///
/// A predicate consists of:
/// - an attribute name (case-sensitive)
/// - one or more target values, always given as strings
/// - a regex flag; when set, every target is a pattern that may match
///   anywhere inside a candidate
///
/// A record satisfies the predicate when any target matches any candidate
/// string of the record's attribute.
///
/// # Example
///
/// ```
/// use tenancy_filter::{Predicate, Value};
///
/// let letter = Predicate::new("letter", ["a", "b"]);
/// let compiled = letter.compile().unwrap();
/// assert!(compiled.matches(&Value::String("b")));
/// assert!(!compiled.matches(&Value::String("c")));
///
/// let ad = Predicate::regex("availability_domain", [r"\w*:PHX-AD-2"]);
/// assert!(ad.compile().unwrap().matches(&Value::String("xblx:PHX-AD-2")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Predicate {
    /// The attribute to inspect.
    pub name: String,
    /// Candidate target values.
    pub values: Vec<String>,
    /// Interpret every target as a regular expression.
    #[cfg_attr(feature = "serde", serde(default))]
    pub regex: bool,
}

impl Predicate {
    /// Creates a literal predicate.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            regex: false,
        }
    }

    /// Creates a regex predicate.
    pub fn regex<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate {
            regex: true,
            ..Predicate::new(name, patterns)
        }
    }

    /// Compiles the predicate for evaluation.
    ///
    /// Returns [`FilterError::InvalidRegex`] if this is a regex predicate
    /// and any of its patterns fails to compile.
    pub fn compile(&self) -> Result<CompiledPredicate> {
        let matcher = if self.regex {
            let patterns = self
                .values
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|source| FilterError::InvalidRegex {
                        name: self.name.clone(),
                        pattern: pattern.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Matcher::Regex(patterns)
        } else {
            Matcher::Literal(self.values.clone())
        };

        Ok(CompiledPredicate {
            name: self.name.clone(),
            matcher,
        })
    }
}

/// A predicate ready for evaluation against records.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    name: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal(Vec<String>),
    Regex(Vec<Regex>),
}

/// Outcome of evaluating one predicate against one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Match,
    NoMatch,
    Missing,
    Unsupported(&'static str),
}

impl CompiledPredicate {
    /// The attribute this predicate targets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this predicate matches by regular expression.
    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex(_))
    }

    /// Evaluates this predicate against an attribute value.
    ///
    /// Unsupported shapes never match.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match value.coerce() {
            Some(candidates) => self.matches_candidates(&candidates),
            None => false,
        }
    }

    /// Evaluates this predicate against a whole record.
    ///
    /// A record without the targeted attribute never matches.
    pub fn matches_record<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.evaluate(record) == Verdict::Match
    }

    pub(crate) fn evaluate<T: Filterable + ?Sized>(&self, record: &T) -> Verdict {
        let Some(value) = record.attribute(&self.name) else {
            return Verdict::Missing;
        };
        let Some(candidates) = value.coerce() else {
            return Verdict::Unsupported(value.shape());
        };
        if self.matches_candidates(&candidates) {
            Verdict::Match
        } else {
            Verdict::NoMatch
        }
    }

    // OR across targets and across candidates.
    fn matches_candidates(&self, candidates: &[Cow<'_, str>]) -> bool {
        match &self.matcher {
            Matcher::Literal(targets) => targets
                .iter()
                .any(|target| candidates.iter().any(|c| &**c == target.as_str())),
            Matcher::Regex(patterns) => patterns
                .iter()
                .any(|re| candidates.iter().any(|c| re.is_match(c))),
        }
    }
}
