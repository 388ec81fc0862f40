//! The caller-supplied collection of predicates.
//!
//! Membership in a [`PredicateSet`] is decided by a fingerprint function
//! chosen by the caller. Two predicates with the same fingerprint are the
//! same member; the first one inserted wins.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::filter::Filter;
use crate::predicate::Predicate;
use crate::traits::Filterable;

type Fingerprint = Arc<dyn Fn(&Predicate) -> u64 + Send + Sync>;

/// An unordered, duplicate-free collection of predicates.
///
/// Iteration follows insertion order, but filtering results never depend on
/// it: every predicate must match for a record to be retained.
///
/// # Example
///
/// ```
/// use tenancy_filter::{fingerprint, record, Predicate, PredicateSet};
///
/// // Fingerprinting by values keeps two predicates on the same attribute.
/// let filters = PredicateSet::with_fingerprint(fingerprint::by_values)
///     .with(Predicate::new("letter", ["a", "b"]))
///     .with(Predicate::new("letter", ["c"]));
/// assert_eq!(filters.len(), 2);
///
/// let records = vec![
///     record! { "letter" => "a" },
///     record! { "letter" => "b" },
///     record! { "letter" => "c" },
/// ];
///
/// // Both must hold, and no letter is in both sets.
/// assert!(filters.filter(&records).unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct PredicateSet {
    entries: Vec<(u64, Predicate)>,
    fingerprint: Fingerprint,
}

impl PredicateSet {
    /// Creates an empty set fingerprinting the whole predicate.
    ///
    /// Only exact duplicates (same name, values and regex flag) collapse.
    pub fn new() -> Self {
        PredicateSet::with_fingerprint(fingerprint::whole)
    }

    /// Creates an empty set with a custom fingerprint function.
    pub fn with_fingerprint<F>(fingerprint: F) -> Self
    where
        F: Fn(&Predicate) -> u64 + Send + Sync + 'static,
    {
        PredicateSet {
            entries: Vec::new(),
            fingerprint: Arc::new(fingerprint),
        }
    }

    /// Adds a predicate, builder style.
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.insert(predicate);
        self
    }

    /// Adds a predicate.
    ///
    /// Returns `false` and leaves the set unchanged if a predicate with the
    /// same fingerprint is already present.
    pub fn insert(&mut self, predicate: Predicate) -> bool {
        let code = self.fingerprint_of(&predicate);
        if self.entries.iter().any(|(existing, _)| *existing == code) {
            return false;
        }
        self.entries.push((code, predicate));
        true
    }

    /// Removes the member sharing this predicate's fingerprint.
    pub fn remove(&mut self, predicate: &Predicate) -> Option<Predicate> {
        let code = self.fingerprint_of(predicate);
        let index = self.entries.iter().position(|(existing, _)| *existing == code)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if a member shares this predicate's fingerprint.
    pub fn contains(&self, predicate: &Predicate) -> bool {
        let code = self.fingerprint_of(predicate);
        self.entries.iter().any(|(existing, _)| *existing == code)
    }

    /// The fingerprint this set assigns to a predicate.
    pub fn fingerprint_of(&self, predicate: &Predicate) -> u64 {
        (self.fingerprint)(predicate)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set has no members (matches everything).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.entries.iter().map(|(_, predicate)| predicate)
    }

    /// Compiles every member into a reusable [`Filter`].
    pub fn compile(&self) -> Result<Filter> {
        Filter::compile(self.iter())
    }

    /// Filters a slice, returning references to the retained records.
    pub fn filter<'a, T: Filterable>(&self, records: &'a [T]) -> Result<Vec<&'a T>> {
        if self.is_empty() || records.is_empty() {
            return Ok(records.iter().collect());
        }
        Ok(self.compile()?.filter(records))
    }

    /// Filters a vector in place.
    pub fn retain<T: Filterable>(&self, records: &mut Vec<T>) -> Result<()> {
        if self.is_empty() || records.is_empty() {
            return Ok(());
        }
        self.compile()?.retain(records);
        Ok(())
    }

    /// Counts the records that would be retained.
    pub fn count<T: Filterable>(&self, records: &[T]) -> Result<usize> {
        if self.is_empty() || records.is_empty() {
            return Ok(records.len());
        }
        Ok(self.compile()?.count(records))
    }
}

impl Default for PredicateSet {
    fn default() -> Self {
        PredicateSet::new()
    }
}

impl fmt::Debug for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Predicate> for PredicateSet {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        let mut set = PredicateSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Predicate> for PredicateSet {
    fn extend<I: IntoIterator<Item = Predicate>>(&mut self, iter: I) {
        for predicate in iter {
            self.insert(predicate);
        }
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a Predicate;
    type IntoIter = Box<dyn Iterator<Item = &'a Predicate> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Ready-made fingerprint functions.
pub mod fingerprint {
    use super::*;

    fn hash_of<H: Hash + ?Sized>(value: &H) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    /// Fingerprints name, values and regex flag together.
    pub fn whole(predicate: &Predicate) -> u64 {
        hash_of(predicate)
    }

    /// Fingerprints the attribute name only: one predicate per attribute.
    pub fn by_name(predicate: &Predicate) -> u64 {
        hash_of(predicate.name.as_str())
    }

    /// Fingerprints the concatenated target values only.
    pub fn by_values(predicate: &Predicate) -> u64 {
        hash_of(predicate.values.concat().as_str())
    }

    /// Gives every predicate the same fingerprint: the set holds at most one.
    pub fn constant(_: &Predicate) -> u64 {
        1
    }
}
