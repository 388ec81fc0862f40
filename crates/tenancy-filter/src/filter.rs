//! The filter engine.
//!
//! [`apply_filters`] is the entry point used by data sources and the export
//! driver. [`Filter`] is the compiled form of a predicate set, for callers
//! that filter several batches with the same predicates.

use tracing::{debug, trace};

use crate::error::Result;
use crate::predicate::{CompiledPredicate, Predicate, Verdict};
use crate::set::PredicateSet;
use crate::traits::Filterable;

/// Applies a predicate set to a sequence of records.
///
/// Returns the records that satisfy every predicate, in input order and
/// with duplicates preserved. An absent or empty set returns the input
/// unchanged; an empty input returns an empty output.
///
/// Predicates compose with AND, including predicates that target the same
/// attribute: `letter ∈ {a, b}` together with `letter ∈ {c}` retains
/// nothing.
///
/// # Errors
///
/// Returns [`FilterError::InvalidRegex`](crate::FilterError::InvalidRegex)
/// if any regex predicate fails to compile. No partial result is produced.
///
/// # Example
///
/// ```
/// use tenancy_filter::{apply_filters, record, Predicate, PredicateSet};
///
/// let records = vec![
///     record! { "letter" => "a" },
///     record! { "letter" => "b" },
///     record! { "letter" => "c" },
/// ];
///
/// let filters = PredicateSet::new().with(Predicate::new("letter", ["a", "b"]));
/// let retained = apply_filters(Some(&filters), &records).unwrap();
/// assert_eq!(retained, records[..2].to_vec());
///
/// assert_eq!(apply_filters(None, &records).unwrap().len(), 3);
/// ```
pub fn apply_filters<T>(predicates: Option<&PredicateSet>, records: &[T]) -> Result<Vec<T>>
where
    T: Filterable + Clone,
{
    let Some(set) = predicates.filter(|set| !set.is_empty()) else {
        return Ok(records.to_vec());
    };
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let filter = set.compile()?;
    let retained = filter.filter_cloned(records);
    debug!(
        predicates = filter.len(),
        records = records.len(),
        retained = retained.len(),
        "applied filters"
    );
    Ok(retained)
}

/// A compiled set of predicates.
///
/// A record is retained when every predicate matches. An empty filter
/// retains everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<CompiledPredicate>,
}

impl Filter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Compiles a sequence of predicates.
    ///
    /// Fails on the first regex pattern that does not compile.
    pub fn compile<'p, I>(predicates: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'p Predicate>,
    {
        let predicates = predicates
            .into_iter()
            .map(Predicate::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Filter { predicates })
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if this filter has no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The compiled predicates.
    pub fn predicates(&self) -> &[CompiledPredicate] {
        &self.predicates
    }

    /// Tests a single record against every predicate.
    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        for predicate in &self.predicates {
            match predicate.evaluate(record) {
                Verdict::Match => continue,
                Verdict::NoMatch => {
                    trace!(attribute = predicate.name(), "dropped: no target matched");
                }
                Verdict::Missing => {
                    trace!(attribute = predicate.name(), "dropped: attribute missing");
                }
                Verdict::Unsupported(shape) => {
                    trace!(attribute = predicate.name(), shape, "dropped: unsupported shape");
                }
            }
            return false;
        }
        true
    }

    /// Filters a slice, returning references to the retained records.
    pub fn filter<'a, T: Filterable>(&self, records: &'a [T]) -> Vec<&'a T> {
        records.iter().filter(|record| self.matches(*record)).collect()
    }

    /// Filters a slice, cloning the retained records.
    pub fn filter_cloned<T: Filterable + Clone>(&self, records: &[T]) -> Vec<T> {
        records
            .iter()
            .filter(|record| self.matches(*record))
            .cloned()
            .collect()
    }

    /// Filters a vector in place, keeping only retained records.
    pub fn retain<T: Filterable>(&self, records: &mut Vec<T>) {
        records.retain(|record| self.matches(record));
    }

    /// Counts the retained records.
    pub fn count<T: Filterable>(&self, records: &[T]) -> usize {
        records.iter().filter(|record| self.matches(*record)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::fingerprint;
    use crate::{record, FilterError, Record};

    fn letters() -> Vec<Record> {
        vec![
            record! { "letter" => "a" },
            record! { "letter" => "b" },
            record! { "letter" => "c" },
        ]
    }

    #[test]
    fn absent_set_passes_through() {
        let records = vec![Record::new(), Record::new(), Record::new()];
        assert_eq!(apply_filters(None, &records).unwrap().len(), 3);
    }

    #[test]
    fn empty_set_passes_through() {
        let set = PredicateSet::new();
        assert_eq!(apply_filters(Some(&set), &letters()).unwrap(), letters());
    }

    #[test]
    fn empty_records_skip_compilation() {
        let set = PredicateSet::new().with(Predicate::regex("letter", ["("]));
        let records: Vec<Record> = Vec::new();
        assert!(apply_filters(Some(&set), &records).unwrap().is_empty());
    }

    #[test]
    fn invalid_regex_aborts() {
        let set = PredicateSet::new().with(Predicate::regex("letter", ["[a-"]));
        let err = apply_filters(Some(&set), &letters()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidRegex { .. }));
    }

    #[test]
    fn same_name_predicates_conjoin() {
        let set = PredicateSet::with_fingerprint(fingerprint::by_values)
            .with(Predicate::new("letter", ["a", "b"]))
            .with(Predicate::new("letter", ["b", "c"]));
        let retained = apply_filters(Some(&set), &letters()).unwrap();
        assert_eq!(retained, vec![record! { "letter" => "b" }]);
    }

    #[test]
    fn duplicates_preserved() {
        let records = vec![
            record! { "letter" => "a" },
            record! { "letter" => "a" },
            record! { "letter" => "c" },
        ];
        let set = PredicateSet::with_fingerprint(fingerprint::by_name)
            .with(Predicate::new("letter", ["a"]));
        assert_eq!(apply_filters(Some(&set), &records).unwrap().len(), 2);
    }

    #[test]
    fn compiled_filter_is_reusable() {
        let filter = Filter::compile(&[Predicate::new("letter", ["c"])]).unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.count(&letters()), 1);
        assert_eq!(filter.filter(&letters()).len(), 1);

        let mut records = letters();
        filter.retain(&mut records);
        assert_eq!(records, vec![record! { "letter" => "c" }]);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&Record::new()));
    }
}
