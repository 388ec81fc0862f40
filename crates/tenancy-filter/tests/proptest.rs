//! Property-based tests for the filter engine using proptest.

use proptest::prelude::*;
use regex::Regex;
use tenancy_filter::{apply_filters, fingerprint, record, Predicate, PredicateSet, Record};

// ============================================================================
// Test helpers
// ============================================================================

const LETTERS: &[&str] = &["a", "b", "c", "d"];
const SHAPES: &[&str] = &["circle", "square", "triangle"];

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(LETTERS),
        prop::sample::select(SHAPES),
        0i64..5,
        any::<bool>(),
    )
        .prop_map(|(letter, shape, size, filled)| {
            record! {
                "letter" => letter,
                "shape" => shape,
                "size" => size,
                "filled" => filled,
            }
        })
}

fn predicate_strategy() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        prop::sample::subsequence(LETTERS.to_vec(), 1..=LETTERS.len())
            .prop_map(|values| Predicate::new("letter", values)),
        prop::sample::subsequence(SHAPES.to_vec(), 1..=SHAPES.len())
            .prop_map(|values| Predicate::new("shape", values)),
        prop::collection::vec((0i64..6).prop_map(|n| n.to_string()), 1..3)
            .prop_map(|values| Predicate::new("size", values)),
        prop::sample::select(vec!["true", "false"])
            .prop_map(|value| Predicate::new("filled", [value])),
        Just(Predicate::new("missing", ["x"])),
    ]
}

fn predicate_set(predicates: &[Predicate]) -> PredicateSet {
    // Same-name predicates with different values stay distinct.
    let mut set = PredicateSet::with_fingerprint(fingerprint::whole);
    set.extend(predicates.iter().cloned());
    set
}

fn is_subsequence(sub: &[Record], full: &[Record]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|item| rest.any(|candidate| candidate == item))
}

fn matches_one(predicate: &Predicate, record: &Record) -> bool {
    let set = PredicateSet::new().with(predicate.clone());
    !apply_filters(Some(&set), std::slice::from_ref(record))
        .unwrap()
        .is_empty()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// No predicates means every record passes.
    #[test]
    fn identity_without_predicates(
        records in prop::collection::vec(record_strategy(), 0..30),
    ) {
        prop_assert_eq!(apply_filters(None, &records).unwrap(), records.clone());
        prop_assert_eq!(
            apply_filters(Some(&PredicateSet::new()), &records).unwrap(),
            records
        );
    }

    /// No records means no output, whatever the predicates, malformed
    /// patterns included.
    #[test]
    fn empty_input_yields_empty_output(
        predicates in prop::collection::vec(predicate_strategy(), 0..5),
        broken in any::<bool>(),
    ) {
        let mut set = predicate_set(&predicates);
        if broken {
            set.insert(Predicate::regex("letter", ["("]));
        }
        prop_assert!(apply_filters(Some(&set), &Vec::<Record>::new()).unwrap().is_empty());
    }

    /// Adding a predicate never enlarges the result.
    #[test]
    fn adding_a_predicate_never_enlarges(
        records in prop::collection::vec(record_strategy(), 0..30),
        predicates in prop::collection::vec(predicate_strategy(), 0..4),
        extra in predicate_strategy(),
    ) {
        let base = predicate_set(&predicates);
        let extended = base.clone().with(extra);

        let before = apply_filters(Some(&base), &records).unwrap();
        let after = apply_filters(Some(&extended), &records).unwrap();
        prop_assert!(after.len() <= before.len());
    }

    /// The output is an order-preserving subsequence of the input, and
    /// duplicated inputs stay duplicated.
    #[test]
    fn output_preserves_order_and_multiplicity(
        records in prop::collection::vec(record_strategy(), 0..30),
        predicates in prop::collection::vec(predicate_strategy(), 1..4),
    ) {
        let set = predicate_set(&predicates);
        let retained = apply_filters(Some(&set), &records).unwrap();
        prop_assert!(is_subsequence(&retained, &records));

        let doubled: Vec<Record> = records.iter().flat_map(|r| [r.clone(), r.clone()]).collect();
        let retained_doubled = apply_filters(Some(&set), &doubled).unwrap();
        prop_assert_eq!(retained_doubled.len(), retained.len() * 2);
    }

    /// Two predicates retain exactly the records both retain alone.
    #[test]
    fn predicates_combine_with_and(
        records in prop::collection::vec(record_strategy(), 0..30),
        first in predicate_strategy(),
        second in predicate_strategy(),
    ) {
        let both = predicate_set(&[first.clone(), second.clone()]);
        let combined = apply_filters(Some(&both), &records).unwrap();

        let expected: Vec<Record> = records
            .iter()
            .filter(|r| matches_one(&first, r) && matches_one(&second, r))
            .cloned()
            .collect();
        prop_assert_eq!(combined, expected);
    }

    /// A multi-value predicate matches iff one of its single-value
    /// predicates does.
    #[test]
    fn values_combine_with_or(
        record in record_strategy(),
        values in prop::sample::subsequence(LETTERS.to_vec(), 1..=LETTERS.len()),
    ) {
        let whole = Predicate::new("letter", values.clone());
        let any_single = values
            .iter()
            .any(|v| matches_one(&Predicate::new("letter", [*v]), &record));
        prop_assert_eq!(matches_one(&whole, &record), any_single);
    }

    /// A regex predicate matches iff the pattern finds a match in the
    /// coerced attribute.
    #[test]
    fn regex_predicate_agrees_with_regex_search(
        record in record_strategy(),
        pattern in prop::sample::select(vec!["^c", "ir", "e$", "[qs]", "^(square|circle)$", "x"]),
    ) {
        let predicate = Predicate::regex("shape", [pattern]);
        let shape = record["shape"].as_str().unwrap();
        let expected = Regex::new(pattern).unwrap().is_match(shape);
        prop_assert_eq!(matches_one(&predicate, &record), expected);
    }

    /// Integers match their decimal form and nothing else.
    #[test]
    fn integers_match_decimal_form(n in any::<i64>(), other in any::<i64>()) {
        let records = vec![record! { "n" => n }];
        let set = PredicateSet::new().with(Predicate::new("n", [other.to_string()]));
        let retained = apply_filters(Some(&set), &records).unwrap();
        prop_assert_eq!(retained.len(), usize::from(n == other));
    }

    /// Floats match the literal they were written as.
    #[test]
    fn floats_round_trip_their_literal(whole in 0u32..10_000, frac in 1u32..1000) {
        let literal = format!("{whole}.{frac:03}").trim_end_matches('0').to_string();
        let value: f64 = literal.parse().unwrap();
        let records = vec![record! { "f" => value }];
        let set = PredicateSet::new().with(Predicate::new("f", [literal]));
        prop_assert_eq!(apply_filters(Some(&set), &records).unwrap().len(), 1);
    }
}
