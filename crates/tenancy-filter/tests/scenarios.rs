//! End-to-end filtering scenarios over attribute-map records.

use tenancy_filter::{
    apply_filters, fingerprint, record, AttrValue, FilterEnum, FilterError, Predicate,
    PredicateSet, Record,
};

// ============================================================================
// Named string types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct CustomStringA(String);

impl FilterEnum for CustomStringA {
    fn filter_str(&self) -> &str {
        &self.0
    }
}

/// A named type over another named type.
#[derive(Debug, Clone, PartialEq)]
struct CustomStringB(CustomStringA);

impl FilterEnum for CustomStringB {
    fn filter_str(&self) -> &str {
        self.0.filter_str()
    }
}

fn a(s: &str) -> CustomStringA {
    CustomStringA(s.to_string())
}

fn b(s: &str) -> CustomStringB {
    CustomStringB(a(s))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SecurityListState {
    Provisioning,
    Available,
    Terminating,
    Terminated,
}

impl FilterEnum for SecurityListState {
    fn filter_str(&self) -> &str {
        match self {
            SecurityListState::Provisioning => "PROVISIONING",
            SecurityListState::Available => "AVAILABLE",
            SecurityListState::Terminating => "TERMINATING",
            SecurityListState::Terminated => "TERMINATED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum VcnState {
    Provisioning,
    Available,
    Terminating,
    Terminated,
}

impl FilterEnum for VcnState {
    fn filter_str(&self) -> &str {
        match self {
            VcnState::Provisioning => "PROVISIONING",
            VcnState::Available => "AVAILABLE",
            VcnState::Terminating => "TERMINATING",
            VcnState::Terminated => "TERMINATED",
        }
    }
}

/// A named type over an enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CustomEnum(VcnState);

impl FilterEnum for CustomEnum {
    fn filter_str(&self) -> &str {
        self.0.filter_str()
    }
}

fn letters(values: &[&str]) -> Vec<Record> {
    values.iter().map(|l| record! { "letter" => *l }).collect()
}

fn letter_values(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.get("letter").and_then(AttrValue::as_str))
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn pass_through_without_filters() {
    let records = vec![Record::new(), Record::new(), Record::new()];

    assert_eq!(apply_filters(None, &records).unwrap().len(), 3);
    assert_eq!(
        apply_filters(Some(&PredicateSet::new()), &records).unwrap().len(),
        3
    );
}

#[test]
fn nonexistent_attribute_matches_nothing() {
    let records = letters(&["a"]);
    let filters = PredicateSet::with_fingerprint(fingerprint::constant)
        .with(Predicate::new("number", ["1"]));

    assert!(apply_filters(Some(&filters), &records).unwrap().is_empty());
}

#[test]
fn no_records() {
    let records: Vec<Record> = Vec::new();
    let filters = PredicateSet::with_fingerprint(fingerprint::constant)
        .with(Predicate::new("number", ["1"]));

    assert!(apply_filters(Some(&filters), &records).unwrap().is_empty());
}

#[test]
fn basic_match() {
    let records = letters(&["a", "b", "c"]);
    let filters = PredicateSet::with_fingerprint(fingerprint::constant)
        .with(Predicate::new("letter", ["b"]));

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(letter_values(&retained), vec!["b"]);
}

#[test]
fn duplicate_records_are_kept() {
    let records = letters(&["a", "a", "c"]);
    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("letter", ["a"]));

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(letter_values(&retained), vec!["a", "a"]);
}

#[test]
fn values_combine_with_or() {
    let records = letters(&["a", "b", "c"]);
    let filters = PredicateSet::with_fingerprint(fingerprint::by_values)
        .with(Predicate::new("letter", ["a", "b"]));

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(letter_values(&retained), vec!["a", "b"]);
}

#[test]
fn same_name_predicates_combine_with_and() {
    let records = letters(&["a", "b", "c"]);
    let filters = PredicateSet::with_fingerprint(fingerprint::by_values)
        .with(Predicate::new("letter", ["a", "b"]))
        .with(Predicate::new("letter", ["c"]));

    assert_eq!(filters.len(), 2);
    assert!(apply_filters(Some(&filters), &records).unwrap().is_empty());
}

#[test]
fn same_name_predicates_collapse_under_name_fingerprint() {
    let records = letters(&["a", "b", "c"]);
    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("letter", ["a", "b"]))
        .with(Predicate::new("letter", ["c"]));

    // The second predicate is dropped by the set, not the engine.
    assert_eq!(filters.len(), 1);
    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(letter_values(&retained), vec!["a", "b"]);
}

#[test]
fn regex_matches_anywhere() {
    let records: Vec<Record> = ["xblx:PHX-AD-1", "xblx:PHX-AD-2", "xblx:PHX-AD-3"]
        .iter()
        .map(|s| record! { "string" => *s })
        .collect();
    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::regex("string", [r"\w*:PHX-AD-2"]));

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained.len(), 1);
    assert_eq!(retained[0]["string"].as_str(), Some("xblx:PHX-AD-2"));
}

#[test]
fn regex_is_unanchored_unless_pattern_anchors() {
    let records = vec![record! { "name" => "prod-web-01" }];

    let inner = PredicateSet::new().with(Predicate::regex("name", ["web"]));
    assert_eq!(apply_filters(Some(&inner), &records).unwrap().len(), 1);

    let anchored = PredicateSet::new().with(Predicate::regex("name", ["^web"]));
    assert!(apply_filters(Some(&anchored), &records).unwrap().is_empty());
}

#[test]
fn invalid_regex_aborts_the_call() {
    let records = letters(&["a"]);
    let filters = PredicateSet::new().with(Predicate::regex("letter", ["(unclosed"]));

    match apply_filters(Some(&filters), &records) {
        Err(FilterError::InvalidRegex { name, pattern, .. }) => {
            assert_eq!(name, "letter");
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("expected InvalidRegex, got {other:?}"),
    }
}

#[test]
fn string_list_attributes() {
    let records = vec![
        record! { "letters" => vec!["a"] },
        record! { "letters" => vec!["b", "c"] },
        record! { "letters" => vec!["c", "d", "e"] },
        record! { "letters" => vec!["e", "f"] },
    ];

    let filters = PredicateSet::with_fingerprint(fingerprint::constant)
        .with(Predicate::new("letters", ["a", "c"]));
    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained, records[..3].to_vec());

    let filters = PredicateSet::with_fingerprint(fingerprint::constant)
        .with(Predicate::new("letters", ["a", "f"]));
    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained, vec![records[0].clone(), records[3].clone()]);
}

fn named_type_records() -> Vec<Record> {
    let rows = [
        (vec!["a"], "1", SecurityListState::Available, VcnState::Terminated),
        (vec!["a"], "1", SecurityListState::Provisioning, VcnState::Terminating),
        (vec!["b", "c"], "2", SecurityListState::Terminating, VcnState::Provisioning),
        (vec!["c", "d", "e"], "3", SecurityListState::Terminated, VcnState::Available),
        (vec!["e", "f"], "5", SecurityListState::Available, VcnState::Terminated),
    ];

    rows.into_iter()
        .map(|(ls, number, state, custom)| {
            let ls: Vec<CustomStringA> = ls.into_iter().map(a).collect();
            record! {
                "letters" => AttrValue::named_list(&ls),
                "number" => AttrValue::named(&b(number)),
                "state" => AttrValue::named(&state),
                "custom" => AttrValue::named(&CustomEnum(custom)),
            }
        })
        .collect()
}

#[test]
fn named_types_reduce_to_underlying_strings() {
    let records = named_type_records();

    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("letters", ["a", "c"]));
    assert_eq!(apply_filters(Some(&filters), &records).unwrap().len(), 4);

    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("letters", ["a", "b", "e"]))
        .with(Predicate::new("number", ["1", "notANumber"]));
    assert_eq!(apply_filters(Some(&filters), &records).unwrap().len(), 2);

    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("letters", ["a", "b", "e"]))
        .with(Predicate::new("number", ["1", "2", "3", "5"]))
        .with(Predicate::new(
            "state",
            [
                SecurityListState::Available.filter_str(),
                SecurityListState::Terminating.filter_str(),
            ],
        ))
        .with(Predicate::new("custom", [VcnState::Provisioning.filter_str()]));
    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained, vec![records[2].clone()]);
}

#[test]
fn integer_lists_are_unsupported() {
    let records = vec![
        record! { "nums" => vec![1i64, 2, 3] },
        record! { "nums" => vec![3i64, 4, 5] },
        record! { "nums" => vec![5i64, 6, 7] },
    ];
    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("nums", ["1", "3", "5"]));

    assert!(apply_filters(Some(&filters), &records).unwrap().is_empty());
}

#[test]
fn nested_and_null_values_are_unsupported() {
    let records = vec![
        record! { "tags" => Record::new() },
        record! { "tags" => None::<String> },
    ];
    let filters = PredicateSet::new().with(Predicate::new("tags", [""]));

    assert!(apply_filters(Some(&filters), &records).unwrap().is_empty());
}

#[test]
fn boolean_values_compare_as_strings() {
    let records = vec![
        record! { "enabled" => true },
        record! { "enabled" => "true" },
        record! { "enabled" => "1" },
        record! { "enabled" => false },
        record! { "enabled" => "false" },
        record! { "enabled" => "0" },
    ];

    let mut filters = PredicateSet::with_fingerprint(fingerprint::by_name);
    let truthy = Predicate::new("enabled", ["true", "1"]);
    filters.insert(truthy.clone());

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained, records[..3].to_vec());
    filters.remove(&truthy);

    let falsy = Predicate::new("enabled", ["false", "0"]);
    filters.insert(falsy);

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained, records[3..].to_vec());
}

#[test]
fn numeric_values_compare_as_decimal_strings() {
    let records = vec![
        record! { "integer" => 1, "float" => 1.1 },
        record! { "integer" => 2, "float" => 2.2 },
        record! { "integer" => 3, "float" => 3.3 },
    ];
    let mut filters = PredicateSet::with_fingerprint(fingerprint::by_name);

    let single = Predicate::new("integer", ["2"]);
    filters.insert(single.clone());
    assert_eq!(apply_filters(Some(&filters), &records).unwrap().len(), 1);
    filters.remove(&single);

    let several = Predicate::new("integer", ["1", "3"]);
    filters.insert(several.clone());
    assert_eq!(apply_filters(Some(&filters), &records).unwrap().len(), 2);
    filters.remove(&several);

    filters.insert(Predicate::new("float", ["1.1", "3.3"]));
    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(retained, vec![records[0].clone(), records[2].clone()]);
}

#[test]
fn distinct_attributes_combine_with_and() {
    let records = vec![
        record! { "letter" => "a", "number" => "1", "symbol" => "!" },
        record! { "letter" => "b", "number" => "2", "symbol" => "@" },
        record! { "letter" => "c", "number" => "3", "symbol" => "#" },
        record! { "letter" => "d", "number" => "4", "symbol" => "$" },
    ];
    let filters = PredicateSet::with_fingerprint(fingerprint::by_name)
        .with(Predicate::new("letter", ["a", "b", "c"]))
        .with(Predicate::new("number", ["2", "3", "4"]))
        .with(Predicate::new("symbol", ["#", "$"]));

    let retained = apply_filters(Some(&filters), &records).unwrap();
    assert_eq!(letter_values(&retained), vec!["c"]);
}

#[test]
fn records_and_predicates_are_left_untouched() {
    let records = letters(&["a", "b"]);
    let before = records.clone();
    let filters = PredicateSet::new().with(Predicate::new("letter", ["a"]));
    let members: Vec<Predicate> = filters.iter().cloned().collect();

    apply_filters(Some(&filters), &records).unwrap();

    assert_eq!(records, before);
    assert_eq!(filters.iter().cloned().collect::<Vec<_>>(), members);
}

#[test]
fn compiled_filter_is_reusable() {
    let filter = PredicateSet::new()
        .with(Predicate::regex("letter", ["[ab]"]))
        .compile()
        .unwrap();

    assert_eq!(filter.count(&letters(&["a", "c"])), 1);
    assert_eq!(filter.count(&letters(&["b", "b", "z"])), 2);
}

#[test]
fn retain_filters_in_place() {
    let mut records = letters(&["a", "b", "c", "a"]);
    PredicateSet::new()
        .with(Predicate::new("letter", ["a"]))
        .retain(&mut records)
        .unwrap();

    assert_eq!(letter_values(&records), vec!["a", "a"]);
}
