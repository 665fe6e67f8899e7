//! End-to-end scenarios: registry, decoded filter groups, and the query
//! adapters working together.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use standout_query::{
    apply_ids, apply_search, apply_structured_filters, atom, bool_field, evaluate, null_atom,
    nullable_string_field, pagination, set_atom, sort, strict_time_field, string_field,
    time_field, BoolPredicates, Combinators, Criteria, FieldFilter, FilterGroup, FilterRegistry,
    FilterValue, NullChecks, Operator, OrderBuilder, QueryConfig, QueryError, SearchFields,
    SortFields, StringPredicates, TimePredicates,
};

// ============================================================================
// Test helpers
// ============================================================================

/// Predicate that records how it was built.
#[derive(Debug, Clone, PartialEq)]
enum Pred {
    Atom(String),
    And(Vec<Pred>),
    Or(Vec<Pred>),
}

fn p(s: &str) -> Pred {
    Pred::Atom(s.to_string())
}

fn combinators() -> Combinators<Pred> {
    Combinators::new(Pred::And, Pred::Or)
}

fn strings(field: &'static str) -> StringPredicates<Pred> {
    let op = move |name: &'static str| {
        atom(move |v: String| Pred::Atom(format!("{field} {name} {v}")))
    };
    StringPredicates {
        eq: op("eq"),
        ne: op("ne"),
        gt: op("gt"),
        gte: op("gte"),
        lt: op("lt"),
        lte: op("lte"),
        is_in: set_atom(move |vs: Vec<String>| {
            Pred::Atom(format!("{field} in [{}]", vs.join(",")))
        }),
        not_in: set_atom(move |vs: Vec<String>| {
            Pred::Atom(format!("{field} nin [{}]", vs.join(",")))
        }),
        contains: op("contains"),
        starts_with: op("startswith"),
        ends_with: op("endswith"),
    }
}

fn bools(field: &'static str) -> BoolPredicates<Pred> {
    BoolPredicates {
        eq: atom(move |v: bool| Pred::Atom(format!("{field} eq {v}"))),
        ne: atom(move |v: bool| Pred::Atom(format!("{field} ne {v}"))),
    }
}

fn times(field: &'static str) -> TimePredicates<Pred> {
    let op = move |name: &'static str| {
        atom(move |t: DateTime<Utc>| Pred::Atom(format!("{field} {name} {}", t.to_rfc3339())))
    };
    TimePredicates {
        eq: op("eq"),
        ne: op("ne"),
        gt: op("gt"),
        gte: op("gte"),
        lt: op("lt"),
        lte: op("lte"),
        is_in: set_atom(move |ts: Vec<DateTime<Utc>>| {
            Pred::Atom(format!("{field} in [{}]", rfc3339_list(&ts)))
        }),
        not_in: set_atom(move |ts: Vec<DateTime<Utc>>| {
            Pred::Atom(format!("{field} nin [{}]", rfc3339_list(&ts)))
        }),
    }
}

fn rfc3339_list(ts: &[DateTime<Utc>]) -> String {
    ts.iter().map(DateTime::to_rfc3339).collect::<Vec<_>>().join(",")
}

fn nulls(field: &'static str) -> NullChecks<Pred> {
    NullChecks {
        is_nil: null_atom(move || Pred::Atom(format!("{field} is null"))),
        is_not_nil: null_atom(move || Pred::Atom(format!("{field} is not null"))),
    }
}

fn user_registry() -> FilterRegistry<Pred> {
    FilterRegistry::build(
        &combinators(),
        [
            string_field("email", strings("email")),
            string_field("name", strings("name")),
            nullable_string_field("nickname", strings("nickname"), nulls("nickname")),
            bool_field("active", bools("active")),
            time_field("created_at", times("created_at")),
            strict_time_field("due_at", times("due_at")),
        ],
    )
}

fn email_only_registry() -> FilterRegistry<Pred> {
    FilterRegistry::build(&combinators(), [string_field("email", strings("email"))])
}

fn decode(json: &str) -> FilterGroup {
    serde_json::from_str(json).expect("valid filter group")
}

/// Query stand-in: the list of clauses applied so far.
#[derive(Debug, Default, PartialEq)]
struct Query {
    wheres: Vec<Pred>,
    orders: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

fn where_cfg() -> QueryConfig<Query, Pred> {
    QueryConfig::new(|mut q: Query, pred: Pred| {
        q.wheres.push(pred);
        q
    })
}

// ============================================================================
// Documented scenarios
// ============================================================================

#[test]
fn unknown_field_is_dropped_and_single_predicate_unwrapped() {
    let group = decode(
        r#"{"filters": [
            {"field": "email", "operator": "contains", "value": "john"},
            {"field": "age", "operator": "gte", "value": 18}
        ], "logic": "and"}"#,
    );

    let result = evaluate(&group, &email_only_registry(), &combinators()).unwrap();
    assert_eq!(result, Some(p("email contains john")));
}

#[test]
fn or_group_combines_string_matches() {
    let group = decode(
        r#"{"filters": [
            {"field": "email", "operator": "startswith", "value": "john"},
            {"field": "email", "operator": "endswith", "value": "example.com"}
        ], "logic": "or"}"#,
    );

    let result = evaluate(&group, &email_only_registry(), &combinators()).unwrap();
    assert_eq!(
        result,
        Some(Pred::Or(vec![
            p("email startswith john"),
            p("email endswith example.com"),
        ]))
    );
}

#[test]
fn non_nullable_string_not_null_is_eq_or_ne_empty() {
    let registry = user_registry();
    let name = registry.get("name").unwrap();
    assert_eq!(
        name.is_not_null(),
        Pred::Or(vec![p("name eq "), p("name ne ")])
    );
    assert_eq!(name.is_null(), Pred::And(vec![p("name eq "), p("name ne ")]));
}

#[test]
fn date_only_values_parse_and_garbage_degrades_to_zero_time() {
    let registry = user_registry();

    let group = decode(
        r#"{"filters": [{"field": "created_at", "operator": "gte", "value": "2024-01-15"}]}"#,
    );
    assert_eq!(
        evaluate(&group, &registry, &combinators()).unwrap(),
        Some(p("created_at gte 2024-01-15T00:00:00+00:00"))
    );

    // Lenient parsing: unparseable values become 0001-01-01T00:00:00Z.
    let group = decode(
        r#"{"filters": [{"field": "created_at", "operator": "eq", "value": "not-a-date"}]}"#,
    );
    assert_eq!(
        evaluate(&group, &registry, &combinators()).unwrap(),
        Some(p("created_at eq 0001-01-01T00:00:00+00:00"))
    );
}

#[test]
fn strict_time_fields_surface_parse_errors() {
    let group = decode(
        r#"{"filters": [{"field": "due_at", "operator": "eq", "value": "not-a-date"}]}"#,
    );
    let err = evaluate(&group, &user_registry(), &combinators()).unwrap_err();
    assert_eq!(
        err,
        QueryError::UnparseableTime {
            value: "not-a-date".into()
        }
    );
}

// ============================================================================
// Evaluator properties
// ============================================================================

#[test]
fn empty_group_yields_nothing_for_any_registry() {
    let empty = FilterGroup::new();
    assert_eq!(evaluate(&empty, &user_registry(), &combinators()).unwrap(), None);
    assert_eq!(evaluate(&empty, &email_only_registry(), &combinators()).unwrap(), None);
    assert_eq!(evaluate(&empty, &FilterRegistry::default(), &combinators()).unwrap(), None);
}

#[test]
fn unknown_fields_do_not_change_the_result() {
    let registry = email_only_registry();
    let with_ghost = FilterGroup::new()
        .filter("email", Operator::Eq, "a")
        .filter("ghost", Operator::Eq, "b");
    let without = FilterGroup::new().filter("email", Operator::Eq, "a");

    assert_eq!(
        evaluate(&with_ghost, &registry, &combinators()).unwrap(),
        evaluate(&without, &registry, &combinators()).unwrap()
    );
}

#[test]
fn missing_logic_is_and() {
    let registry = user_registry();
    let implicit = decode(
        r#"{"filters": [
            {"field": "email", "operator": "eq", "value": "a"},
            {"field": "active", "operator": "eq", "value": true}
        ]}"#,
    );
    let empty = decode(
        r#"{"filters": [
            {"field": "email", "operator": "eq", "value": "a"},
            {"field": "active", "operator": "eq", "value": true}
        ], "logic": ""}"#,
    );
    let explicit = decode(
        r#"{"filters": [
            {"field": "email", "operator": "eq", "value": "a"},
            {"field": "active", "operator": "eq", "value": true}
        ], "logic": "and"}"#,
    );

    let expected = Some(Pred::And(vec![p("email eq a"), p("active eq true")]));
    assert_eq!(evaluate(&implicit, &registry, &combinators()).unwrap(), expected);
    assert_eq!(evaluate(&empty, &registry, &combinators()).unwrap(), expected);
    assert_eq!(evaluate(&explicit, &registry, &combinators()).unwrap(), expected);
}

#[test]
fn wrong_value_types_are_errors() {
    let registry = user_registry();

    let group = decode(r#"{"filters": [{"field": "email", "operator": "eq", "value": true}]}"#);
    assert!(matches!(
        evaluate(&group, &registry, &combinators()),
        Err(QueryError::TypeMismatch { expected: "string", actual: "bool", .. })
    ));

    let group = decode(r#"{"filters": [{"field": "email", "operator": "in", "value": ["a", 1]}]}"#);
    assert!(matches!(
        evaluate(&group, &registry, &combinators()),
        Err(QueryError::TypeMismatch { actual: "number", .. })
    ));

    let group = decode(r#"{"filters": [{"field": "active", "operator": "eq", "value": "true"}]}"#);
    assert!(evaluate(&group, &registry, &combinators()).is_err());
}

#[test]
fn bool_set_filters_from_the_wire() {
    let registry = user_registry();
    let always = Pred::Or(vec![p("active eq true"), p("active eq false")]);
    let never = Pred::And(vec![p("active eq true"), p("active eq false")]);

    let cases = [
        (r#"["in", [true, false]]"#, always.clone()),
        (r#"["in", [false, true]]"#, always.clone()),
        (r#"["in", []]"#, never.clone()),
        (r#"["in", [true]]"#, p("active eq true")),
        (r#"["nin", []]"#, always.clone()),
        (r#"["nin", [true, false]]"#, never.clone()),
        (r#"["nin", [false]]"#, p("active eq true")),
    ];

    for (case, expected) in cases {
        let (operator, value): (String, serde_json::Value) = serde_json::from_str(case).unwrap();
        let group = decode(
            &serde_json::json!({
                "filters": [{"field": "active", "operator": operator, "value": value}]
            })
            .to_string(),
        );
        assert_eq!(
            evaluate(&group, &registry, &combinators()).unwrap(),
            Some(expected),
            "case {case}"
        );
    }
}

#[test]
fn nullable_fields_use_their_nil_checks() {
    let group = decode(
        r#"{"filters": [
            {"field": "nickname", "operator": "null"},
            {"field": "created_at", "operator": "nnull"}
        ], "logic": "or"}"#,
    );
    let zero = "0001-01-01T00:00:00+00:00";
    assert_eq!(
        evaluate(&group, &user_registry(), &combinators()).unwrap(),
        Some(Pred::Or(vec![
            p("nickname is null"),
            Pred::Or(vec![
                p(&format!("created_at eq {zero}")),
                p(&format!("created_at ne {zero}")),
            ]),
        ]))
    );
}

#[test]
fn native_time_values_pass_through() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
    let group = FilterGroup::new().filter("created_at", Operator::Lt, at);
    assert_eq!(
        evaluate(&group, &user_registry(), &combinators()).unwrap(),
        Some(p("created_at lt 2024-03-01T09:15:00+00:00"))
    );
}

#[test]
fn time_set_filters_from_the_wire() {
    let registry = user_registry();
    let zero = "0001-01-01T00:00:00+00:00";

    let cases = [
        // A scalar is treated as a one-element list.
        (
            r#"["in", "2024-01-15"]"#,
            p("created_at in [2024-01-15T00:00:00+00:00]"),
        ),
        (
            r#"["nin", "2024-01-15T10:00:00+02:00"]"#,
            p("created_at nin [2024-01-15T08:00:00+00:00]"),
        ),
        (r#"["in", []]"#, p("created_at in []")),
        (r#"["nin", []]"#, p("created_at nin []")),
        // Lenient parsing substitutes per element.
        (
            r#"["in", ["2024-01-15", "junk"]]"#,
            Pred::Atom(format!("created_at in [2024-01-15T00:00:00+00:00,{zero}]")),
        ),
    ];

    for (case, expected) in cases {
        let (operator, value): (String, serde_json::Value) = serde_json::from_str(case).unwrap();
        let group = decode(
            &serde_json::json!({
                "filters": [{"field": "created_at", "operator": operator, "value": value}]
            })
            .to_string(),
        );
        assert_eq!(
            evaluate(&group, &registry, &combinators()).unwrap(),
            Some(expected),
            "case {case}"
        );
    }
}

#[test]
fn strict_time_sets_reject_unparseable_elements() {
    let group = decode(
        r#"{"filters": [{"field": "due_at", "operator": "in", "value": ["2024-01-15", "junk"]}]}"#,
    );
    assert!(matches!(
        evaluate(&group, &user_registry(), &combinators()),
        Err(QueryError::UnparseableTime { .. })
    ));
}

#[test]
fn explicit_nulls_on_the_wire_fall_back_to_defaults() {
    let group = decode(
        r#"{"filters": [
            {"field": "email", "operator": null, "value": "a"},
            {"field": "active", "operator": "eq", "value": true}
        ], "logic": null}"#,
    );
    assert_eq!(
        evaluate(&group, &user_registry(), &combinators()).unwrap(),
        Some(Pred::And(vec![p("email eq a"), p("active eq true")]))
    );

    let group = decode(r#"{"filters": null, "logic": "or"}"#);
    assert_eq!(evaluate(&group, &user_registry(), &combinators()).unwrap(), None);
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = Arc::new(user_registry());
    let combinators = combinators();

    thread::scope(|scope| {
        for i in 0..4 {
            let registry = Arc::clone(&registry);
            let combinators = combinators.clone();
            scope.spawn(move || {
                let email = format!("user{i}@example.com");
                let group = FilterGroup::new().filter("email", Operator::Eq, email.as_str());
                let result = evaluate(&group, &registry, &combinators).unwrap();
                assert_eq!(result, Some(Pred::Atom(format!("email eq {email}"))));
            });
        }
    });
}

// ============================================================================
// Full request pipeline
// ============================================================================

struct Columns;

impl OrderBuilder for Columns {
    type Order = String;

    fn asc(&self, field: &str) -> String {
        format!("{field} asc")
    }

    fn desc(&self, field: &str) -> String {
        format!("{field} desc")
    }
}

#[test]
fn request_pipeline_narrows_orders_and_pages() {
    let registry = user_registry();
    let combinators = combinators();
    let cfg = where_cfg();

    let group = decode(
        r#"{"filters": [
            {"field": "active", "operator": "eq", "value": true},
            {"field": "name", "operator": "startswith", "value": "jo"}
        ]}"#,
    );
    let query = apply_structured_filters(Query::default(), &cfg, &group, &registry, &combinators)
        .unwrap();

    let mut search_fields = SearchFields::new();
    search_fields.insert(
        "email".to_string(),
        atom(|v: String| Pred::Atom(format!("email ilike {v}"))),
    );
    let query = apply_search(query, &cfg, &search_fields, &combinators, "smith");
    let id_in = |ids: Vec<u64>| Pred::Atom(format!("id in {ids:?}"));
    let query = apply_ids(query, &cfg, id_in, vec![]);

    let sort_cfg = sort::Config::new(|mut q: Query, orders: Vec<String>| {
        q.orders.extend(orders);
        q
    });
    let sort_fields = SortFields::from([("created".to_string(), "created_at".to_string())]);
    let criteria: Vec<Criteria> =
        serde_json::from_str(r#"[{"field": "created", "order": "desc"}, {"field": "ghost"}]"#)
            .unwrap();
    let query = sort::apply_multiple(query, &sort_cfg, &sort_fields, &Columns, &criteria);

    let page_cfg = pagination::Config::new(
        |mut q: Query, n| {
            q.limit = Some(n);
            q
        },
        |mut q: Query, n| {
            q.offset = Some(n);
            q
        },
    );
    let query = pagination::apply(query, &page_cfg, 20, 40);

    assert_eq!(
        query,
        Query {
            wheres: vec![
                Pred::And(vec![p("active eq true"), p("name startswith jo")]),
                Pred::Or(vec![p("email ilike smith")]),
            ],
            orders: vec!["created_at desc".to_string()],
            limit: Some(20),
            offset: Some(40),
        }
    );
}

#[test]
fn custom_values_round_trip_through_json() {
    let group = FilterGroup::new()
        .filter("email", Operator::In, vec!["a", "b"])
        .filter("nickname", Operator::NotNull, FilterValue::Null)
        .filter("name", "fuzzy", "x");

    let json = serde_json::to_string(&group).unwrap();
    let decoded: FilterGroup = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, group);
}
