//! Behavior of hand-built specs

mod support;

use ouroboros_spec::coercions::{self, coerce_int};
use ouroboros_spec::*;
use support::{check_conforms_to, check_problems, check_valid};

fn problem(path: Path, value: impl Into<Value>, spec: &Spec, reason: &str) -> Problem {
    Problem::new(path, value.into(), spec.clone(), reason)
}

// ============================================================================
// Primitive Specs
// ============================================================================

#[test]
fn test_any() {
    let s = any_();
    check_valid(&s, Value::Int(1));
    check_valid(&s, Value::Null);
    check_valid(&s, Value::from(""));
}

#[test]
fn test_never() {
    let s = never();
    check_problems(&s, Value::Int(1), vec![problem(path![], 1, &s, "this spec will always fail")]);
}

#[test]
fn test_equal_to() {
    let s = equal_to(1);
    check_valid(&s, Value::Int(1));
    check_problems(
        &s,
        Value::Int(2),
        vec![problem(path![], 2, &s, "expected 1 (integer) but got 2 (integer)")],
    );
    assert_eq!(equal_to(1), equal_to(1));
    assert_ne!(equal_to(1), equal_to(2));
}

#[test]
fn test_is_instance() {
    let s = is_instance(ValueKind::Int);
    check_valid(&s, Value::Int(1));
    check_problems(
        &s,
        Value::from(""),
        vec![problem(path![], "", &s, "expected an integer but got a string")],
    );
    assert_eq!(is_instance(ValueKind::Int), is_instance(ValueKind::Int));
}

#[test]
fn test_kinds_as_specs() {
    let s = specize(ValueKind::Int).unwrap();
    check_valid(&s, Value::Int(1));
    check_problems(
        &s,
        Value::from(""),
        vec![problem(path![], "", &is_instance(ValueKind::Int), "expected an integer but got a string")],
    );
}

#[test]
fn test_even_and_odd() {
    let s = even();
    check_valid(&s, Value::Int(2));
    check_problems(&s, Value::Int(3), vec![problem(path![], 3, &s, "not an even number")]);
    check_problems(&s, Value::from(""), vec![problem(path![], "", &s, "not an even number")]);

    let s = odd();
    check_valid(&s, Value::Int(3));
    check_problems(&s, Value::Int(4), vec![problem(path![], 4, &s, "not an odd number")]);
}

#[test]
fn test_is_none() {
    let s = is_none();
    check_valid(&s, Value::Null);
    check_problems(&s, Value::from(""), vec![problem(path![], "", &s, "not null")]);
    check_problems(&s, Value::list([]), vec![problem(path![], Value::list([]), &s, "not null")]);
}

#[test]
fn test_in_range() {
    let s = in_range(2, Some(Value::Int(4)));
    check_valid(&s, Value::Int(2));
    check_valid(&s, Value::Int(3));
    check_valid(&s, Value::Float(3.5));
    check_problems(&s, Value::Int(1), vec![problem(path![], 1, &s, "not between 2 and 4")]);
    check_problems(&s, Value::Int(4), vec![problem(path![], 4, &s, "not between 2 and 4")]);

    let unbounded = in_range(2, None);
    check_valid(&unbounded, Value::Int(i64::MAX));
}

#[test]
fn test_comparisons() {
    let s = gt(2);
    check_valid(&s, Value::Int(3));
    check_problems(&s, Value::Int(2), vec![problem(path![], 2, &s, "not greater than 2")]);

    let s = lt(2);
    check_valid(&s, Value::Int(1));
    check_problems(&s, Value::Int(2), vec![problem(path![], 2, &s, "not less than 2")]);

    let s = lte(2);
    check_valid(&s, Value::Int(2));
    check_problems(&s, Value::Int(3), vec![problem(path![], 3, &s, "not less than or equal to 2")]);

    let s = gte(2);
    check_valid(&s, Value::Int(2));
    check_problems(&s, Value::Int(1), vec![problem(path![], 1, &s, "not greater than or equal to 2")]);

    // values that cannot be ordered against the bound are simply rejected
    check_problems(
        &s,
        Value::from("three"),
        vec![problem(path![], "three", &s, "not greater than or equal to 2")],
    );
}

#[test]
fn test_matches() {
    let s = matches(r"^\d{3}-\d{4}$").unwrap();
    check_valid(&s, Value::from("555-1234"));
    check_problems(
        &s,
        Value::from("5551234"),
        vec![problem(path![], "5551234", &s, r"not a string matching ^\d{3}-\d{4}$")],
    );
    assert!(matches!(matches("("), Err(SpecError::InvalidPattern { .. })));
}

// ============================================================================
// Predicates
// ============================================================================

fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

#[test]
fn test_specizing_named_function() {
    let s = specize(Speccable::predicate(truthy)).unwrap();
    check_valid(&s, Value::Bool(true));

    let explanation = explain_data(&s, &Value::Bool(false)).unwrap();
    assert_eq!(explanation.problems()[0].reason, "not truthy");
    assert_eq!(explanation.problems()[0].value, Value::Bool(false));
    assert_eq!(explanation.problems()[0].path, path![]);
}

#[test]
fn test_specizing_closure() {
    let s = specize(Speccable::predicate(|v: &Value| truthy(v))).unwrap();
    check_valid(&s, Value::Bool(true));
    let explanation = explain_data(&s, &Value::Bool(false)).unwrap();
    assert_eq!(explanation.problems()[0].reason, "not a closure");
}

#[test]
fn test_panicking_predicate_is_a_rejection() {
    let s = predicate("a short string", |v| match v {
        Value::String(s) => s.len() < 4,
        other => panic!("cannot measure {}", other),
    });
    check_valid(&s, Value::from("abc"));
    check_problems(&s, Value::Int(1), vec![problem(path![], 1, &s, "not a short string")]);
}

#[test]
fn test_custom_predicate_explanation() {
    let s = Spec::new(
        Predicate::new("positive", |v| matches!(v, Value::Int(n) if *n > 0))
            .with_explain(|v| format!("{} is not positive", v)),
    );
    check_problems(&s, Value::Int(-1), vec![problem(path![], -1, &s, "-1 is not positive")]);
}

// ============================================================================
// Set Membership
// ============================================================================

#[test]
fn test_sets() {
    let s = specize(Speccable::set(["b", "a"])).unwrap();
    check_valid(&s, Value::from("a"));
    check_valid(&s, Value::from("b"));
    check_problems(&s, Value::from("c"), vec![problem(path![], "c", &s, r#"not in ["a", "b"]"#)]);
}

#[test]
fn test_is_in_equals_equivalent_set() {
    let s = is_in(["a", "b", "a"]);
    check_problems(
        &s,
        Value::from("c"),
        vec![problem(path![], "c", &specize(Speccable::set(["a", "b"])).unwrap(), r#"not in ["a", "b"]"#)],
    );
}

// ============================================================================
// Coercion
// ============================================================================

#[test]
fn test_coerce() {
    let underlying = in_range(1, Some(Value::Int(2)));
    let s = coerce(Coercer::from_fn(coerce_int), &underlying).unwrap();

    check_valid(&s, Value::Int(1));
    check_conforms_to(&s, Value::from("1"), Value::Int(1));

    // a delegate failure is reported by the delegate, against the coerced value
    check_problems(&s, Value::Int(2), vec![problem(path![], 2, &underlying, "not between 1 and 2")]);
    check_problems(&s, Value::from("2"), vec![problem(path![], 2, &underlying, "not between 1 and 2")]);

    check_problems(
        &s,
        Value::from("one"),
        vec![problem(
            path![],
            "one",
            &s,
            "could not coerce 'one' (string) using coercer: coerce_int because:\ninvalid digit found in string",
        )],
    );
}

#[test]
fn test_coerce_with_closure_and_custom_failure() {
    let closure = coerce(
        Coercer::from_fn(|v: &Value| coerce_int(v)),
        ValueKind::Int,
    )
    .unwrap();
    let explanation = explain_data(&closure, &Value::from("x")).unwrap();
    let reason = &explanation.problems()[0].reason;
    assert!(reason.contains("using coercer: <closure> because:"), "{}", reason);

    let custom = Spec::new(
        Coerce::new(Coercer::from_fn(coerce_int), is_instance(ValueKind::Int))
            .with_explain_failure(|v, _| format!("{} is not a number", v)),
    );
    check_problems(
        &custom,
        Value::from("x"),
        vec![problem(path![], "x", &custom, "\"x\" is not a number")],
    );
}

#[test]
fn test_stock_coercers() {
    check_conforms_to(
        &coercions::uuid(),
        Value::from("80B71E04-9862-462B-AC0C-0C34DC272C7B"),
        Value::from("80b71e04-9862-462b-ac0c-0c34dc272c7b"),
    );
    assert!(is_invalid(&coercions::uuid(), &Value::from("nope")));

    let parsed = assert_spec(&coercions::url(), &Value::from("https://example.com:8443/a?b=c#d")).unwrap();
    assert_eq!(parsed.get("port"), Some(&Value::Int(8443)));
    assert_eq!(parsed.get("path"), Some(&Value::from("/a")));
    assert_eq!(parsed.get("query"), Some(&Value::from("b=c")));
    assert_eq!(parsed.get("fragment"), Some(&Value::from("d")));
}

// ============================================================================
// Assert
// ============================================================================

#[test]
fn test_assert() {
    let s = specize(ValueKind::Int).unwrap();
    assert_eq!(assert_spec(&s, &Value::Int(1)), Ok(Value::Int(1)));

    let violation = assert_spec(&s, &Value::from("one")).unwrap_err();
    assert_eq!(
        violation.explanation,
        Explanation::with_problems([problem(path![], "one", &s, "expected an integer but got a string")])
    );
    assert_eq!(violation.value, Value::from("one"));
    assert!(violation.to_string().contains("expected an integer but got a string"));
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn test_one_of_explains_every_failing_branch() {
    let int = is_instance(ValueKind::Int);
    let string = is_instance(ValueKind::String);
    let s = one_of([&int, &string]).unwrap();

    check_valid(&s, Value::Int(1));
    check_valid(&s, Value::from("x"));
    check_problems(
        &s,
        Value::Null,
        vec![
            problem(path![], Value::Null, &int, "expected an integer but got a null"),
            problem(path![], Value::Null, &string, "expected a string but got a null"),
        ],
    );
}

#[test]
fn test_all_of_threads_conformed_values() {
    let parse = coerce(Coercer::from_fn(coerce_int), ValueKind::Int).unwrap();
    let small = lt(10);
    let s = all_of([&parse, &even(), &small]).unwrap();

    check_conforms_to(&s, Value::from("4"), Value::Int(4));

    // the failing stage reports against the value it received
    check_problems(&s, Value::from("12"), vec![problem(path![], 12, &small, "not less than 10")]);
}

#[test]
fn test_all_of_explains_only_the_first_failing_stage() {
    let first = gt(5);
    let s = all_of([&first, &even()]).unwrap();
    check_problems(&s, Value::Int(3), vec![problem(path![], 3, &first, "not greater than 5")]);
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_coll_of() {
    let item = specize(ValueKind::Int).unwrap();
    let s = coll_of(&item).unwrap();

    check_valid(&s, Value::list([Value::Int(1)]));
    check_valid(&s, Value::list([Value::Int(1), Value::Int(2)]));
    check_valid(&s, Value::Tuple(vec![Value::Int(1), Value::Int(2)]));
    check_valid(&s, Value::list([]));

    check_problems(
        &s,
        Value::list([Value::from("one"), Value::Int(2), Value::from("three")]),
        vec![
            problem(path![0usize], "one", &item, "expected an integer but got a string"),
            problem(path![2usize], "three", &item, "expected an integer but got a string"),
        ],
    );
    check_problems(&s, Value::Int(1), vec![problem(path![], 1, &s, "not iterable")]);
}

#[test]
fn test_nested_paths_accumulate() {
    let item = specize(ValueKind::Int).unwrap();
    let s = dict_spec([("rows", coll_of(&item).unwrap())]).unwrap();
    let value = Value::object([("rows", Value::list([Value::Int(1), Value::from("x")]))]);
    check_problems(
        &s,
        value,
        vec![problem(path!["rows", 1usize], "x", &item, "expected an integer but got a string")],
    );
}

// ============================================================================
// Dictionaries
// ============================================================================

#[test]
fn test_dict_spec() {
    let int = is_instance(ValueKind::Int);
    let s = dict_spec([("k", &int)]).unwrap();

    check_valid(&s, Value::object([("k", Value::Int(1))]));
    check_problems(
        &s,
        Value::object([("v", Value::Int(1))]),
        vec![problem(path!["k"], Value::Null, &s, "missing required key 'k'")],
    );
    check_problems(
        &s,
        Value::object([("k", Value::from("x"))]),
        vec![problem(path!["k"], "x", &int, "expected an integer but got a string")],
    );
    check_problems(&s, Value::Int(1), vec![problem(path![], 1, &s, "not a dictionary (integer)")]);
}

#[test]
fn test_empty_dict_spec_accepts_any_dictionary() {
    let s = dict_spec(Vec::<(String, Spec)>::new()).unwrap();
    check_valid(&s, Value::Object(vec![]));
    check_conforms_to(&s, Value::object([("k", Value::Int(1))]), Value::Object(vec![]));
}

#[test]
fn test_dict_spec_extra_keys() {
    let keys = || vec![("k".to_string(), is_instance(ValueKind::Int))];
    let value = Value::object([("k", Value::Int(1)), ("x", Value::Bool(true))]);

    let ignore = Spec::new(DictSpec::new(keys()));
    check_conforms_to(&ignore, value.clone(), Value::object([("k", Value::Int(1))]));

    let allow = Spec::new(DictSpec::new(keys()).extra(ExtraFields::Allow));
    check_valid(&allow, value.clone());

    let forbid = Spec::new(DictSpec::new(keys()).extra(ExtraFields::Forbid));
    check_problems(
        &forbid,
        value,
        vec![problem(path!["x"], true, &forbid, "unexpected key 'x'")],
    );
}

#[test]
fn test_dict_spec_returns_conformed_values() {
    let s = dict_spec([("k", coercions::uuid())]).unwrap();
    check_conforms_to(
        &s,
        Value::object([("k", Value::from("80B71E04-9862-462B-AC0C-0C34DC272C7B"))]),
        Value::object([("k", Value::from("80b71e04-9862-462b-ac0c-0c34dc272c7b"))]),
    );
}

#[test]
fn test_dict_example_treats_values_as_equal_to_spec() {
    let expected = Value::from("80b71e04-9862-462b-ac0c-0c34dc272c7b");
    let wrong = Value::from("a5bef1a0-d139-49d3-91ff-79a69aa39759");
    let s = dict_example([("k", expected.clone())]);

    check_valid(&s, Value::object([("k", expected.clone())]));
    check_problems(
        &s,
        Value::object([("k", wrong.clone())]),
        vec![problem(
            path!["k"],
            wrong,
            &equal_to(expected),
            "expected \"80b71e04-9862-462b-ac0c-0c34dc272c7b\" (string) but got \"a5bef1a0-d139-49d3-91ff-79a69aa39759\" (string)",
        )],
    );
}

#[test]
fn test_dict_example_treats_dict_values_as_more_dict_examples() {
    let s = dict_example([("j", Value::object([("k", Value::Int(1))]))]);
    check_valid(&s, Value::object([("j", Value::object([("k", Value::Int(1))]))]));
    check_problems(
        &s,
        Value::object([("j", Value::object([("k", Value::Int(2))]))]),
        vec![problem(path!["j", "k"], 2, &equal_to(1), "expected 1 (integer) but got 2 (integer)")],
    );
}

// ============================================================================
// Factory
// ============================================================================

#[test]
fn test_unspeccable_values_are_rejected_at_construction() {
    let err = specize(Value::from("x")).unwrap_err();
    assert_eq!(err.to_string(), "don't know how to turn a string into a spec: \"x\"");
    assert!(coll_of(Value::Int(1)).is_err());
    assert!(dict_spec([("k", Value::Float(1.5))]).is_err());
}

#[test]
fn test_decorated_overrides_description_only() {
    let s = decorated(ValueKind::Int, Some("a count")).unwrap();
    assert_eq!(describe(&s), "a count");
    check_valid(&s, Value::Int(3));
    check_problems(
        &s,
        Value::from("x"),
        vec![problem(path![], "x", &is_instance(ValueKind::Int), "expected an integer but got a string")],
    );
}
