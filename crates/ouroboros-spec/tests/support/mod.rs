//! Shared assertions for spec integration tests

#![allow(dead_code)]

use ouroboros_spec::{conform, explain_data, Conformed, Explanation, Path, PathElement, Problem, Spec, Value};

const PATH_MARKER: &str = "added_by_check_spec";

/// Install a test subscriber so `RUST_LOG`-style debug output shows up with `--nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

fn check(spec: &Spec, value: &Value, expected_problems: Vec<Problem>, expected_conform: Conformed) {
    let expected_explanation = if expected_problems.is_empty() {
        None
    } else {
        Some(Explanation::with_problems(expected_problems))
    };

    let explanation = explain_data(spec, value);
    assert_eq!(
        explanation, expected_explanation,
        "\nexpected:\n{:?}\n\nbut was:\n{:?}",
        expected_explanation, explanation
    );

    let conformed = conform(spec, value);
    assert_eq!(conformed, expected_conform, "\nexpected:\n{}\n\nbut was:\n{}", expected_conform, conformed);

    assert_eq!(
        explanation.is_none(),
        conformed.is_valid(),
        "explain and conform disagree for {}",
        value
    );

    let prefix = Path::root().child(PATH_MARKER);
    for problem in spec.explain(&prefix, value) {
        assert!(
            problem.path.elements().first() == Some(&PathElement::Key(PATH_MARKER.to_string())),
            "spec {} might not be extending paths correctly in explain",
            spec
        );
    }
}

/// The value conforms to itself
pub fn check_valid(spec: &Spec, value: Value) {
    let expected = Conformed::Valid(value.clone());
    check(spec, &value, Vec::new(), expected);
}

/// The value conforms to `expected`
pub fn check_conforms_to(spec: &Spec, value: Value, expected: Value) {
    check(spec, &value, Vec::new(), Conformed::Valid(expected));
}

/// The value is rejected with exactly these problems
pub fn check_problems(spec: &Spec, value: Value, problems: Vec<Problem>) {
    assert!(!problems.is_empty(), "expected problems must not be empty");
    check(spec, &value, problems, Conformed::Invalid);
}

/// The value is rejected and the rendered violation mentions `text`
pub fn check_spec_error(spec: &Spec, value: Value, text: &str) {
    match ouroboros_spec::assert_spec(spec, &value) {
        Ok(conformed) => panic!("expected a violation but {} conformed to {}", value, conformed),
        Err(violation) => {
            let rendered = violation.to_string();
            assert!(rendered.contains(text), "{:?} does not mention {:?}", rendered, text);
        }
    }
}
