//! Union and intersection specs

use crate::errors::{Path, Problem};
use crate::spec::{Conformed, Spec, Specification, INVALID};
use crate::types::Value;

fn describe_all(prefix: &str, specs: &[Spec]) -> String {
    let parts: Vec<String> = specs.iter().map(Spec::describe).collect();
    format!("{} [{}]", prefix, parts.join(", "))
}

// ============================================================================
// OneOf
// ============================================================================

/// The first alternative that conforms wins
///
/// Explain does not short-circuit: every failing alternative contributes its
/// problems.
pub struct OneOf {
    specs: Vec<Spec>,
}

impl OneOf {
    pub fn new(specs: Vec<Spec>) -> Self {
        Self { specs }
    }
}

impl Specification for OneOf {
    fn conform(&self, value: &Value) -> Conformed {
        self.specs
            .iter()
            .map(|s| s.conform(value))
            .find(Conformed::is_valid)
            .unwrap_or(INVALID)
    }

    fn explain(&self, _this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        if self.conform(value).is_valid() {
            return Vec::new();
        }
        self.specs
            .iter()
            .flat_map(|s| s.explain(path, value))
            .collect()
    }

    fn describe(&self) -> String {
        describe_all("one of", &self.specs)
    }
}

// ============================================================================
// AllOf
// ============================================================================

/// Threads the value through every spec in order
///
/// Each stage receives the previous stage's conformed output. Explain replays
/// the same walk and reports only the first failing stage.
pub struct AllOf {
    specs: Vec<Spec>,
}

impl AllOf {
    pub fn new(specs: Vec<Spec>) -> Self {
        Self { specs }
    }
}

impl Specification for AllOf {
    fn conform(&self, value: &Value) -> Conformed {
        let mut current = value.clone();
        for spec in &self.specs {
            match spec.conform(&current) {
                Conformed::Valid(next) => current = next,
                Conformed::Invalid => return INVALID,
            }
        }
        Conformed::Valid(current)
    }

    fn explain(&self, _this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        let mut current = value.clone();
        for spec in &self.specs {
            match spec.conform(&current) {
                Conformed::Valid(next) => current = next,
                Conformed::Invalid => return spec.explain(path, &current),
            }
        }
        Vec::new()
    }

    fn describe(&self) -> String {
        describe_all("all of", &self.specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{Coerce, Coercer};
    use crate::primitives::{even, gt, IsInstance};
    use crate::types::ValueKind;

    fn int() -> Spec {
        Spec::new(IsInstance::new(ValueKind::Int))
    }

    fn string() -> Spec {
        Spec::new(IsInstance::new(ValueKind::String))
    }

    #[test]
    fn test_one_of_tries_in_order() {
        let doubled = Spec::new(Coerce::new(
            Coercer::new("double", |v| match v {
                Value::Int(n) => Ok(Value::Int(n * 2)),
                _ => anyhow::bail!("not an int"),
            }),
            int(),
        ));
        let s = Spec::new(OneOf::new(vec![doubled, int()]));
        assert_eq!(s.conform(&Value::Int(2)), Conformed::Valid(Value::Int(4)));
    }

    #[test]
    fn test_one_of_explains_every_branch() {
        let s = Spec::new(OneOf::new(vec![int(), string()]));
        let problems = s.explain(&Path::root(), &Value::Null);
        assert_eq!(problems.len(), 2);
        assert!(s.conform(&Value::Null).is_invalid());
        assert!(s.explain(&Path::root(), &Value::from("x")).is_empty());
    }

    #[test]
    fn test_all_of_reports_first_failing_stage() {
        let first = gt(0);
        let second = even();
        let s = Spec::new(AllOf::new(vec![first.clone(), second.clone()]));

        let problems = s.explain(&Path::root(), &Value::Int(3));
        assert_eq!(problems.len(), 1);
        assert!(problems[0].spec.same_instance(&second));

        let problems = s.explain(&Path::root(), &Value::Int(-3));
        assert_eq!(problems.len(), 1);
        assert!(problems[0].spec.same_instance(&first));
    }

    #[test]
    fn test_all_of_feeds_conformed_output_forward() {
        let to_int = Spec::new(Coerce::new(
            Coercer::new("parse", |v| match v {
                Value::String(s) => Ok(Value::Int(s.parse()?)),
                other => Ok(other.clone()),
            }),
            int(),
        ));
        let s = Spec::new(AllOf::new(vec![to_int, even()]));
        assert_eq!(s.conform(&Value::from("4")), Conformed::Valid(Value::Int(4)));

        let problems = s.explain(&Path::root(), &Value::from("3"));
        assert_eq!(problems[0].value, Value::Int(3));
    }
}
