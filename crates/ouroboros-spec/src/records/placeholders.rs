//! Specs for unbound generic placeholders
//!
//! A field typed by a placeholder nobody bound accepts anything on its own.
//! Fields sharing one unbound placeholder must still agree: the first present
//! field fixes the runtime kind, and every other member must match it.

use crate::errors::{Path, Problem};
use crate::primitives::{AnyValue, IsInstance};
use crate::spec::{Conformed, Spec, Specification, INVALID};
use crate::types::Value;

/// Field-level spec for an unbound placeholder; accepts any value
#[derive(Debug, Clone)]
pub struct UnboundPlaceholder {
    name: String,
}

impl UnboundPlaceholder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Specification for UnboundPlaceholder {
    fn conform(&self, value: &Value) -> Conformed {
        AnyValue.conform(value)
    }

    fn explain(&self, _this: &Spec, _path: &Path, _value: &Value) -> Vec<Problem> {
        Vec::new()
    }

    fn describe(&self) -> String {
        format!("any ~{} (unbound)", self.name)
    }
}

/// Fields whose declared kind is the same unbound placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderGroup {
    pub placeholder: String,
    pub fields: Vec<String>,
}

/// Record-level check that each placeholder group agrees on a runtime kind
#[derive(Debug, Clone)]
pub struct PlaceholderConsistency {
    groups: Vec<PlaceholderGroup>,
}

impl PlaceholderConsistency {
    pub fn new(groups: Vec<PlaceholderGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[PlaceholderGroup] {
        &self.groups
    }

    /// The implied spec for one group: the kind of its first present member
    fn implied(group: &PlaceholderGroup, value: &Value) -> Spec {
        group
            .fields
            .iter()
            .find_map(|f| value.get(f))
            .map(|first| Spec::new(IsInstance::new(first.kind())))
            .unwrap_or_else(|| Spec::new(AnyValue))
    }

    fn present<'a>(
        group: &'a PlaceholderGroup,
        value: &'a Value,
    ) -> impl Iterator<Item = (&'a str, &'a Value)> {
        group
            .fields
            .iter()
            .filter_map(move |f| value.get(f).map(|v| (f.as_str(), v)))
    }
}

impl Specification for PlaceholderConsistency {
    fn conform(&self, value: &Value) -> Conformed {
        let Value::Object(pairs) = value else {
            return INVALID;
        };
        let mut result = pairs.clone();
        for group in &self.groups {
            let implied = Self::implied(group, value);
            for (field, present) in Self::present(group, value) {
                let Conformed::Valid(conformed) = implied.conform(present) else {
                    return INVALID;
                };
                if let Some(slot) = result.iter_mut().find(|(k, _)| k == field) {
                    slot.1 = conformed;
                }
            }
        }
        Conformed::Valid(Value::Object(result))
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        if !matches!(value, Value::Object(_)) {
            let reason = format!("not a dictionary ({})", value.type_name());
            return vec![Problem::new(path.clone(), value.clone(), this.clone(), reason)];
        }
        let mut problems = Vec::new();
        for group in &self.groups {
            let implied = Self::implied(group, value);
            for (field, present) in Self::present(group, value) {
                problems.extend(implied.explain(&path.child(field), present));
            }
        }
        problems
    }

    fn describe(&self) -> String {
        let groups: Vec<String> = self
            .groups
            .iter()
            .map(|g| format!("~{}: [{}]", g.placeholder, g.fields.join(", ")))
            .collect();
        format!("consistent placeholders {{{}}}", groups.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use crate::types::ValueKind;

    fn consistency() -> Spec {
        Spec::new(PlaceholderConsistency::new(vec![PlaceholderGroup {
            placeholder: "V".to_string(),
            fields: vec!["a".to_string(), "b".to_string()],
        }]))
    }

    #[test]
    fn test_unbound_accepts_anything() {
        let s = Spec::new(UnboundPlaceholder::new("T"));
        assert!(s.conform(&Value::from("x")).is_valid());
        assert!(s.explain(&Path::root(), &Value::Null).is_empty());
        assert_eq!(s.describe(), "any ~T (unbound)");
    }

    #[test]
    fn test_first_present_field_fixes_kind() {
        let s = consistency();
        let ok = Value::object([("a", Value::Int(1)), ("b", Value::Int(2))]);
        assert_eq!(s.conform(&ok), Conformed::Valid(ok.clone()));

        let bad = Value::object([("a", Value::Int(1)), ("b", Value::from("x"))]);
        assert!(s.conform(&bad).is_invalid());
        let problems = s.explain(&Path::root(), &bad);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].path, path!["b"]);
        assert_eq!(problems[0].spec, Spec::new(IsInstance::new(ValueKind::Int)));
    }

    #[test]
    fn test_absent_members_are_unconstrained() {
        let s = consistency();
        let only_b = Value::object([("b", Value::from("x"))]);
        assert!(s.conform(&only_b).is_valid());
        assert!(s.conform(&Value::object([("c", Value::Int(1))])).is_valid());
    }
}
