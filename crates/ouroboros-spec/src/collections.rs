//! Collection and dictionary specs

use crate::config::ExtraFields;
use crate::errors::{Path, Problem};
use crate::spec::{Conformed, Spec, Specification, INVALID};
use crate::types::Value;

// ============================================================================
// CollOf
// ============================================================================

/// Every element of a list or tuple conforms to one item spec
///
/// Conform is all-or-nothing and keeps the container's character: a tuple
/// conforms to a tuple, a list to a list.
pub struct CollOf {
    item: Spec,
}

impl CollOf {
    pub fn new(item: Spec) -> Self {
        Self { item }
    }
}

impl Specification for CollOf {
    fn conform(&self, value: &Value) -> Conformed {
        let Some(items) = value.items() else {
            return INVALID;
        };

        let mut conformed = Vec::with_capacity(items.len());
        for item in items {
            match self.item.conform(item) {
                Conformed::Valid(v) => conformed.push(v),
                Conformed::Invalid => return INVALID,
            }
        }

        match value {
            Value::Tuple(_) => Conformed::Valid(Value::Tuple(conformed)),
            _ => Conformed::Valid(Value::List(conformed)),
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        let Some(items) = value.items() else {
            return vec![Problem::new(path.clone(), value.clone(), this.clone(), "not iterable")];
        };

        items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| self.item.explain(&path.child(i), item))
            .collect()
    }

    fn describe(&self) -> String {
        format!("a collection where items are {}", self.item.describe())
    }
}

// ============================================================================
// DictSpec
// ============================================================================

/// A fixed mapping from required keys to the specs their values must satisfy
pub struct DictSpec {
    keys: Vec<(String, Spec)>,
    extra: ExtraFields,
}

impl DictSpec {
    pub fn new(keys: Vec<(String, Spec)>) -> Self {
        Self {
            keys,
            extra: ExtraFields::default(),
        }
    }

    /// Set how undeclared keys are treated
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(k, _)| k.as_str())
    }

    fn is_declared(&self, key: &str) -> bool {
        self.keys.iter().any(|(k, _)| k == key)
    }
}

impl Specification for DictSpec {
    fn conform(&self, value: &Value) -> Conformed {
        let Value::Object(pairs) = value else {
            return INVALID;
        };

        let mut result = Vec::with_capacity(self.keys.len());
        for (key, spec) in &self.keys {
            let Some(present) = value.get(key) else {
                return INVALID;
            };
            match spec.conform(present) {
                Conformed::Valid(v) => result.push((key.clone(), v)),
                Conformed::Invalid => return INVALID,
            }
        }

        for (key, extra_value) in pairs {
            if self.is_declared(key) {
                continue;
            }
            match self.extra {
                ExtraFields::Ignore => {}
                ExtraFields::Allow => result.push((key.clone(), extra_value.clone())),
                ExtraFields::Forbid => return INVALID,
            }
        }

        Conformed::Valid(Value::Object(result))
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        let Value::Object(pairs) = value else {
            let reason = format!("not a dictionary ({})", value.type_name());
            return vec![Problem::new(path.clone(), value.clone(), this.clone(), reason)];
        };

        let mut problems = Vec::new();
        for (key, spec) in &self.keys {
            let key_path = path.child(key.as_str());
            match value.get(key) {
                Some(present) => problems.extend(spec.explain(&key_path, present)),
                None => problems.push(Problem::new(
                    key_path,
                    Value::Null,
                    this.clone(),
                    format!("missing required key '{}'", key),
                )),
            }
        }

        if self.extra == ExtraFields::Forbid {
            for (key, extra_value) in pairs {
                if !self.is_declared(key) {
                    problems.push(Problem::new(
                        path.child(key.as_str()),
                        extra_value.clone(),
                        this.clone(),
                        format!("unexpected key '{}'", key),
                    ));
                }
            }
        }

        problems
    }

    fn describe(&self) -> String {
        let fields: Vec<String> = self
            .keys
            .iter()
            .map(|(k, s)| format!("{:?}: {}", k, s.describe()))
            .collect();
        format!("Dict: {{{}}}", fields.join(", "))
    }
}
