//! Primitive and leaf specs
//!
//! Equality, type membership, predicates, set membership, the always-pass and
//! always-fail specs, and description overrides.

use std::sync::Arc;

use regex::Regex;

use crate::errors::{Path, Problem, SpecError};
use crate::spec::{Conformed, Spec, SpecIdentity, Specification, INVALID};
use crate::types::{Value, ValueKind};
use crate::util::{a_or_an, guarded};

/// Boolean check wrapped by a [`Predicate`]
pub type CheckFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Reason builder used when a [`Predicate`] rejects a value
pub type ExplainFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

// ============================================================================
// Any / Never
// ============================================================================

/// Conforms every value to itself
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl Specification for AnyValue {
    fn conform(&self, value: &Value) -> Conformed {
        Conformed::Valid(value.clone())
    }

    fn explain(&self, _this: &Spec, _path: &Path, _value: &Value) -> Vec<Problem> {
        Vec::new()
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }
}

/// Rejects every value
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

const NEVER_REASON: &str = "this spec will always fail";

impl Specification for Never {
    fn conform(&self, _value: &Value) -> Conformed {
        INVALID
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        vec![Problem::new(path.clone(), value.clone(), this.clone(), NEVER_REASON)]
    }

    fn describe(&self) -> String {
        NEVER_REASON.to_string()
    }
}

// ============================================================================
// Predicate
// ============================================================================

/// Wraps a boolean check with a static description
///
/// Unless overridden, a rejected value is explained as `not {description}`.
/// A check that panics counts as a rejection.
#[derive(Clone)]
pub struct Predicate {
    description: String,
    check: CheckFn,
    explain: Option<ExplainFn>,
}

impl Predicate {
    pub fn new(
        description: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            check: Arc::new(check),
            explain: None,
        }
    }

    /// Replace the default `not {description}` reason
    pub fn with_explain(mut self, explain: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.explain = Some(Arc::new(explain));
        self
    }

    fn passes(&self, value: &Value) -> bool {
        guarded(|| (self.check)(value)).unwrap_or(false)
    }

    fn reason(&self, value: &Value) -> String {
        match &self.explain {
            Some(explain) => guarded(|| explain(value))
                .unwrap_or_else(|panic| format!("not {} ({})", self.description, panic)),
            None => format!("not {}", self.description),
        }
    }
}

impl Specification for Predicate {
    fn conform(&self, value: &Value) -> Conformed {
        if self.passes(value) {
            Conformed::Valid(value.clone())
        } else {
            INVALID
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        if self.passes(value) {
            return Vec::new();
        }
        vec![Problem::new(path.clone(), value.clone(), this.clone(), self.reason(value))]
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

// ============================================================================
// Equality / Type Membership
// ============================================================================

/// Accepts exactly one value
#[derive(Debug, Clone)]
pub struct EqualTo {
    expected: Value,
}

impl EqualTo {
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Specification for EqualTo {
    fn conform(&self, value: &Value) -> Conformed {
        if value.loose_eq(&self.expected) {
            Conformed::Valid(value.clone())
        } else {
            INVALID
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        if value.loose_eq(&self.expected) {
            return Vec::new();
        }
        let reason = format!(
            "expected {} ({}) but got {} ({})",
            self.expected,
            self.expected.type_name(),
            value,
            value.type_name()
        );
        vec![Problem::new(path.clone(), value.clone(), this.clone(), reason)]
    }

    fn describe(&self) -> String {
        self.expected.to_string()
    }

    fn identity(&self) -> Option<SpecIdentity> {
        Some(SpecIdentity::EqualTo(self.expected.clone()))
    }
}

/// Accepts values of one runtime kind
#[derive(Debug, Clone, Copy)]
pub struct IsInstance {
    kind: ValueKind,
}

impl IsInstance {
    pub fn new(kind: ValueKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl Specification for IsInstance {
    fn conform(&self, value: &Value) -> Conformed {
        if value.kind() == self.kind {
            Conformed::Valid(value.clone())
        } else {
            INVALID
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        if value.kind() == self.kind {
            return Vec::new();
        }
        let reason = format!(
            "expected {} but got {}",
            self.describe(),
            a_or_an(value.type_name())
        );
        vec![Problem::new(path.clone(), value.clone(), this.clone(), reason)]
    }

    fn describe(&self) -> String {
        a_or_an(self.kind.name())
    }

    fn identity(&self) -> Option<SpecIdentity> {
        Some(SpecIdentity::IsInstance(self.kind))
    }
}

// ============================================================================
// Set Membership
// ============================================================================

/// Accepts any value from a fixed set
///
/// The set is kept sorted so descriptions are deterministic.
#[derive(Debug, Clone)]
pub struct IsIn {
    members: Vec<Value>,
}

impl IsIn {
    pub fn new(members: impl IntoIterator<Item = Value>) -> Self {
        let mut sorted: Vec<Value> = Vec::new();
        for member in members {
            if !sorted.iter().any(|m| m.loose_eq(&member)) {
                sorted.push(member);
            }
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self { members: sorted }
    }

    fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|m| m.loose_eq(value))
    }
}

impl Specification for IsIn {
    fn conform(&self, value: &Value) -> Conformed {
        if self.contains(value) {
            Conformed::Valid(value.clone())
        } else {
            INVALID
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        if self.contains(value) {
            return Vec::new();
        }
        let reason = format!("not {}", self.describe());
        vec![Problem::new(path.clone(), value.clone(), this.clone(), reason)]
    }

    fn describe(&self) -> String {
        format!("in {}", Value::List(self.members.clone()))
    }

    fn identity(&self) -> Option<SpecIdentity> {
        Some(SpecIdentity::IsIn(self.members.clone()))
    }
}

// ============================================================================
// Decorated
// ============================================================================

/// Delegates everything but the description
pub struct Decorated {
    delegate: Spec,
    description: Option<String>,
}

impl Decorated {
    pub fn new(delegate: Spec, description: Option<String>) -> Self {
        Self {
            delegate,
            description,
        }
    }
}

impl Specification for Decorated {
    fn conform(&self, value: &Value) -> Conformed {
        self.delegate.conform(value)
    }

    fn explain(&self, _this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        self.delegate.explain(path, value)
    }

    fn describe(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| self.delegate.describe())
    }
}

// ============================================================================
// Derived Predicates
// ============================================================================

/// An even integer
pub fn even() -> Spec {
    Spec::new(Predicate::new("an even number", |v| {
        matches!(v, Value::Int(n) if n % 2 == 0)
    }))
}

/// An odd integer
pub fn odd() -> Spec {
    Spec::new(Predicate::new("an odd number", |v| {
        matches!(v, Value::Int(n) if n % 2 != 0)
    }))
}

/// The null value
pub fn is_none() -> Spec {
    Spec::new(Predicate::new("null", Value::is_null))
}

fn at_least(value: &Value, bound: &Value) -> bool {
    matches!(value.partial_cmp(bound), Some(o) if o.is_ge())
}

fn below(value: &Value, bound: &Value) -> bool {
    matches!(value.partial_cmp(bound), Some(o) if o.is_lt())
}

/// Half-open range `[start, end)`; no end means unbounded above
pub fn in_range(start: impl Into<Value>, end_exclusive: Option<Value>) -> Spec {
    let start = start.into();
    let description = match &end_exclusive {
        Some(end) => format!("between {} and {}", start, end),
        None => format!("greater than or equal to {}", start),
    };
    Spec::new(Predicate::new(description, move |v| {
        at_least(v, &start) && end_exclusive.as_ref().map_or(true, |end| below(v, end))
    }))
}

/// Strictly greater than `bound`
pub fn gt(bound: impl Into<Value>) -> Spec {
    let bound = bound.into();
    Spec::new(Predicate::new(format!("greater than {}", bound), move |v| {
        matches!(v.partial_cmp(&bound), Some(o) if o.is_gt())
    }))
}

/// Strictly less than `bound`
pub fn lt(bound: impl Into<Value>) -> Spec {
    let bound = bound.into();
    Spec::new(Predicate::new(format!("less than {}", bound), move |v| below(v, &bound)))
}

/// Greater than or equal to `bound`
pub fn gte(bound: impl Into<Value>) -> Spec {
    let bound = bound.into();
    Spec::new(Predicate::new(
        format!("greater than or equal to {}", bound),
        move |v| at_least(v, &bound),
    ))
}

/// Less than or equal to `bound`
pub fn lte(bound: impl Into<Value>) -> Spec {
    let bound = bound.into();
    Spec::new(Predicate::new(
        format!("less than or equal to {}", bound),
        move |v| matches!(v.partial_cmp(&bound), Some(o) if o.is_le()),
    ))
}

/// A string matching a regular expression
pub fn matches(pattern: &str) -> Result<Spec, SpecError> {
    let re = Regex::new(pattern).map_err(|e| SpecError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Spec::new(Predicate::new(
        format!("a string matching {}", pattern),
        move |v| matches!(v, Value::String(s) if re.is_match(s)),
    )))
}
