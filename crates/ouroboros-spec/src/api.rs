//! Caller-facing constructors and entry points
//!
//! Every constructor that accepts a "speccable" input routes it through
//! [`specize`] exactly once. The entry points (`conform`, `explain_data`,
//! `assert_spec`, ...) are thin wrappers over the [`Spec`] handle.

use crate::coerce::{Coerce, Coercer};
use crate::collections::{CollOf, DictSpec};
use crate::combinators::{AllOf, OneOf};
use crate::errors::{Explanation, Path, SpecError, SpecViolation};
use crate::primitives::{AnyValue, Decorated, EqualTo, IsIn, IsInstance, Never, Predicate};
use crate::specize::{specize, Speccable};
use crate::spec::{Conformed, Spec};
use crate::types::{Value, ValueKind};

// ============================================================================
// Constructors
// ============================================================================

/// Accepts everything
pub fn any_() -> Spec {
    Spec::new(AnyValue)
}

/// Rejects everything
pub fn never() -> Spec {
    Spec::new(Never)
}

pub fn equal_to(expected: impl Into<Value>) -> Spec {
    Spec::new(EqualTo::new(expected))
}

pub fn is_instance(kind: ValueKind) -> Spec {
    Spec::new(IsInstance::new(kind))
}

pub fn is_in<V: Into<Value>>(members: impl IntoIterator<Item = V>) -> Spec {
    Spec::new(IsIn::new(members.into_iter().map(Into::into)))
}

/// A described boolean check
pub fn predicate(
    description: impl Into<String>,
    check: impl Fn(&Value) -> bool + Send + Sync + 'static,
) -> Spec {
    Spec::new(Predicate::new(description, check))
}

/// Apply `coercer`, then conform the result with `spec`
pub fn coerce(coercer: Coercer, spec: impl Into<Speccable>) -> Result<Spec, SpecError> {
    Ok(Spec::new(Coerce::new(coercer, specize(spec)?)))
}

/// Override a spec's description
pub fn decorated(spec: impl Into<Speccable>, description: Option<&str>) -> Result<Spec, SpecError> {
    Ok(Spec::new(Decorated::new(
        specize(spec)?,
        description.map(str::to_string),
    )))
}

pub fn coll_of(item: impl Into<Speccable>) -> Result<Spec, SpecError> {
    Ok(Spec::new(CollOf::new(specize(item)?)))
}

fn specize_all<S: Into<Speccable>>(specs: impl IntoIterator<Item = S>) -> Result<Vec<Spec>, SpecError> {
    specs.into_iter().map(specize).collect()
}

/// The first alternative that conforms wins
pub fn one_of<S: Into<Speccable>>(specs: impl IntoIterator<Item = S>) -> Result<Spec, SpecError> {
    Ok(Spec::new(OneOf::new(specize_all(specs)?)))
}

/// Thread the value through every spec in order
pub fn all_of<S: Into<Speccable>>(specs: impl IntoIterator<Item = S>) -> Result<Spec, SpecError> {
    Ok(Spec::new(AllOf::new(specize_all(specs)?)))
}

/// A dictionary spec from key/spec pairs
pub fn dict_spec<K, S>(pairs: impl IntoIterator<Item = (K, S)>) -> Result<Spec, SpecError>
where
    K: Into<String>,
    S: Into<Speccable>,
{
    let keys = pairs
        .into_iter()
        .map(|(k, s)| Ok((k.into(), specize(s)?)))
        .collect::<Result<Vec<_>, SpecError>>()?;
    Ok(Spec::new(DictSpec::new(keys)))
}

/// A dictionary spec requiring exactly the given values
///
/// Nested objects become nested dictionary specs; every other value must be
/// matched by equality.
pub fn dict_example<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Spec {
    let keys = pairs
        .into_iter()
        .map(|(k, v)| {
            let spec = match v {
                Value::Object(nested) => dict_example(nested),
                other => equal_to(other),
            };
            (k.into(), spec)
        })
        .collect();
    Spec::new(DictSpec::new(keys))
}

// ============================================================================
// Entry Points
// ============================================================================

pub fn conform(spec: &Spec, value: &Value) -> Conformed {
    spec.conform(value)
}

/// Explain from the root path; `None` when the value conforms
pub fn explain_data(spec: &Spec, value: &Value) -> Option<Explanation> {
    explain_data_at(spec, &Path::root(), value)
}

/// Explain with every problem path prefixed by `path`
pub fn explain_data_at(spec: &Spec, path: &Path, value: &Value) -> Option<Explanation> {
    let problems = spec.explain(path, value);
    if problems.is_empty() {
        None
    } else {
        Some(Explanation::with_problems(problems))
    }
}

pub fn describe(spec: &Spec) -> String {
    spec.describe()
}

/// Conform or fail with the full explanation
pub fn assert_spec(spec: &Spec, value: &Value) -> Result<Value, SpecViolation> {
    match spec.conform(value) {
        Conformed::Valid(conformed) => Ok(conformed),
        Conformed::Invalid => Err(SpecViolation::new(
            value.clone(),
            Explanation::with_problems(spec.explain(&Path::root(), value)),
        )),
    }
}

pub fn is_valid(spec: &Spec, value: &Value) -> bool {
    spec.conform(value).is_valid()
}

pub fn is_invalid(spec: &Spec, value: &Value) -> bool {
    spec.conform(value).is_invalid()
}
