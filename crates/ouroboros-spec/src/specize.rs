//! Normalizing "speccable" inputs into specs
//!
//! [`Speccable`] is the closed set of things that can stand in for a spec:
//! a spec itself, a runtime kind, a set of allowed values, a one-argument
//! predicate, or a plain value. [`specize`] is the single admission point that
//! turns any of them into a [`Spec`].

use std::fmt;
use std::sync::Arc;

use crate::collections::DictSpec;
use crate::errors::SpecError;
use crate::primitives::{CheckFn, IsIn, IsInstance, Predicate};
use crate::spec::Spec;
use crate::types::{Value, ValueKind};
use crate::util::{a_or_an, callable_name};

/// Anything [`specize`] accepts
#[derive(Clone)]
pub enum Speccable {
    /// Already a spec; used as is
    Spec(Spec),
    /// A runtime kind; becomes a type-membership spec
    Kind(ValueKind),
    /// A set of allowed values; becomes a set-membership spec
    Set(Vec<Value>),
    /// A one-argument boolean check
    Predicate { name: Option<String>, check: CheckFn },
    /// A plain value; objects become dictionary specs, anything else is rejected
    Value(Value),
}

impl Speccable {
    /// Wrap a predicate, described by the function's name when it has one
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate {
            name: callable_name::<F>(),
            check: Arc::new(check),
        }
    }

    /// Wrap a predicate with an explicit description
    pub fn named_predicate(
        name: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Predicate {
            name: Some(name.into()),
            check: Arc::new(check),
        }
    }

    /// A set of allowed values
    pub fn set<V: Into<Value>>(members: impl IntoIterator<Item = V>) -> Self {
        Self::Set(members.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for Speccable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spec(s) => write!(f, "Speccable::Spec({})", s.describe()),
            Self::Kind(k) => write!(f, "Speccable::Kind({})", k),
            Self::Set(members) => write!(f, "Speccable::Set({:?})", members),
            Self::Predicate { name, .. } => write!(f, "Speccable::Predicate({:?})", name),
            Self::Value(v) => write!(f, "Speccable::Value({})", v),
        }
    }
}

impl From<Spec> for Speccable {
    fn from(spec: Spec) -> Self {
        Self::Spec(spec)
    }
}

impl From<&Spec> for Speccable {
    fn from(spec: &Spec) -> Self {
        Self::Spec(spec.clone())
    }
}

impl From<ValueKind> for Speccable {
    fn from(kind: ValueKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<Value> for Speccable {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Normalize a speccable input into a spec
pub fn specize(x: impl Into<Speccable>) -> Result<Spec, SpecError> {
    match x.into() {
        Speccable::Spec(spec) => Ok(spec),
        Speccable::Kind(kind) => Ok(Spec::new(IsInstance::new(kind))),
        Speccable::Set(members) => Ok(Spec::new(IsIn::new(members))),
        Speccable::Predicate { name, check } => {
            let description = name.unwrap_or_else(|| a_or_an("closure"));
            Ok(Spec::new(Predicate::new(description, move |v| check(v))))
        }
        Speccable::Value(Value::Object(pairs)) => {
            let keys = pairs
                .into_iter()
                .map(|(k, v)| Ok((k, specize(v)?)))
                .collect::<Result<Vec<_>, SpecError>>()?;
            Ok(Spec::new(DictSpec::new(keys)))
        }
        Speccable::Value(other) => Err(SpecError::Unspeccable {
            kind: a_or_an(other.type_name()),
            value: other.to_string(),
        }),
    }
}
