//! The specification protocol
//!
//! Every spec can `conform` a value (returning the possibly transformed value or
//! [`INVALID`]), `explain` why a value does not conform, and `describe` itself.
//! Specs are shared through the cheap-clone [`Spec`] handle so problems can point
//! at the exact spec instance that rejected a value.

use std::fmt;
use std::sync::Arc;

use crate::errors::{Path, Problem};
use crate::types::{Value, ValueKind};

// ============================================================================
// Conform Result
// ============================================================================

/// Outcome of [`Spec::conform`]
#[derive(Debug, Clone, PartialEq)]
pub enum Conformed {
    /// The conformed (possibly transformed) value
    Valid(Value),
    /// The value does not conform
    Invalid,
}

/// The failure sentinel returned by every failing conform
pub const INVALID: Conformed = Conformed::Invalid;

impl Conformed {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Borrow the conformed value
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }

    pub fn into_option(self) -> Option<Value> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }
}

impl From<Value> for Conformed {
    fn from(value: Value) -> Self {
        Self::Valid(value)
    }
}

impl fmt::Display for Conformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(v) => write!(f, "{}", v),
            Self::Invalid => f.write_str("<INVALID>"),
        }
    }
}

// ============================================================================
// Specification Trait
// ============================================================================

/// Structural identity for specs that compare by value rather than by instance
#[derive(Debug, Clone, PartialEq)]
pub enum SpecIdentity {
    EqualTo(Value),
    IsInstance(ValueKind),
    IsIn(Vec<Value>),
}

/// Capability set implemented by every spec
///
/// `explain` must return no problems exactly when `conform` succeeds, and every
/// problem's path must start with `path`.
pub trait Specification: Send + Sync {
    /// Conform `value`, returning the conformed value or [`INVALID`]
    fn conform(&self, value: &Value) -> Conformed;

    /// Explain why `value` does not conform
    ///
    /// `this` is the handle this spec is being invoked through; problems
    /// raised by this spec itself should carry it.
    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem>;

    /// Human-readable description, used for diagnostics only
    fn describe(&self) -> String;

    /// Structural identity, when two separately built instances are equal
    fn identity(&self) -> Option<SpecIdentity> {
        None
    }
}

// ============================================================================
// Spec Handle
// ============================================================================

/// Shared handle to a spec
#[derive(Clone)]
pub struct Spec {
    inner: Arc<dyn Specification>,
}

impl Spec {
    pub fn new(spec: impl Specification + 'static) -> Self {
        Self {
            inner: Arc::new(spec),
        }
    }

    pub fn conform(&self, value: &Value) -> Conformed {
        self.inner.conform(value)
    }

    pub fn explain(&self, path: &Path, value: &Value) -> Vec<Problem> {
        self.inner.explain(self, path, value)
    }

    pub fn describe(&self) -> String {
        self.inner.describe()
    }

    pub fn identity(&self) -> Option<SpecIdentity> {
        self.inner.identity()
    }

    /// Whether both handles point at the same instance
    pub fn same_instance(&self, other: &Spec) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Spec {
    fn eq(&self, other: &Self) -> bool {
        if self.same_instance(other) {
            return true;
        }
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spec({})", self.describe())
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
