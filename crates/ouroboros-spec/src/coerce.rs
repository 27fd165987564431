//! Coercion spec
//!
//! [`Coerce`] runs a transform over the input before handing the result to a
//! delegate spec. A failed transform is INVALID on conform and a single
//! coercion problem on explain; a successful transform defers entirely to the
//! delegate, so explanations name the most specific spec responsible.

use std::fmt;
use std::sync::Arc;

use crate::errors::{Path, Problem};
use crate::spec::{Conformed, Spec, Specification, INVALID};
use crate::types::Value;
use crate::util::{callable_name, guarded};

type CoerceFn = Arc<dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync>;

/// Builds the reason for a failed coercion from the raw input and the error text
pub type CoercionExplainFn = Arc<dyn Fn(&Value, &str) -> String + Send + Sync>;

// ============================================================================
// Coercer
// ============================================================================

/// A named single-argument transform that may fail
#[derive(Clone)]
pub struct Coercer {
    name: String,
    f: CoerceFn,
}

impl Coercer {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Name the coercer after the function item, or `<closure>`
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let name = callable_name::<F>().unwrap_or_else(|| "<closure>".to_string());
        Self::new(name, f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the transform; errors and panics both come back as `Err` text
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        match guarded(|| (self.f)(value)) {
            Ok(Ok(coerced)) => Ok(coerced),
            Ok(Err(e)) => Err(format!("{:#}", e)),
            Err(panic) => Err(panic),
        }
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coercer({})", self.name)
    }
}

// ============================================================================
// Coerce Spec
// ============================================================================

/// Coerce, then conform through a delegate
pub struct Coerce {
    coercer: Coercer,
    delegate: Spec,
    explain_failure: Option<CoercionExplainFn>,
}

/// Strings print without their quotes inside the quoted failure template
fn bare(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Coerce {
    pub fn new(coercer: Coercer, delegate: Spec) -> Self {
        Self {
            coercer,
            delegate,
            explain_failure: None,
        }
    }

    /// Override the default coercion failure reason
    pub fn with_explain_failure(
        mut self,
        explain: impl Fn(&Value, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.explain_failure = Some(Arc::new(explain));
        self
    }

    fn failure_reason(&self, value: &Value, error: &str) -> String {
        match &self.explain_failure {
            Some(explain) => explain(value, error),
            None => format!(
                "could not coerce '{}' ({}) using coercer: {} because:\n{}",
                bare(value),
                value.type_name(),
                self.coercer.name(),
                error
            ),
        }
    }
}

impl Specification for Coerce {
    fn conform(&self, value: &Value) -> Conformed {
        match self.coercer.apply(value) {
            Ok(coerced) => self.delegate.conform(&coerced),
            Err(_) => INVALID,
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        match self.coercer.apply(value) {
            Ok(coerced) => self.delegate.explain(path, &coerced),
            Err(error) => vec![Problem::new(
                path.clone(),
                value.clone(),
                this.clone(),
                self.failure_reason(value, &error),
            )],
        }
    }

    fn describe(&self) -> String {
        self.delegate.describe()
    }
}
