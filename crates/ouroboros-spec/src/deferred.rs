//! Lazily resolved specs
//!
//! A [`Deferred`] spec owns a back-edge in the spec graph: it holds a resolver
//! instead of a spec and runs it on first use. The resolved spec is shared by
//! every later call; resolution runs exactly once even under concurrent first
//! use. Failed resolutions are not cached.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::errors::{Path, Problem, SpecError};
use crate::spec::{Conformed, Spec, Specification, INVALID};
use crate::types::Value;

type Resolver = Arc<dyn Fn() -> Result<Spec, SpecError> + Send + Sync>;

/// A spec resolved on first use and memoized
pub struct Deferred {
    label: String,
    resolver: Resolver,
    resolved: OnceCell<Spec>,
}

impl Deferred {
    pub fn new(
        label: impl Into<String>,
        resolver: impl Fn() -> Result<Spec, SpecError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            resolver: Arc::new(resolver),
            resolved: OnceCell::new(),
        }
    }

    /// Resolve (once) and return the delegate
    pub fn resolve(&self) -> Result<&Spec, SpecError> {
        self.resolved.get_or_try_init(|| {
            debug!(reference = %self.label, "resolving deferred spec");
            (self.resolver)().map_err(|e| {
                warn!(reference = %self.label, error = %e, "deferred spec failed to resolve");
                e
            })
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl Specification for Deferred {
    fn conform(&self, value: &Value) -> Conformed {
        match self.resolve() {
            Ok(spec) => spec.conform(value),
            Err(_) => INVALID,
        }
    }

    fn explain(&self, this: &Spec, path: &Path, value: &Value) -> Vec<Problem> {
        match self.resolve() {
            Ok(spec) => spec.explain(path, value),
            Err(e) => vec![Problem::new(
                path.clone(),
                value.clone(),
                this.clone(),
                format!("unresolved reference: {}", e),
            )],
        }
    }

    fn describe(&self) -> String {
        match self.resolve() {
            Ok(spec) => spec.describe(),
            Err(_) => format!("unresolved reference to {}", self.label),
        }
    }
}
