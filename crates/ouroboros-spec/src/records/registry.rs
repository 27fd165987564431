//! Named record shapes and their compiled specs
//!
//! A [`Registry`] is the namespace forward references resolve against. It
//! owns the registered [`RecordShape`]s and memoizes compiled specs per shape
//! and placeholder binding. Handles are cheap to clone and safe to share
//! across threads.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use crate::config::DeriveConfig;
use crate::errors::SpecError;
use crate::primitives::IsInstance;
use crate::records::compiler::Compiler;
use crate::records::kind::Kind;
use crate::records::shape::RecordShape;
use crate::spec::Spec;
use crate::types::ValueKind;

/// Memo key: shape name plus the arguments bound to its placeholders
pub(crate) type CacheKey = (String, Vec<Kind>);

pub(crate) struct RegistryInner {
    name: String,
    config: DeriveConfig,
    shapes: RwLock<HashMap<String, Arc<RecordShape>>>,
    cache: RwLock<HashMap<CacheKey, Spec>>,
}

/// Shared handle to a set of named record shapes
///
/// Derived specs refer back to their registry weakly. Lazy references inside
/// them stop resolving once the last handle is dropped, so keep a handle for as
/// long as the specs are in use.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, DeriveConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: DeriveConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                name: name.into(),
                config,
                shapes: RwLock::new(HashMap::new()),
                cache: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &DeriveConfig {
        &self.inner.config
    }

    /// Register a shape under its name
    pub fn register(&self, shape: RecordShape) -> Result<(), SpecError> {
        let mut shapes = self.inner.shapes.write();
        if shapes.contains_key(shape.name()) {
            return Err(SpecError::DuplicateShape(shape.name().to_string()));
        }
        debug!(registry = %self.inner.name, shape = %shape.name(), "registered record shape");
        shapes.insert(shape.name().to_string(), Arc::new(shape));
        Ok(())
    }

    pub fn shape(&self, name: &str) -> Option<Arc<RecordShape>> {
        self.inner.shapes.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.shapes.read().contains_key(name)
    }

    /// Number of memoized specs
    pub fn memoized(&self) -> usize {
        self.inner.cache.read().len()
    }

    /// Compile a registered shape, leaving its placeholders unbound
    pub fn derive(&self, name: &str) -> Result<Spec, SpecError> {
        self.derive_with(name, Vec::new())
    }

    /// Compile a registered shape with its placeholders bound to `args`
    pub fn derive_with(
        &self,
        name: &str,
        args: impl IntoIterator<Item = Kind>,
    ) -> Result<Spec, SpecError> {
        Compiler::new(self).compile_shape(name, args.into_iter().collect())
    }

    /// Compile a standalone kind expression, e.g. `List['Node']`
    pub fn spec_for(&self, kind: &Kind) -> Result<Spec, SpecError> {
        Compiler::new(self).compile_kind(kind)
    }

    /// Verify that every name mentioned by a registered shape resolves
    ///
    /// Forward references are otherwise only resolved on first use.
    pub fn check_references(&self) -> Result<(), SpecError> {
        let mut shapes: Vec<Arc<RecordShape>> =
            self.inner.shapes.read().values().cloned().collect();
        shapes.sort_by(|a, b| a.name().cmp(b.name()));

        for shape in &shapes {
            if let Some(parent) = shape.extends().iter().find(|e| !self.contains(&e.shape)) {
                return Err(SpecError::UnknownShape(parent.shape.clone()));
            }
            let mut first_error: Option<SpecError> = None;
            for kind in shape.kinds() {
                kind.walk(&mut |k| {
                    if first_error.is_some() {
                        return;
                    }
                    match k {
                        Kind::Record { name, .. } if !self.contains(name) => {
                            first_error = Some(SpecError::UnknownShape(name.clone()));
                        }
                        Kind::Forward { name, args } if !self.resolvable(name, args) => {
                            first_error = Some(self.unresolved(name));
                        }
                        _ => {}
                    }
                });
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }
        Ok(())
    }

    fn builtin(&self, name: &str, args: &[Kind]) -> Option<ValueKind> {
        if self.inner.config.builtin_names && args.is_empty() {
            ValueKind::from_name(name)
        } else {
            None
        }
    }

    fn resolvable(&self, name: &str, args: &[Kind]) -> bool {
        self.contains(name) || self.builtin(name, args).is_some()
    }

    fn unresolved(&self, name: &str) -> SpecError {
        SpecError::UnresolvedName {
            name: name.to_string(),
            registry: self.inner.name.clone(),
        }
    }

    /// Resolve a forward reference by name
    pub(crate) fn resolve_forward(&self, name: &str, args: &[Kind]) -> Result<Spec, SpecError> {
        if self.contains(name) {
            return self.derive_with(name, args.to_vec());
        }
        match self.builtin(name, args) {
            Some(kind) => Ok(Spec::new(IsInstance::new(kind))),
            None => Err(self.unresolved(name)),
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<Arc<RecordShape>, SpecError> {
        self.shape(name)
            .ok_or_else(|| SpecError::UnknownShape(name.to_string()))
    }

    pub(crate) fn cached(&self, key: &CacheKey) -> Option<Spec> {
        self.inner.cache.read().get(key).cloned()
    }

    /// Store a compiled spec; the first stored spec for a key wins
    pub(crate) fn memoize(&self, key: CacheKey, spec: Spec) -> Spec {
        self.inner.cache.write().entry(key).or_insert(spec).clone()
    }

    pub(crate) fn downgrade(&self) -> Weak<RegistryInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<RegistryInner>) -> Result<Registry, SpecError> {
        weak.upgrade()
            .map(|inner| Registry { inner })
            .ok_or(SpecError::RegistryDropped)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.inner.name)
            .field("shapes", &self.inner.shapes.read().len())
            .field("memoized", &self.memoized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> RecordShape {
        RecordShape::builder("Point")
            .annotated("x", "int")
            .annotated("y", "int")
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let registry = Registry::new("geo");
        registry.register(point()).unwrap();
        assert_eq!(
            registry.register(point()),
            Err(SpecError::DuplicateShape("Point".to_string()))
        );
    }

    #[test]
    fn test_derive_is_memoized() {
        let registry = Registry::new("geo");
        registry.register(point()).unwrap();
        let first = registry.derive("Point").unwrap();
        let second = registry.derive("Point").unwrap();
        assert!(first.same_instance(&second));
        assert_eq!(registry.memoized(), 1);
    }

    #[test]
    fn test_memoization_can_be_disabled() {
        let registry = Registry::with_config("geo", DeriveConfig::new().memoize(false));
        registry.register(point()).unwrap();
        let first = registry.derive("Point").unwrap();
        let second = registry.derive("Point").unwrap();
        assert!(!first.same_instance(&second));
        assert_eq!(registry.memoized(), 0);
    }

    #[test]
    fn test_unknown_shape() {
        let registry = Registry::new("geo");
        assert_eq!(
            registry.derive("Nope").unwrap_err(),
            SpecError::UnknownShape("Nope".to_string())
        );
    }

    #[test]
    fn test_check_references() {
        let registry = Registry::new("graph");
        registry
            .register(
                RecordShape::builder("Edge")
                    .annotated("to", "'Vertex'")
                    .annotated("weight", "'float'")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(
            registry.check_references(),
            Err(SpecError::UnresolvedName {
                name: "Vertex".to_string(),
                registry: "graph".to_string(),
            })
        );

        registry
            .register(RecordShape::builder("Vertex").annotated("id", "int").build().unwrap())
            .unwrap();
        assert_eq!(registry.check_references(), Ok(()));
    }

    #[test]
    fn test_dropped_registry_is_reported() {
        let registry = Registry::new("tmp");
        let weak = registry.downgrade();
        drop(registry);
        assert_eq!(Registry::upgrade(&weak).unwrap_err(), SpecError::RegistryDropped);
    }
}
