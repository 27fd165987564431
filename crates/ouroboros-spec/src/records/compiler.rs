//! Compiling record shapes into specs
//!
//! Fields are gathered ancestor-first, with placeholders substituted scope by
//! scope: a parent link binds the parent's placeholders to arguments written in
//! the child's terms, and those arguments are substituted with the child's own
//! bindings before the parent's fields are read. A field redeclared further
//! down keeps its inherited position but takes the most-derived kind.
//!
//! References to a shape already being compiled become deferred specs, as do
//! all forward references, so self-referencing and mutually recursive shapes
//! compile without looping.

use tracing::debug;

use crate::collections::{CollOf, DictSpec};
use crate::combinators::{AllOf, OneOf};
use crate::deferred::Deferred;
use crate::errors::SpecError;
use crate::primitives::{Decorated, IsInstance};
use crate::records::kind::Kind;
use crate::records::placeholders::{PlaceholderConsistency, PlaceholderGroup, UnboundPlaceholder};
use crate::records::registry::Registry;
use crate::records::shape::{FieldDecl, RecordShape};
use crate::spec::Spec;
use crate::types::ValueKind;

type Bindings = Vec<(String, Kind)>;

/// Zip placeholders with their arguments; no arguments leaves all unbound
fn bind(params: &[String], args: &[Kind]) -> Bindings {
    params.iter().cloned().zip(args.iter().cloned()).collect()
}

fn check_arity(shape: &RecordShape, actual: usize) -> Result<(), SpecError> {
    let expected = shape.params().len();
    if actual == 0 || actual == expected {
        Ok(())
    } else {
        Err(SpecError::ArgumentCount {
            shape: shape.name().to_string(),
            expected,
            actual,
        })
    }
}

pub(crate) struct Compiler<'r> {
    registry: &'r Registry,
    /// Shapes currently being compiled, outermost first
    stack: Vec<String>,
}

impl<'r> Compiler<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
        }
    }

    pub(crate) fn compile_shape(&mut self, name: &str, args: Vec<Kind>) -> Result<Spec, SpecError> {
        let memoize = self.registry.config().memoize;
        let key = (name.to_string(), args);

        if memoize {
            if let Some(spec) = self.registry.cached(&key) {
                debug!(shape = %name, "using memoized record spec");
                return Ok(spec);
            }
        }

        if self.stack.iter().any(|n| n == name) {
            debug!(shape = %name, "deferring recursive record reference");
            let (name, args) = key;
            return Ok(self.deferred_record(name, args));
        }

        let shape = self.registry.lookup(name)?;
        check_arity(&shape, key.1.len())?;

        debug!(shape = %name, args = key.1.len(), "compiling record shape");
        self.stack.push(name.to_string());
        let built = self.build(&shape, &key.1);
        self.stack.pop();
        let spec = built?;

        Ok(if memoize {
            self.registry.memoize(key, spec)
        } else {
            spec
        })
    }

    pub(crate) fn compile_kind(&mut self, kind: &Kind) -> Result<Spec, SpecError> {
        let spec = match kind {
            Kind::Leaf(k) => Spec::new(IsInstance::new(*k)),
            Kind::None => Spec::new(IsInstance::new(ValueKind::Null)),
            Kind::Record { name, args } => self.compile_shape(name, args.clone())?,
            Kind::Forward { name, args } => self.deferred_forward(name.clone(), args.clone()),
            Kind::List(item) => Spec::new(CollOf::new(self.compile_kind(item)?)),
            Kind::Union(kinds) => {
                let alternatives = kinds
                    .iter()
                    .map(|k| self.compile_kind(k))
                    .collect::<Result<Vec<_>, SpecError>>()?;
                Spec::new(OneOf::new(alternatives))
            }
            Kind::Placeholder(p) => Spec::new(UnboundPlaceholder::new(p.clone())),
        };
        Ok(spec)
    }

    fn build(&mut self, shape: &RecordShape, args: &[Kind]) -> Result<Spec, SpecError> {
        let bindings = bind(shape.params(), args);
        let fields = self.collect_fields(shape, &bindings, &mut Vec::new())?;

        let mut keys = Vec::with_capacity(fields.len());
        let mut groups: Vec<PlaceholderGroup> = Vec::new();
        for field in fields {
            if let Kind::Placeholder(p) = &field.kind {
                match groups.iter_mut().find(|g| &g.placeholder == p) {
                    Some(group) => group.fields.push(field.name.clone()),
                    None => groups.push(PlaceholderGroup {
                        placeholder: p.clone(),
                        fields: vec![field.name.clone()],
                    }),
                }
            }
            let spec = self.compile_kind(&field.kind)?;
            keys.push((field.name, spec));
        }

        let config = self.registry.config();
        let dict = Spec::new(DictSpec::new(keys).extra(config.extra));
        let spec = if config.check_placeholders && !groups.is_empty() {
            let consistency = Spec::new(PlaceholderConsistency::new(groups));
            Spec::new(AllOf::new(vec![dict, consistency]))
        } else {
            dict
        };

        let label = Kind::record_of(shape.name(), args.iter().cloned()).to_string();
        Ok(Spec::new(Decorated::new(spec, Some(label))))
    }

    /// Effective fields of `shape`, ancestors first, in terms of `bindings`
    fn collect_fields(
        &self,
        shape: &RecordShape,
        bindings: &Bindings,
        lineage: &mut Vec<String>,
    ) -> Result<Vec<FieldDecl>, SpecError> {
        if lineage.iter().any(|n| n == shape.name()) {
            return Err(SpecError::CyclicInheritance(shape.name().to_string()));
        }
        lineage.push(shape.name().to_string());

        let mut fields: Vec<FieldDecl> = Vec::new();
        for parent in shape.extends() {
            let parent_shape = self.registry.lookup(&parent.shape)?;
            check_arity(&parent_shape, parent.args.len())?;
            let parent_args: Vec<Kind> = parent.args.iter().map(|a| a.substitute(bindings)).collect();
            let parent_bindings = bind(parent_shape.params(), &parent_args);

            for inherited in self.collect_fields(&parent_shape, &parent_bindings, lineage)? {
                if !fields.iter().any(|f| f.name == inherited.name) {
                    fields.push(inherited);
                }
            }
        }

        for own in shape.fields() {
            let kind = own.kind.substitute(bindings);
            match fields.iter_mut().find(|f| f.name == own.name) {
                Some(existing) => existing.kind = kind,
                None => fields.push(FieldDecl {
                    name: own.name.clone(),
                    kind,
                }),
            }
        }

        lineage.pop();
        Ok(fields)
    }

    fn deferred_record(&self, name: String, args: Vec<Kind>) -> Spec {
        let weak = self.registry.downgrade();
        let label = Kind::record_of(name.as_str(), args.iter().cloned()).to_string();
        Spec::new(Deferred::new(label, move || {
            Registry::upgrade(&weak)?.derive_with(&name, args.clone())
        }))
    }

    fn deferred_forward(&self, name: String, args: Vec<Kind>) -> Spec {
        let weak = self.registry.downgrade();
        let label = Kind::Forward {
            name: name.clone(),
            args: args.clone(),
        }
        .to_string();
        Spec::new(Deferred::new(label, move || {
            Registry::upgrade(&weak)?.resolve_forward(&name, &args)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn registry() -> Registry {
        let registry = Registry::new("test");
        registry
            .register(
                RecordShape::builder("Base")
                    .param("T")
                    .annotated("id", "int")
                    .annotated("payload", "T")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                RecordShape::builder("Child")
                    .extends_annotated("Base", ["str"])
                    .annotated("id", "str")
                    .annotated("extra", "bool")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_fields_are_ancestor_first_most_derived_wins() {
        let registry = registry();
        let child = registry.lookup("Child").unwrap();
        let fields = Compiler::new(&registry)
            .collect_fields(&child, &Vec::new(), &mut Vec::new())
            .unwrap();
        let summary: Vec<(String, Kind)> = fields.into_iter().map(|f| (f.name, f.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("id".to_string(), Kind::leaf(ValueKind::String)),
                ("payload".to_string(), Kind::leaf(ValueKind::String)),
                ("extra".to_string(), Kind::leaf(ValueKind::Bool)),
            ]
        );
    }

    #[test]
    fn test_describe_uses_shape_label() {
        let registry = registry();
        let spec = registry.derive_with("Base", [Kind::leaf(ValueKind::Int)]).unwrap();
        assert_eq!(spec.describe(), "Base[integer]");
        assert!(spec
            .conform(&Value::object([("id", Value::Int(1)), ("payload", Value::Int(2))]))
            .is_valid());
    }

    #[test]
    fn test_wrong_argument_count() {
        let registry = registry();
        let err = registry
            .derive_with("Base", [Kind::leaf(ValueKind::Int), Kind::leaf(ValueKind::Int)])
            .unwrap_err();
        assert_eq!(
            err,
            SpecError::ArgumentCount {
                shape: "Base".to_string(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_cyclic_inheritance() {
        let registry = Registry::new("cycle");
        for (name, parent) in [("A", "B"), ("B", "A")] {
            registry
                .register(RecordShape::builder(name).extends(parent, []).build().unwrap())
                .unwrap();
        }
        assert_eq!(
            registry.derive("A").unwrap_err(),
            SpecError::CyclicInheritance("A".to_string())
        );
    }
}
