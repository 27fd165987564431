//! Record shape declarations
//!
//! A [`RecordShape`] is the declarative description of a record: its name, the
//! placeholders it is generic over, the fields it declares and the shapes it
//! extends. Shapes are registered in a [`Registry`](super::Registry) and
//! compiled into dictionary specs on demand.

use crate::errors::SpecError;
use crate::records::kind::Kind;

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub kind: Kind,
}

/// A parent link: the extended shape and the arguments bound to its
/// placeholders, written in terms of the extending shape's placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extends {
    pub shape: String,
    pub args: Vec<Kind>,
}

/// Declarative description of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    name: String,
    params: Vec<String>,
    fields: Vec<FieldDecl>,
    extends: Vec<Extends>,
}

impl RecordShape {
    pub fn builder(name: impl Into<String>) -> RecordShapeBuilder {
        RecordShapeBuilder {
            name: name.into(),
            params: Vec::new(),
            type_vars: Vec::new(),
            fields: Vec::new(),
            extends: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholders this shape is generic over, in argument order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Fields declared directly on this shape, in declaration order
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn extends(&self) -> &[Extends] {
        &self.extends
    }

    /// Every kind mentioned by this shape, including parent arguments
    pub(crate) fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.fields
            .iter()
            .map(|f| &f.kind)
            .chain(self.extends.iter().flat_map(|e| e.args.iter()))
    }
}

enum PendingKind {
    Kind(Kind),
    Annotation(String),
}

/// Builder for [`RecordShape`]
///
/// Annotation text is parsed at [`build`](Self::build) time, so placeholders
/// may be declared after the fields that use them.
pub struct RecordShapeBuilder {
    name: String,
    params: Vec<String>,
    type_vars: Vec<String>,
    fields: Vec<(String, PendingKind)>,
    extends: Vec<(String, Vec<PendingKind>)>,
}

impl RecordShapeBuilder {
    /// Declare a generic parameter
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    /// Declare a free placeholder usable in annotations without making the
    /// shape generic over it
    pub fn type_var(mut self, name: impl Into<String>) -> Self {
        self.type_vars.push(name.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push((name.into(), PendingKind::Kind(kind)));
        self
    }

    /// Declare a field by annotation text, e.g. `"Optional[List['Node']]"`
    pub fn annotated(mut self, name: impl Into<String>, annotation: impl Into<String>) -> Self {
        self.fields
            .push((name.into(), PendingKind::Annotation(annotation.into())));
        self
    }

    pub fn extends(mut self, shape: impl Into<String>, args: impl IntoIterator<Item = Kind>) -> Self {
        let args = args.into_iter().map(PendingKind::Kind).collect();
        self.extends.push((shape.into(), args));
        self
    }

    /// Extend a shape, binding its placeholders by annotation text
    pub fn extends_annotated<S: Into<String>>(
        mut self,
        shape: impl Into<String>,
        args: impl IntoIterator<Item = S>,
    ) -> Self {
        let args = args
            .into_iter()
            .map(|a| PendingKind::Annotation(a.into()))
            .collect();
        self.extends.push((shape.into(), args));
        self
    }

    pub fn build(self) -> Result<RecordShape, SpecError> {
        let known: Vec<String> = self
            .params
            .iter()
            .chain(self.type_vars.iter())
            .cloned()
            .collect();
        let resolve = |pending: PendingKind| match pending {
            PendingKind::Kind(kind) => Ok(kind),
            PendingKind::Annotation(text) => Kind::parse(&text, &known),
        };

        let mut fields: Vec<FieldDecl> = Vec::with_capacity(self.fields.len());
        for (name, pending) in self.fields {
            let kind = resolve(pending)?;
            match fields.iter_mut().find(|f| f.name == name) {
                Some(existing) => existing.kind = kind,
                None => fields.push(FieldDecl { name, kind }),
            }
        }

        let extends = self
            .extends
            .into_iter()
            .map(|(shape, args)| {
                Ok(Extends {
                    shape,
                    args: args.into_iter().map(&resolve).collect::<Result<_, SpecError>>()?,
                })
            })
            .collect::<Result<Vec<_>, SpecError>>()?;

        Ok(RecordShape {
            name: self.name,
            params: self.params,
            fields,
            extends,
        })
    }
}
