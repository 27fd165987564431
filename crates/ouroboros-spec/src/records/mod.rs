//! Record derivation
//!
//! Turns declarative record shapes into dictionary specs:
//!
//! - Each field's declared [`Kind`] compiles to a spec: leaves to type checks,
//!   lists to collection specs, unions to alternatives, shapes to nested
//!   record specs.
//! - Inherited fields come first; a redeclared field takes the most-derived kind.
//! - Generic placeholders are substituted through the inheritance chain. Fields
//!   left with an unbound placeholder accept anything but must agree with each
//!   other on a runtime kind.
//! - Self-referencing and mutually recursive shapes compile lazily.
//!
//! # Example
//!
//! ```
//! use ouroboros_spec::records::{RecordShape, Registry};
//! use ouroboros_spec::Value;
//!
//! let registry = Registry::new("example");
//! registry.register(
//!     RecordShape::builder("Node")
//!         .annotated("value", "int")
//!         .annotated("next", "Optional['Node']")
//!         .build()?,
//! )?;
//!
//! let node = registry.derive("Node")?;
//! let list = Value::object([
//!     ("value", Value::Int(1)),
//!     ("next", Value::object([("value", Value::Int(2)), ("next", Value::Null)])),
//! ]);
//! assert!(node.conform(&list).is_valid());
//! # Ok::<(), ouroboros_spec::SpecError>(())
//! ```

mod compiler;
mod kind;
mod placeholders;
mod registry;
mod shape;

pub use kind::Kind;
pub use placeholders::{PlaceholderConsistency, PlaceholderGroup, UnboundPlaceholder};
pub use registry::Registry;
pub use shape::{Extends, FieldDecl, RecordShape, RecordShapeBuilder};
