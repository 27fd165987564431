//! Ouroboros Spec
//!
//! Composable specifications for the Ouroboros framework: small specs that
//! validate a value, optionally coerce it into a canonical form, and explain
//! failures as path-addressed problems.
//!
//! # Features
//!
//! - **Default**: specs, combinators, stock coercers and record derivation
//! - **serde**: conversions between [`Value`] and `serde_json::Value`
//!
//! # Building specs by hand
//!
//! ```rust
//! use ouroboros_spec::{assert_spec, coll_of, dict_spec, even, Speccable, Value, ValueKind};
//!
//! let order = dict_spec([
//!     ("id", Speccable::from(ValueKind::Int)),
//!     ("lines", coll_of(even())?.into()),
//! ])?;
//!
//! let ok = Value::object([("id", Value::Int(7)), ("lines", Value::list([Value::Int(2)]))]);
//! assert_eq!(assert_spec(&order, &ok)?, ok);
//!
//! let bad = Value::object([("id", Value::Int(7)), ("lines", Value::list([Value::Int(3)]))]);
//! let violation = assert_spec(&order, &bad).unwrap_err();
//! assert_eq!(violation.explanation.problems()[0].path.to_string(), "lines[0]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Deriving specs from record shapes
//!
//! See [`records`].

// Public modules
pub mod api;
pub mod coerce;
pub mod coercions;
pub mod collections;
pub mod combinators;
pub mod config;
pub mod deferred;
pub mod errors;
pub mod primitives;
pub mod records;
pub mod spec;
pub mod specize;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use api::{
    all_of, any_, assert_spec, coerce, coll_of, conform, decorated, describe, dict_example,
    dict_spec, equal_to, explain_data, explain_data_at, is_in, is_instance, is_invalid, is_valid,
    never, one_of, predicate,
};
pub use coerce::{Coerce, Coercer};
pub use collections::{CollOf, DictSpec};
pub use combinators::{AllOf, OneOf};
pub use config::{DeriveConfig, ExtraFields};
pub use deferred::Deferred;
pub use errors::{Explanation, Path, PathElement, Problem, SpecError, SpecViolation};
pub use primitives::{
    even, gt, gte, in_range, is_none, lt, lte, matches, odd, AnyValue, Decorated, EqualTo, IsIn,
    IsInstance, Never, Predicate,
};
pub use records::{Kind, RecordShape, Registry};
pub use spec::{Conformed, Spec, SpecIdentity, Specification, INVALID};
pub use specize::{specize, Speccable};
pub use types::{Value, ValueKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
