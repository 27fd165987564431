//! Explanation and error types
//!
//! Validation failures are data: a [`Problem`] per failure, collected into an
//! [`Explanation`]. Misusing the library (building a spec from something that
//! cannot be one, deriving from a malformed shape) is a [`SpecError`] raised at
//! construction time. [`SpecViolation`] is what `assert_spec` raises.

use std::fmt;

use thiserror::Error;

use crate::spec::Spec;
use crate::types::Value;

// ============================================================================
// Paths
// ============================================================================

/// One step from a value into one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Dictionary key / record field
    Key(String),
    /// Collection index
    Index(usize),
}

impl From<&str> for PathElement {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathElement {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathElement {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a problem, relative to the value passed to `explain`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<PathElement>);

impl Path {
    /// The empty path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from elements
    pub fn of<E: Into<PathElement>>(elements: impl IntoIterator<Item = E>) -> Self {
        Self(elements.into_iter().map(Into::into).collect())
    }

    /// A new path extended by one element
    pub fn child(&self, element: impl Into<PathElement>) -> Self {
        let mut elements = self.0.clone();
        elements.push(element.into());
        Self(elements)
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `prefix` is a prefix of this path
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, element) in self.0.iter().enumerate() {
            match element {
                PathElement::Key(k) if i == 0 => write!(f, "{}", k)?,
                PathElement::Key(k) => write!(f, ".{}", k)?,
                PathElement::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

/// Build a [`Path`] from keys and indices: `path!["k", 1usize, "j"]`
#[macro_export]
macro_rules! path {
    () => { $crate::errors::Path::root() };
    ($($e:expr),+ $(,)?) => {
        $crate::errors::Path::root()$(.child($e))+
    };
}

// ============================================================================
// Problems and Explanations
// ============================================================================

/// A single explained failure
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Where the offending value sits
    pub path: Path,
    /// The offending value
    pub value: Value,
    /// The spec that rejected it
    pub spec: Spec,
    /// Human-readable reason
    pub reason: String,
}

impl Problem {
    pub fn new(path: Path, value: Value, spec: Spec, reason: impl Into<String>) -> Self {
        Self {
            path,
            value,
            spec,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (value: {})", self.path, self.reason, self.value)
    }
}

/// Every problem found by one `explain` call, in traversal order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Explanation {
    problems: Vec<Problem>,
}

impl Explanation {
    pub fn with_problems(problems: impl IntoIterator<Item = Problem>) -> Self {
        Self {
            problems: problems.into_iter().collect(),
        }
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl IntoIterator for Explanation {
    type Item = Problem;
    type IntoIter = std::vec::IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_iter()
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", problem)?;
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Usage errors, raised while building or deriving specs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("don't know how to turn {kind} into a spec: {value}")]
    Unspeccable { kind: String, value: String },

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unsupported kind: {0}")]
    UnsupportedKind(String),

    #[error("unknown record shape '{0}'")]
    UnknownShape(String),

    #[error("name '{name}' is not defined in registry '{registry}'")]
    UnresolvedName { name: String, registry: String },

    #[error("record shape '{shape}' takes {expected} placeholder argument(s) but {actual} were supplied")]
    ArgumentCount {
        shape: String,
        expected: usize,
        actual: usize,
    },

    #[error("cyclic inheritance involving record shape '{0}'")]
    CyclicInheritance(String),

    #[error("record shape '{0}' is already registered")]
    DuplicateShape(String),

    #[error("registry has been dropped")]
    RegistryDropped,
}

/// Raised by `assert_spec`: the rejected value with its full explanation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("\nValue:\n{value}\n\nProblems:\n{explanation}")]
pub struct SpecViolation {
    pub value: Value,
    pub explanation: Explanation,
}

impl SpecViolation {
    pub fn new(value: Value, explanation: Explanation) -> Self {
        Self { value, explanation }
    }
}
