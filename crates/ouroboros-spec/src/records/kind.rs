//! Declared field kinds
//!
//! A [`Kind`] describes what a record field holds. Kinds can be built directly
//! or parsed from annotation text such as `Optional[List['Node']]`.

use std::fmt;

use crate::errors::SpecError;
use crate::types::ValueKind;

/// Declared kind of a record field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A concrete runtime kind
    Leaf(ValueKind),
    /// Only the null value
    None,
    /// A registered record shape, optionally parameterized
    Record { name: String, args: Vec<Kind> },
    /// A shape (or builtin) referenced by name, resolved on first use
    Forward { name: String, args: Vec<Kind> },
    /// A homogeneous collection
    List(Box<Kind>),
    /// Any one of several kinds, tried in order
    Union(Vec<Kind>),
    /// A generic placeholder
    Placeholder(String),
}

impl Kind {
    pub fn leaf(kind: ValueKind) -> Self {
        Self::Leaf(kind)
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self::Record {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn record_of(name: impl Into<String>, args: impl IntoIterator<Item = Kind>) -> Self {
        Self::Record {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn forward(name: impl Into<String>) -> Self {
        Self::Forward {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn list(item: Kind) -> Self {
        Self::List(Box::new(item))
    }

    pub fn union(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self::Union(kinds.into_iter().collect())
    }

    /// `Union[kind, None]`
    pub fn optional(kind: Kind) -> Self {
        Self::Union(vec![kind, Self::None])
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::Placeholder(name.into())
    }

    /// Replace placeholders found in `bindings`; unbound ones are kept
    pub(crate) fn substitute(&self, bindings: &[(String, Kind)]) -> Kind {
        let all = |kinds: &[Kind]| kinds.iter().map(|k| k.substitute(bindings)).collect();
        match self {
            Self::Placeholder(p) => bindings
                .iter()
                .find(|(name, _)| name == p)
                .map(|(_, bound)| bound.clone())
                .unwrap_or_else(|| self.clone()),
            Self::List(item) => Self::List(Box::new(item.substitute(bindings))),
            Self::Union(kinds) => Self::Union(all(kinds)),
            Self::Record { name, args } => Self::Record {
                name: name.clone(),
                args: all(args),
            },
            Self::Forward { name, args } => Self::Forward {
                name: name.clone(),
                args: all(args),
            },
            Self::Leaf(_) | Self::None => self.clone(),
        }
    }

    /// Visit this kind and every kind nested in it
    pub(crate) fn walk(&self, visit: &mut impl FnMut(&Kind)) {
        visit(self);
        match self {
            Self::List(item) => item.walk(visit),
            Self::Union(kinds) => kinds.iter().for_each(|k| k.walk(visit)),
            Self::Record { args, .. } | Self::Forward { args, .. } => {
                args.iter().for_each(|k| k.walk(visit))
            }
            Self::Leaf(_) | Self::None | Self::Placeholder(_) => {}
        }
    }

    /// Parse annotation text
    ///
    /// Builtin names (`int`, `str`, ...) become leaves, names listed in
    /// `placeholders` become placeholders, quoted names are forward references
    /// and any other bare name refers to a registered record shape.
    pub fn parse(text: &str, placeholders: &[String]) -> Result<Kind, SpecError> {
        let mut parser = Parser {
            text,
            tokens: tokenize(text)?,
            pos: 0,
            placeholders,
        };
        let kind = parser.kind()?;
        if parser.pos != parser.tokens.len() {
            return Err(parser.unsupported());
        }
        Ok(kind)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Kind]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    let parts: Vec<String> = args.iter().map(Kind::to_string).collect();
    write!(f, "[{}]", parts.join(", "))
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(k) => write!(f, "{}", k),
            Self::None => f.write_str("None"),
            Self::Record { name, args } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Self::Forward { name, args } => {
                write!(f, "'{}'", name)?;
                write_args(f, args)
            }
            Self::List(item) => write!(f, "List[{}]", item),
            Self::Union(kinds) => {
                f.write_str("Union")?;
                write_args(f, kinds)
            }
            Self::Placeholder(p) => write!(f, "~{}", p),
        }
    }
}

// ============================================================================
// Annotation Parser
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Quoted(String),
    Open,
    Close,
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Token>, SpecError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' | ']' | ',' => {
                chars.next();
                tokens.push(match c {
                    '[' => Token::Open,
                    ']' => Token::Close,
                    _ => Token::Comma,
                });
            }
            '\'' | '"' => {
                chars.next();
                let mut quoted = String::new();
                loop {
                    match chars.next() {
                        Some(q) if q == c => break,
                        Some(other) => quoted.push(other),
                        None => return Err(SpecError::UnsupportedKind(text.to_string())),
                    }
                }
                tokens.push(Token::Quoted(quoted.trim().to_string()));
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' || n == '.' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(name));
            }
            _ => return Err(SpecError::UnsupportedKind(text.to_string())),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    placeholders: &'a [String],
}

impl Parser<'_> {
    fn unsupported(&self) -> SpecError {
        SpecError::UnsupportedKind(self.text.to_string())
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn args(&mut self) -> Result<Vec<Kind>, SpecError> {
        if self.peek() != Some(&Token::Open) {
            return Ok(Vec::new());
        }
        self.pos += 1;
        let mut args = vec![self.kind()?];
        loop {
            match self.next() {
                Some(Token::Comma) => args.push(self.kind()?),
                Some(Token::Close) => return Ok(args),
                _ => return Err(self.unsupported()),
            }
        }
    }

    fn kind(&mut self) -> Result<Kind, SpecError> {
        match self.next() {
            Some(Token::Quoted(name)) => {
                let valid = name
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
                if name.is_empty() || !valid {
                    return Err(self.unsupported());
                }
                let args = self.args()?;
                Ok(Kind::Forward { name, args })
            }
            Some(Token::Name(name)) => {
                let args = self.args()?;
                self.named(name, args)
            }
            _ => Err(self.unsupported()),
        }
    }

    fn named(&self, name: String, mut args: Vec<Kind>) -> Result<Kind, SpecError> {
        if args.is_empty() && !matches!(name.as_str(), "None" | "NoneType") {
            if self.placeholders.contains(&name) {
                return Ok(Kind::Placeholder(name));
            }
            if let Some(leaf) = ValueKind::from_name(&name) {
                return Ok(Kind::Leaf(leaf));
            }
        }
        let kind = match (name.as_str(), args.len()) {
            ("None" | "NoneType", 0) => Kind::None,
            ("List" | "list" | "Sequence", 1) => Kind::list(args.remove(0)),
            ("Optional", 1) => Kind::optional(args.remove(0)),
            ("Union", n) if n >= 1 => Kind::Union(args),
            ("Dict" | "dict" | "Tuple" | "tuple" | "Set" | "set" | "Optional" | "List" | "Union", _) => {
                return Err(self.unsupported())
            }
            (other, _) if other.starts_with(|c: char| c.is_alphabetic() || c == '_') => {
                Kind::Record { name, args }
            }
            _ => return Err(self.unsupported()),
        };
        Ok(kind)
    }
}
