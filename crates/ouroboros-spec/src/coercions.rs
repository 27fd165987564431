//! Stock coercers for common leaf types
//!
//! Each coercer is a plain function usable with [`Coercer::from_fn`]; the
//! matching spec constructors wrap it around a type-membership check.

use anyhow::{anyhow, bail};
use url::Url;
use uuid::Uuid;

use crate::coerce::{Coerce, Coercer};
use crate::primitives::IsInstance;
use crate::spec::Spec;
use crate::types::{Value, ValueKind};

/// Integers pass through; numeric strings and integral floats convert
pub fn coerce_int(value: &Value) -> anyhow::Result<Value> {
    match value {
        Value::Int(_) => Ok(value.clone()),
        Value::String(s) => Ok(Value::Int(s.trim().parse()?)),
        Value::Float(f) if f.fract() == 0.0 && f.is_finite() => {
            // 2^63 is exactly representable; anything at or past it would saturate
            if *f < -9.223372036854776e18 || *f >= 9.223372036854776e18 {
                bail!("float {} is out of range for an integer", f);
            }
            Ok(Value::Int(*f as i64))
        }
        other => bail!("invalid literal for int: {}", other),
    }
}

/// Strings parse as a UUID; output is the canonical lowercase hyphenated form
pub fn coerce_uuid(value: &Value) -> anyhow::Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(Uuid::parse_str(s)?.hyphenated().to_string())),
        Value::Bytes(b) => Ok(Value::String(Uuid::from_slice(b)?.hyphenated().to_string())),
        other => bail!("expected a UUID string but got {}", other.type_name()),
    }
}

/// Strings parse as a URL into `{scheme, host, port, path, query, fragment}`
pub fn coerce_url(value: &Value) -> anyhow::Result<Value> {
    let Value::String(s) = value else {
        bail!("expected a URL string but got {}", value.type_name());
    };
    let url = Url::parse(s).map_err(|e| anyhow!("{}", e))?;
    let opt = |part: Option<&str>| part.map_or(Value::Null, Value::from);
    Ok(Value::object([
        ("scheme", Value::from(url.scheme())),
        ("host", opt(url.host_str())),
        ("port", url.port_or_known_default().map_or(Value::Null, |p| Value::Int(p as i64))),
        ("path", Value::from(url.path())),
        ("query", opt(url.query())),
        ("fragment", opt(url.fragment())),
    ]))
}

/// An integer, coercing numeric strings
pub fn int() -> Spec {
    Spec::new(Coerce::new(
        Coercer::from_fn(coerce_int),
        Spec::new(IsInstance::new(ValueKind::Int)),
    ))
}

/// A UUID string, normalized
pub fn uuid() -> Spec {
    Spec::new(Coerce::new(
        Coercer::from_fn(coerce_uuid),
        Spec::new(IsInstance::new(ValueKind::String)),
    ))
}

/// A URL, parsed into its components
pub fn url() -> Spec {
    Spec::new(Coerce::new(
        Coercer::from_fn(coerce_url),
        Spec::new(IsInstance::new(ValueKind::Object)),
    ))
}
