//! Small helpers shared by the spec implementations

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Prefix a noun with "a" or "an"
pub fn a_or_an(noun: &str) -> String {
    let particle = match noun.chars().next() {
        Some(c) if "AEIOUaeiou".contains(c) => "an",
        _ => "a",
    };
    format!("{} {}", particle, noun)
}

/// Name of a callable type, as used in descriptions
///
/// Named functions yield their item name; closures yield `None`.
pub fn callable_name<F: ?Sized>() -> Option<String> {
    let full = std::any::type_name::<F>();
    let last = full.rsplit("::").next().unwrap_or(full);
    if last.contains("{{closure}}") || last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}

/// Run a user-supplied callback, turning a panic into `Err` with its message
pub fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "callback panicked".to_string()
        }
    })
}
