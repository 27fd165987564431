//! Configuration options for spec derivation
//!
//! Similar to Pydantic's ConfigDict: controls how record shapes compile into
//! specs.

// ============================================================================
// Extra Field Handling
// ============================================================================

/// How a dictionary spec treats keys it does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    /// Accept, but drop them from the conformed output (default)
    #[default]
    Ignore,
    /// Accept and copy them into the conformed output
    Allow,
    /// Reject the value, one problem per extra key
    Forbid,
}

// ============================================================================
// Derive Config
// ============================================================================

/// Options for compiling record shapes into specs
#[derive(Debug, Clone)]
pub struct DeriveConfig {
    /// Memoize compiled specs per shape and placeholder binding
    pub memoize: bool,

    /// Enforce runtime-kind consistency across fields sharing an unbound placeholder
    pub check_placeholders: bool,

    /// Let forward references fall back to builtin type names (`int`, `str`, ...)
    pub builtin_names: bool,

    /// Extra key handling for derived dictionary specs
    pub extra: ExtraFields,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            check_placeholders: true,
            builtin_names: true,
            extra: ExtraFields::Ignore,
        }
    }
}

impl DeriveConfig {
    /// Create a new derive config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable memoization
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Enable or disable placeholder consistency checks
    pub fn check_placeholders(mut self, check: bool) -> Self {
        self.check_placeholders = check;
        self
    }

    /// Enable or disable builtin name fallback for forward references
    pub fn builtin_names(mut self, allow: bool) -> Self {
        self.builtin_names = allow;
        self
    }

    /// Set extra key handling
    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Forbid extra keys
    pub fn forbid_extra(mut self) -> Self {
        self.extra = ExtraFields::Forbid;
        self
    }

    /// Allow extra keys
    pub fn allow_extra(mut self) -> Self {
        self.extra = ExtraFields::Allow;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
