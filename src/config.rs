//! Evaluation configuration: the handful of preprocessor dialect flags that
//! change constant-expression semantics.

/// Dialect and diagnostic settings for one evaluation, mirroring the
/// relevant fields of the reference implementation's `cpp_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub(crate) precision: u32,
    pub(crate) pedantic: bool,
    pub(crate) c99: bool,
    pub(crate) cplusplus: bool,
    pub(crate) traditional: bool,
    pub(crate) warn_undef: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            precision: crate::bigint::LIMB_BITS,
            pedantic: false,
            c99: true,
            cplusplus: false,
            traditional: false,
            warn_undef: false,
        }
    }
}

impl EvalConfig {
    /// A config matching a typical 64-bit `intmax_t` host, C99 dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bit-width `intmax_t`/`uintmax_t` are evaluated at.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Enable `-pedantic` diagnostics (GNU extensions pedwarn).
    pub fn with_pedantic(mut self, pedantic: bool) -> Self {
        self.pedantic = pedantic;
        self
    }

    /// Select C99 (vs. C89) suffix and comma-operator rules.
    pub fn with_c99(mut self, c99: bool) -> Self {
        self.c99 = c99;
        self
    }

    /// Select C++ dialect rules (affects `true`/`false` literal handling).
    pub fn with_cplusplus(mut self, cplusplus: bool) -> Self {
        self.cplusplus = cplusplus;
        self
    }

    /// Select traditional (pre-standard) C rules.
    pub fn with_traditional(mut self, traditional: bool) -> Self {
        self.traditional = traditional;
        self
    }

    /// Warn when an identifier that is not a macro appears in `#if`.
    pub fn with_warn_undef(mut self, warn_undef: bool) -> Self {
        self.warn_undef = warn_undef;
        self
    }

    /// Current evaluation precision in bits.
    pub fn precision(&self) -> u32 {
        self.precision
    }
}
