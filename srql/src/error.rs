//! Translation-side error taxonomy (§7's `TranslationError`). Both variants
//! are caller-bug indicators, not user-input faults — a well-formed `Query`
//! never fails to translate.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationError {
    /// The caller passed no AST. Unreachable through `translate`'s typed
    /// `&Query` signature, but kept for taxonomy parity with §7 — the same
    /// reason a teacher crate keeps a `Reason::Bug` variant "for things you
    /// think should never happen."
    NilQuery,
    /// The caller asked for a dialect `Dialect` doesn't have a variant for.
    /// Unreachable while `Dialect` is a closed three-variant enum; kept for
    /// forward compatibility with a future dialect addition.
    UnsupportedDialect,
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::NilQuery => write!(f, "no query was given to translate"),
            TranslationError::UnsupportedDialect => write!(f, "unsupported dialect"),
        }
    }
}

impl std::error::Error for TranslationError {}
