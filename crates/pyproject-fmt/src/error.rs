//! Error types.
//!
//! Only [`ParseError`] ever leaves [`crate::format`]: it means the input was not valid TOML at
//! all. [`SpecError`] and [`ShapeMismatch`] describe narrower, local problems (a malformed
//! dependency string, a `classifiers` key that holds a table instead of an array) that a single
//! table rewriter can recover from by leaving the offending value untouched; the pipeline logs
//! them with `tracing::warn!` and keeps going rather than failing the whole document.

use std::fmt;

/// The input could not be parsed as TOML.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ParseError(#[from] pub(crate) toml_edit::TomlError);

/// Which grammar rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// The `requires-python`-style interpreter version constraint grammar.
    InterpreterConstraint,
    /// The PEP 508 dependency-specifier grammar.
    DependencySpecifier,
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InterpreterConstraint => "interpreter version constraint",
            Self::DependencySpecifier => "dependency specifier",
        };
        f.write_str(name)
    }
}

/// A value that failed to parse against the grammar its key implies.
///
/// Carried as a typed value, rather than a pre-rendered message, so tests can assert on which
/// grammar rejected which value without scraping log text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecError {
    /// Dotted path of the table the value lives in, e.g. `"project"`.
    pub table: String,
    /// The key the value is stored under.
    pub key: String,
    /// The raw value text that failed to parse.
    pub value: String,
    /// Which grammar rejected it.
    pub kind: SpecKind,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: \"{}\" is not a valid {}", self.table, self.key, self.value, self.kind)
    }
}

/// A recognized key held an item of a `toml_edit` kind the rewriter didn't expect, e.g.
/// `classifiers` holding an inline table instead of an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Dotted path of the table the value lives in.
    pub table: String,
    /// The key the value is stored under.
    pub key: String,
    /// What kind of item was expected, e.g. `"array"`.
    pub expected: &'static str,
    /// What kind of item was actually found, e.g. `"inline table"`.
    pub found: &'static str,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: expected {}, found {}", self.table, self.key, self.expected, self.found)
    }
}

impl ShapeMismatch {
    /// Records a shape mismatch via `tracing::warn!` with structured fields, matching the
    /// `SpecError` logging convention in `dependency::normalize_array`. The caller leaves the
    /// offending item exactly as written.
    pub(crate) fn warn(table: &str, key: &str, expected: &'static str, found: &'static str) {
        let mismatch = Self { table: table.to_string(), key: key.to_string(), expected, found };
        tracing::warn!(
            table = %mismatch.table,
            key = %mismatch.key,
            expected = mismatch.expected,
            found = mismatch.found,
            "leaving value of unexpected shape verbatim"
        );
    }
}
