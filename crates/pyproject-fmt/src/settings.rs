//! The formatter's configuration surface.

use serde::Deserialize;

/// An inclusive `(major, minor)` interpreter version bound, e.g. `(3, 8)` for Python 3.8.
pub type PyVersion = (u8, u8);

/// Configuration accepted by [`crate::format`].
///
/// This struct owns no discovery logic of its own: a caller that wants `[tool.pyproject-fmt]`
/// in the document being formatted to influence the result is responsible for reading that
/// table and building a `Settings` from it before calling `format`. The core formatter never
/// looks at that table itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    /// Maximum line width used by the array/inline-table layout heuristics.
    pub column_width: usize,
    /// Number of spaces used to indent expanded arrays and their elements.
    pub indent: usize,
    /// When `false` (the default), trailing `.0` release segments of pinned dependency
    /// versions are stripped, e.g. `numpy==1.20.0` becomes `numpy==1.20`.
    pub keep_full_version: bool,
    /// Inclusive lower bound of the interpreter versions classifiers are synthesized for.
    pub min_supported_python: PyVersion,
    /// Inclusive upper bound of the interpreter versions classifiers are synthesized for.
    pub max_supported_python: PyVersion,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            column_width: 120,
            indent: 2,
            keep_full_version: false,
            min_supported_python: (3, 8),
            max_supported_python: (3, 12),
        }
    }
}
