#![deny(missing_docs)]

//! A deterministic, opinionated formatter for `pyproject.toml` manifests.
//!
//! [`format`] parses a manifest into a format-preserving `toml_edit` tree, applies a fixed
//! pipeline of per-table rewrites (key ordering, dependency and classifier normalization, array
//! layout), and re-serializes it. The only way [`format`] fails is on structurally invalid TOML;
//! a malformed dependency string or an unexpected value shape is a local, recoverable condition
//! that leaves the offending value untouched and is reported only through `tracing::warn!`.
//!
//! This crate has no file I/O, no CLI, and no `[tool.pyproject-fmt]` config discovery of its
//! own: callers that want the document's own `[tool.pyproject-fmt]` table to influence
//! [`Settings`] are responsible for reading it themselves.

mod classifiers;
mod dependency;
mod error;
mod interpreter;
mod layout;
mod pipeline;
mod settings;
mod tables;
mod tree;
mod value;

pub use error::{ParseError, ShapeMismatch, SpecError, SpecKind};
pub use settings::{PyVersion, Settings};

/// Formats `text`, a `pyproject.toml` document, according to `settings`.
///
/// Returns the reformatted document as UTF-8 text terminated by exactly one trailing newline.
/// Applying `format` to its own output with the same `settings` is a no-op: the pipeline is
/// idempotent.
///
/// # Errors
///
/// Returns [`ParseError`] when `text` is not valid TOML. Every other anomaly (a malformed
/// dependency specifier, a key holding an unexpected value shape) is handled locally: the
/// offending value is left exactly as written.
pub fn format(text: &str, settings: &Settings) -> Result<String, ParseError> {
    let mut document: toml_edit::DocumentMut = text.parse()?;
    pipeline::run(&mut document, settings);

    let mut rendered = document.to_string();
    let trimmed_len = rendered.trim_end_matches('\n').len();
    rendered.truncate(trimmed_len);
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_a_minimal_document() {
        let settings = Settings::default();
        let output = format("[project]\nname = 'Foo_Bar'\n", &settings).unwrap();
        assert_eq!(output, "[project]\nname = \"foo-bar\"\n");
    }

    #[test]
    fn output_always_ends_with_exactly_one_newline() {
        let settings = Settings::default();
        let output = format("[project]\nname = 'x'\n\n\n\n", &settings).unwrap();
        assert!(output.ends_with('\n'));
        assert!(!output.ends_with("\n\n"));
    }

    #[test]
    fn rejects_invalid_toml() {
        let settings = Settings::default();
        assert!(format("[project", &settings).is_err());
    }

    #[test]
    fn is_idempotent() {
        let settings = Settings::default();
        let input = "[project]\nname = \"x\"\nrequires-python = \">=3.8\"\n";
        let once = format(input, &settings).unwrap();
        let twice = format(&once, &settings).unwrap();
        assert_eq!(once, twice);
    }
}
