//! Dependency-specifier (PEP 508) parsing, version trimming and re-serialization.
//!
//! Re-serialization deliberately does not reuse `pep508_rs::Requirement`'s own `Display` impl:
//! that impl matches the wire format a general-purpose PEP 508 library should produce (a space
//! before the version specifiers, `" @ "`, `" ; "`), which is correct for that crate but is not
//! this formatter's house style, which omits the space before specifiers and before `@`, keeps
//! one space after `@`, and adds one before `;` only when a URL precedes the marker.

use std::fmt::Write as _;
use std::str::FromStr;

use pep440_rs::VersionSpecifier;
use pep508_rs::{Requirement, VersionOrUrl};
use toml_edit::Table;

use crate::error::{ShapeMismatch, SpecError, SpecKind};
use crate::layout::{self, Element};
use crate::settings::Settings;
use crate::tree;

/// A dependency specifier already rendered to this crate's canonical textual form.
pub(crate) struct NormalizedDependency {
    /// The fully rendered, unquoted dependency text, e.g. `packaging>=20; python_version > "3.4"`.
    pub(crate) rendered: String,
    /// Case-insensitive distribution name, used as the primary sort key.
    pub(crate) sort_name: String,
}

/// Parses, trims and re-renders a dependency string.
///
/// Returns `Err` (the caller leaves the value untouched) when `raw` doesn't parse as a PEP 508
/// dependency specifier.
pub(crate) fn normalize(raw: &str, settings: &Settings, table: &str, key: &str) -> Result<NormalizedDependency, SpecError> {
    let requirement = Requirement::from_str(raw).map_err(|_| SpecError {
        table: table.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
        kind: SpecKind::DependencySpecifier,
    })?;

    Ok(NormalizedDependency {
        sort_name: requirement.name.to_lowercase(),
        rendered: render(&requirement, settings),
    })
}

fn render(requirement: &Requirement, settings: &Settings) -> String {
    let mut out = requirement.name.clone();
    if let Some(extras) = &requirement.extras {
        let _ = write!(out, "[{}]", extras.join(","));
    }

    let mut had_url = false;
    if let Some(version_or_url) = &requirement.version_or_url {
        match version_or_url {
            VersionOrUrl::VersionSpecifier(specifiers) => {
                let rendered: Vec<String> = specifiers.iter().map(|specifier| trim_specifier(specifier, settings.keep_full_version).to_string()).collect();
                out.push_str(&rendered.join(", "));
            }
            VersionOrUrl::Url(url) => {
                let _ = write!(out, "@ {url}");
                had_url = true;
            }
        }
    }

    if let Some(marker) = &requirement.marker {
        if had_url {
            out.push(' ');
        }
        let _ = write!(out, "; {marker}");
    }
    out
}

fn trim_specifier(specifier: &VersionSpecifier, keep_full_version: bool) -> VersionSpecifier {
    if keep_full_version || specifier.is_star() {
        return specifier.clone();
    }
    let trimmed = specifier.version().without_trailing_zeros();
    VersionSpecifier::new(*specifier.operator(), trimmed, false).unwrap_or_else(|_| specifier.clone())
}

/// Picks this crate's three-way TOML quoting rule for an already-rendered dependency string:
/// double quotes when possible, single quotes when the text contains a double quote but no
/// single quote, and double quotes with the inner double quote escaped when it contains both.
pub(crate) fn quote(rendered: &str) -> String {
    let has_double = rendered.contains('"');
    let has_single = rendered.contains('\'');
    if !has_double {
        format!("\"{rendered}\"")
    } else if !has_single {
        format!("'{rendered}'")
    } else {
        format!("\"{}\"", rendered.replace('"', "\\\""))
    }
}

/// Normalizes, sorts and force-expands the dependency array stored under `key` in `table`.
///
/// Used for `project.dependencies` and, per extra, for `project.optional-dependencies`. Entries
/// that fail to parse are left exactly as written and excluded from the sort key derivation
/// (they sort by their own raw text), matching the "local failure, rest of the pipeline keeps
/// going" policy.
pub(crate) fn normalize_array(table: &mut Table, key: &str, settings: &Settings, table_path: &str) {
    let Some(item) = table.get(key) else { return };
    let Some(array) = item.as_array() else {
        ShapeMismatch::warn(table_path, key, "array", item.type_name());
        return;
    };
    let array = array.clone();

    let mut rendered = Vec::with_capacity(array.len());
    for value in array.iter() {
        let Some(raw) = value.as_str() else {
            ShapeMismatch::warn(table_path, key, "string element", value.type_name());
            return;
        };
        match normalize(raw, settings, table_path, key) {
            Ok(normalized) => rendered.push(normalized),
            Err(spec_error) => {
                tracing::warn!(
                    table = %spec_error.table,
                    key = %spec_error.key,
                    reason = %spec_error.kind,
                    "leaving unparsable dependency specifier verbatim"
                );
                rendered.push(NormalizedDependency {
                    rendered: raw.to_string(),
                    sort_name: raw.to_lowercase(),
                });
            }
        }
    }

    rendered.sort_by(|a, b| a.sort_name.cmp(&b.sort_name).then_with(|| a.rendered.cmp(&b.rendered)));

    let elements: Vec<Element> = rendered.into_iter().map(|d| Element::plain(quote(&d.rendered))).collect();
    if let Ok(item) = layout::build(Some(&array), key, &elements, settings, true) {
        tree::set_preserving_key(table, key, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_zero_by_default() {
        let settings = Settings::default();
        let normalized = normalize("numpy==1.20.0", &settings, "project", "dependencies").unwrap();
        assert_eq!(normalized.rendered, "numpy==1.20");
        assert_eq!(normalized.sort_name, "numpy");
    }

    #[test]
    fn keep_full_version_preserves_trailing_zero() {
        let mut settings = Settings::default();
        settings.keep_full_version = true;
        let normalized = normalize("numpy==1.20.0", &settings, "project", "dependencies").unwrap();
        assert_eq!(normalized.rendered, "numpy==1.20.0");
    }

    #[test]
    fn marker_has_no_leading_space_before_specifier() {
        let settings = Settings::default();
        let normalized = normalize("requests>=2; python_version>\"3.8\"", &settings, "project", "dependencies").unwrap();
        assert_eq!(normalized.rendered, "requests>=2; python_version > \"3.8\"");
    }

    #[test]
    fn url_gets_a_space_before_the_marker() {
        let settings = Settings::default();
        let normalized = normalize("foo @ https://example.org/foo.whl ; sys_platform == \"linux\"", &settings, "project", "dependencies").unwrap();
        assert_eq!(normalized.rendered, "foo@ https://example.org/foo.whl ; sys_platform == \"linux\"");
    }

    #[test]
    fn quote_prefers_double() {
        assert_eq!(quote("numpy==1.20"), "\"numpy==1.20\"");
    }

    #[test]
    fn quote_falls_back_to_single_when_double_quote_present() {
        assert_eq!(quote(r#"foo; platform_system == "Linux""#), "'foo; platform_system == \"Linux\"'");
    }

    #[test]
    fn quote_escapes_when_both_present() {
        assert_eq!(quote("foo; a == \"b\" or a == 'c'"), "\"foo; a == \\\"b\\\" or a == 'c'\"");
    }
}
