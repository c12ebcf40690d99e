//! Array layout: deciding between a single-line and a one-element-per-line rendering, and
//! building the resulting `toml_edit::Array`.
//!
//! Rather than mutate an existing `Array`'s per-element `Decor` in place, elements are rendered
//! to a literal TOML snippet and reparsed: `"key = <snippet>".parse::<DocumentMut>()` is a
//! standard `toml_edit` idiom for producing a `Value` with exact, hand-chosen formatting (quote
//! style, indentation, trailing commas) that would otherwise require threading raw `RawString`s
//! through several `Decor` calls. `toml_edit::Array`/`Item` have no public "parse a bare value"
//! entry point, so the snippet is wrapped in a throwaway `k = ...` document and the value is
//! plucked back out.

use toml_edit::{Array, DocumentMut, Item, TomlError, Value};

use crate::settings::Settings;

/// One already-quoted array element, with an optional trailing comment (the text after `#`,
/// not including the `#` itself).
pub(crate) struct Element {
    pub(crate) literal: String,
    pub(crate) comment: Option<String>,
}

impl Element {
    pub(crate) fn plain(literal: String) -> Self {
        Self { literal, comment: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    Inline,
    Expanded,
}

/// Whether `array`, as it appeared in the source, was already laid out one element per line.
pub(crate) fn was_expanded(array: &Array) -> bool {
    let element_has_newline = array.iter().any(|value| value.decor().prefix().and_then(|p| p.as_str()).is_some_and(|s| s.contains('\n')));
    let trailing_has_newline = array.trailing().as_str().is_some_and(|s| s.contains('\n'));
    element_has_newline || (array.is_empty() && trailing_has_newline)
}

/// Decides the layout for `elements` under `key`, given the array's original layout (`None` for
/// a freshly-introduced array) and whether a table-specific rule forces expansion regardless of
/// width.
pub(crate) fn decide(original: Option<&Array>, key: &str, elements: &[Element], settings: &Settings, force_expand: bool) -> Layout {
    if force_expand {
        return Layout::Expanded;
    }
    if original.is_some_and(was_expanded) {
        return Layout::Expanded;
    }
    if elements.iter().any(|element| element.comment.is_some()) {
        return Layout::Expanded;
    }
    let inline_text = render_inline_text(elements);
    let line_width = key.len() + " = ".len() + inline_text.len();
    if line_width <= settings.column_width {
        Layout::Inline
    } else {
        Layout::Expanded
    }
}

fn render_inline_text(elements: &[Element]) -> String {
    if elements.is_empty() {
        return "[]".to_string();
    }
    let body = elements.iter().map(|element| element.literal.as_str()).collect::<Vec<_>>().join(", ");
    format!("[ {body} ]")
}

fn render_expanded_text(elements: &[Element], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::from("[\n");
    for element in elements {
        out.push_str(&pad);
        out.push_str(&element.literal);
        out.push(',');
        if let Some(comment) = &element.comment {
            out.push_str(" # ");
            out.push_str(comment);
        }
        out.push('\n');
    }
    out.push(']');
    out
}

/// Parses a bare TOML value by wrapping it as `__value__ = <text>` and plucking the value back
/// out of the throwaway document.
pub(crate) fn parse_value(text: &str) -> Result<Value, TomlError> {
    let wrapped = format!("__value__ = {text}");
    let document: DocumentMut = wrapped.parse()?;
    match document["__value__"].clone() {
        Item::Value(value) => Ok(value),
        _ => unreachable!("a bare value always parses back as Item::Value"),
    }
}

/// Builds the array `Item` for `key`, choosing inline or expanded layout.
pub(crate) fn build(original: Option<&Array>, key: &str, elements: &[Element], settings: &Settings, force_expand: bool) -> Result<Item, TomlError> {
    let layout = decide(original, key, elements, settings, force_expand);
    let text = match layout {
        Layout::Inline => render_inline_text(elements),
        Layout::Expanded => render_expanded_text(elements, settings.indent),
    };
    let value = parse_value(&text)?;
    Ok(Item::Value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn short_array_stays_inline() {
        let settings = Settings::default();
        let elements = vec![Element::plain("\"a\"".to_string()), Element::plain("\"b\"".to_string())];
        let item = build(None, "keywords", &elements, &settings, false).unwrap();
        assert_eq!(item.to_string(), "[ \"a\", \"b\" ]");
    }

    #[test]
    fn forced_expansion_always_expands() {
        let settings = Settings::default();
        let elements = vec![Element::plain("\"a\"".to_string())];
        let item = build(None, "classifiers", &elements, &settings, true).unwrap();
        assert_eq!(item.to_string(), "[\n  \"a\",\n]");
    }

    #[test]
    fn empty_array_has_no_padding() {
        let settings = Settings::default();
        let item = build(None, "keywords", &[], &settings, false).unwrap();
        assert_eq!(item.to_string(), "[]");
    }

    #[test]
    fn indent_is_configurable() {
        let mut settings = Settings::default();
        settings.indent = 4;
        let elements = vec![Element::plain("\"a\"".to_string())];
        let item = build(None, "classifiers", &elements, &settings, true).unwrap();
        assert_eq!(item.to_string(), "[\n    \"a\",\n]");
    }
}
