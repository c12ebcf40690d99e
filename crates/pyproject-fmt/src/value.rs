//! String and identifier normalization (component D).

/// Canonicalizes a project name: lowercased, runs of `.`, `_`, `-` collapsed to a single `-`,
/// with no leading or trailing separator.
pub(crate) fn canonicalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_separator = false;
    for ch in lower.chars() {
        if matches!(ch, '.' | '_' | '-') {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;
        out.push(ch);
    }
    out
}

/// Collapses a (possibly multi-line) prose string to a single line: every run of whitespace
/// becomes a single space, and the result is trimmed at both ends.
pub(crate) fn collapse_prose(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}

/// Quotes an arbitrary string as a plain double-quoted TOML string, escaping backslashes and
/// double quotes. Used for values that aren't dependency specifiers, which instead go through
/// [`crate::dependency::quote`]'s three-way rule.
pub(crate) fn plain_quote(raw: &str) -> String {
    let escaped = raw.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_collapses_separators_and_lowercases() {
        assert_eq!(canonicalize_name("Friendly-Bard"), "friendly-bard");
        assert_eq!(canonicalize_name("a.-..-__B"), "a-b");
        assert_eq!(canonicalize_name("__leading_and_trailing__"), "leading-and-trailing");
    }

    #[test]
    fn prose_collapses_internal_whitespace_and_trims() {
        assert_eq!(collapse_prose(" Magical stuff\t"), "Magical stuff");
        assert_eq!(collapse_prose("A multi-line\n   description."), "A multi-line description.");
    }
}
