//! `[tool.*]`: contents are preserved verbatim (keys, values, comments, nesting); the one thing
//! this stage normalizes is the number of blank lines separating sibling entries, recursively
//! through every nested table — an author's stray three-blank-line gap between `[tool.black]`
//! and `[tool.mypy]` collapses to one, the same way the rest of the document's layout is
//! canonicalized to a single house style rather than whatever the author happened to type.

use toml_edit::{DocumentMut, Item, Table};

pub(crate) fn rewrite(document: &mut DocumentMut) {
    let Some(tool) = document.get_mut("tool").and_then(Item::as_table_mut) else {
        return;
    };
    tracing::debug!("normalizing blank lines within [tool.*]");
    normalize_blank_lines(tool);
}

/// Collapses every run of 2+ consecutive blank lines in each entry's leading decor down to a
/// single blank line, then recurses into any nested table (`[tool.group.subgroup]`).
fn normalize_blank_lines(table: &mut Table) {
    let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
    for key in &keys {
        if let Some(existing_key) = table.key(key).cloned() {
            let prefix = existing_key.decor().prefix().and_then(|p| p.as_str()).unwrap_or("").to_string();
            let collapsed = collapse_blank_lines(&prefix);
            if collapsed != prefix {
                let mut new_key = existing_key;
                new_key.decor_mut().set_prefix(collapsed);
                if let Some(item) = table.remove(key) {
                    table.insert_formatted(&new_key, item);
                }
            }
        }
        if let Some(nested) = table.get_mut(key).and_then(Item::as_table_mut) {
            normalize_blank_lines(nested);
        }
    }
}

/// Caps any run of consecutive newlines at two (i.e. at most one blank line), leaving
/// non-blank-line content (indentation, comments) untouched.
fn collapse_blank_lines(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    let mut consecutive_newlines = 0usize;
    for ch in prefix.chars() {
        if ch == '\n' {
            consecutive_newlines += 1;
            if consecutive_newlines <= 2 {
                out.push(ch);
            }
        } else {
            consecutive_newlines = 0;
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_multiple_blank_lines_to_one() {
        assert_eq!(collapse_blank_lines("\n\n\n\n"), "\n\n");
        assert_eq!(collapse_blank_lines("\n\n"), "\n\n");
        assert_eq!(collapse_blank_lines("\n"), "\n");
    }

    #[test]
    fn preserves_comments_around_collapsed_blank_runs() {
        assert_eq!(collapse_blank_lines("\n\n\n# comment\n"), "\n\n# comment\n");
    }

    #[test]
    fn collapses_excess_blank_lines_between_tool_entries() {
        let mut document: DocumentMut = "[tool.black]\nline-length = 100\n\n\n\n[tool.mypy]\nstrict = true\n".parse().unwrap();
        rewrite(&mut document);
        let rendered = document.to_string();
        assert!(rendered.contains("line-length = 100\n\n[tool.mypy]"));
        assert!(!rendered.contains("100\n\n\n"));
    }

    #[test]
    fn recurses_into_nested_tool_tables() {
        let mut document: DocumentMut = "[tool.ruff]\n\n[tool.ruff.lint]\nselect = [\"E\"]\n\n\n\nignore = [\"F401\"]\n".parse().unwrap();
        rewrite(&mut document);
        let rendered = document.to_string();
        assert!(!rendered.contains("\"E\"]\n\n\n\n"));
    }

    #[test]
    fn no_tool_table_is_a_no_op() {
        let mut document: DocumentMut = "[project]\nname = \"x\"\n".parse().unwrap();
        rewrite(&mut document);
        assert_eq!(document.to_string(), "[project]\nname = \"x\"\n");
    }
}
