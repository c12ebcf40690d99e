//! `[project.entry-points]`: sort outer group names ascending; within each group, sort keys
//! ascending (quoted keys collated by their raw string) and render the group as a single inline
//! table.

use toml_edit::{DocumentMut, Item, Table};

use crate::error::ShapeMismatch;
use crate::layout;
use crate::tree;
use crate::value;

pub(crate) fn rewrite(document: &mut DocumentMut) {
    let Some(project) = document.get_mut("project").and_then(Item::as_table_mut) else {
        return;
    };
    let Some(entry_points) = project.get_mut("entry-points").and_then(Item::as_table_mut) else {
        return;
    };
    tracing::debug!("rewriting [project.entry-points]");

    let groups: Vec<String> = entry_points.iter().map(|(k, _)| k.to_string()).collect();
    for group in &groups {
        rewrite_group(entry_points, group);
    }

    let mut sorted_groups = groups;
    sorted_groups.sort();
    tree::reorder(entry_points, &sorted_groups);
}

fn rewrite_group(entry_points: &mut Table, group: &str) {
    let Some(item) = entry_points.get(group) else {
        return;
    };
    let Some(mut pairs) = extract_entries(item) else {
        ShapeMismatch::warn("project.entry-points", group, "table", item.type_name());
        return;
    };
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let body = pairs.iter().map(|(key, value)| format!("{} = {}", format_key(key), value::plain_quote(value))).collect::<Vec<_>>().join(",");
    let text = format!("{{{body}}}");
    if let Ok(new_value) = layout::parse_value(&text) {
        tree::set_preserving_key(entry_points, group, Item::Value(new_value));
    }
}

fn extract_entries(item: &Item) -> Option<Vec<(String, String)>> {
    if let Some(table) = item.as_table() {
        let mut out = Vec::with_capacity(table.len());
        for (key, value) in table.iter() {
            out.push((key.to_string(), value.as_str()?.to_string()));
        }
        Some(out)
    } else if let Some(inline) = item.as_inline_table() {
        let mut out = Vec::with_capacity(inline.len());
        for (key, value) in inline.iter() {
            out.push((key.to_string(), value.as_str()?.to_string()));
        }
        Some(out)
    } else {
        None
    }
}

fn format_key(key: &str) -> String {
    let bare_safe = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare_safe {
        key.to_string()
    } else {
        value::plain_quote(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_groups_and_entries_and_renders_inline() {
        let mut document: DocumentMut = "[project.entry-points.beta]\nD = \"d\"\nC = \"c\"\n\n[project.entry-points.alpha]\nB = \"b\"\n\"A.A\" = \"a\"\n".parse().unwrap();
        rewrite(&mut document);
        let rendered = document.to_string();
        let alpha_pos = rendered.find("alpha").unwrap();
        let beta_pos = rendered.find("beta").unwrap();
        assert!(alpha_pos < beta_pos);
        assert!(rendered.contains("{\"A.A\" = \"a\",B = \"b\"}"));
        assert!(rendered.contains("{C = \"c\",D = \"d\"}"));
    }
}
