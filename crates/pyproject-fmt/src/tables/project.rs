//! `[project]`: fixed key order, name/description canonicalization, classifier synthesis,
//! dependency normalization.

use toml_edit::{DocumentMut, Item, Table};

use crate::classifiers;
use crate::dependency;
use crate::error::ShapeMismatch;
use crate::layout::{self, Element};
use crate::settings::Settings;
use crate::tree;
use crate::value;

const KEY_ORDER: &[&str] = &[
    "name",
    "version",
    "description",
    "readme",
    "keywords",
    "license",
    "license-files",
    "authors",
    "maintainers",
    "requires-python",
    "classifiers",
    "dynamic",
    "dependencies",
    "optional-dependencies",
    "urls",
    "scripts",
    "gui-scripts",
    "entry-points",
];

pub(crate) fn rewrite(document: &mut DocumentMut, settings: &Settings) {
    let Some(table) = document.get_mut("project").and_then(Item::as_table_mut) else {
        return;
    };
    tracing::debug!("rewriting [project]");

    normalize_name(table);
    normalize_description(table);

    let requires_python = table.get("requires-python").and_then(Item::as_str).map(str::to_string);
    normalize_classifiers(table, requires_python.as_deref(), settings);
    dependency::normalize_array(table, "dependencies", settings, "project");
    normalize_plain_array(table, "keywords", settings, false);
    normalize_plain_array(table, "dynamic", settings, false);

    reorder_keys(table);
}

fn normalize_name(table: &mut Table) {
    let Some(item) = table.get("name") else { return };
    let Some(raw) = item.as_str() else {
        ShapeMismatch::warn("project", "name", "string", item.type_name());
        return;
    };
    let canonical = value::canonicalize_name(raw);
    if let Ok(new_value) = layout::parse_value(&value::plain_quote(&canonical)) {
        tree::set_preserving_key(table, "name", Item::Value(new_value));
    }
}

fn normalize_description(table: &mut Table) {
    let Some(item) = table.get("description") else { return };
    let Some(raw) = item.as_str() else {
        ShapeMismatch::warn("project", "description", "string", item.type_name());
        return;
    };
    let collapsed = value::collapse_prose(raw);
    if let Ok(new_value) = layout::parse_value(&value::plain_quote(&collapsed)) {
        tree::set_preserving_key(table, "description", Item::Value(new_value));
    }
}

fn normalize_classifiers(table: &mut Table, requires_python: Option<&str>, settings: &Settings) {
    let Some(item) = table.get("classifiers") else { return };
    let Some(array) = item.as_array() else {
        ShapeMismatch::warn("project", "classifiers", "array", item.type_name());
        return;
    };
    let array = array.clone();
    let mut current = Vec::with_capacity(array.len());
    for value in array.iter() {
        let Some(s) = value.as_str() else {
            ShapeMismatch::warn("project", "classifiers", "string element", value.type_name());
            return;
        };
        current.push(s.to_string());
    }

    let mut merged = classifiers::synthesize(&current, requires_python, settings).unwrap_or(current);
    merged.sort_by(|a, b| classifiers::cmp(a, b));

    let elements: Vec<Element> = merged.into_iter().map(|c| Element::plain(value::plain_quote(&c))).collect();
    if let Ok(item) = layout::build(Some(&array), "classifiers", &elements, settings, true) {
        tree::set_preserving_key(table, "classifiers", item);
    }
}

fn normalize_plain_array(table: &mut Table, key: &str, settings: &Settings, force_expand: bool) {
    let Some(item) = table.get(key) else { return };
    let Some(array) = item.as_array() else {
        ShapeMismatch::warn("project", key, "array", item.type_name());
        return;
    };
    let array = array.clone();
    let mut elements = Vec::with_capacity(array.len());
    for value in array.iter() {
        let Some(s) = value.as_str() else {
            ShapeMismatch::warn("project", key, "string element", value.type_name());
            return;
        };
        elements.push(Element::plain(value::plain_quote(s)));
    }
    if let Ok(item) = layout::build(Some(&array), key, &elements, settings, force_expand) {
        tree::set_preserving_key(table, key, item);
    }
}

/// Moves every entry of `table` into [`KEY_ORDER`]'s order; any key not in that list is appended
/// at the end, keeping its position relative to other unrecognized keys.
fn reorder_keys(table: &mut Table) {
    let present: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
    let mut order: Vec<String> = KEY_ORDER.iter().map(|s| (*s).to_string()).filter(|k| present.contains(k)).collect();
    for key in &present {
        if !order.contains(key) {
            order.push(key.clone());
        }
    }
    tree::reorder(table, &order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorders_unknown_keys_after_known_ones() {
        let mut document: DocumentMut = "[project]\nfoo = 1\nname = \"x\"\n".parse().unwrap();
        let settings = Settings::default();
        rewrite(&mut document, &settings);
        let table = document["project"].as_table().unwrap();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "foo"]);
    }
}
