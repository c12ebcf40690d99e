//! `[build-system]`: sort keys ascending, always expand `requires`.

use toml_edit::{DocumentMut, Item, Table};

use crate::dependency;
use crate::error::ShapeMismatch;
use crate::layout::{self, Element};
use crate::settings::Settings;
use crate::tree;

pub(crate) fn rewrite(document: &mut DocumentMut, settings: &Settings) {
    let Some(table) = document.get_mut("build-system").and_then(Item::as_table_mut) else {
        return;
    };
    tracing::debug!("rewriting [build-system]");
    table.sort_values_by(|k1, _, k2, _| k1.get().cmp(k2.get()));
    expand_requires(table, settings);
}

fn expand_requires(table: &mut Table, settings: &Settings) {
    let Some(item) = table.get("requires") else { return };
    let Some(array) = item.as_array() else {
        ShapeMismatch::warn("build-system", "requires", "array", item.type_name());
        return;
    };
    let array = array.clone();

    let mut elements = Vec::with_capacity(array.len());
    for value in array.iter() {
        let Some(raw) = value.as_str() else {
            ShapeMismatch::warn("build-system", "requires", "string element", value.type_name());
            return;
        };
        match dependency::normalize(raw, settings, "build-system", "requires") {
            Ok(normalized) => elements.push(Element::plain(dependency::quote(&normalized.rendered))),
            Err(spec_error) => {
                tracing::warn!(table = %spec_error.table, key = %spec_error.key, reason = %spec_error.kind, "leaving unparsable build-system requirement verbatim");
                elements.push(Element::plain(dependency::quote(raw)));
            }
        }
    }

    if let Ok(item) = layout::build(Some(&array), "requires", &elements, settings, true) {
        tree::set_preserving_key(table, "requires", item);
    }
}
