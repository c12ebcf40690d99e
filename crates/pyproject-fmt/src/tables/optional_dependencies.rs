//! `[project.optional-dependencies]`: sort extras ascending; each extra's array is normalized
//! the same way `project.dependencies` is (§4.5 rule 2 applied per extra).

use toml_edit::{DocumentMut, Item};

use crate::dependency;
use crate::settings::Settings;
use crate::tree;

pub(crate) fn rewrite(document: &mut DocumentMut, settings: &Settings) {
    let Some(project) = document.get_mut("project").and_then(Item::as_table_mut) else {
        return;
    };
    let Some(table) = project.get_mut("optional-dependencies").and_then(Item::as_table_mut) else {
        return;
    };
    tracing::debug!("rewriting [project.optional-dependencies]");

    let extras: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
    for extra in &extras {
        dependency::normalize_array(table, extra, settings, "project.optional-dependencies");
    }

    let mut sorted_extras = extras;
    sorted_extras.sort();
    tree::reorder(table, &sorted_extras);
}
