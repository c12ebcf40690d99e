//! Small `toml_edit` helpers shared by the table rewriters.

use toml_edit::{Item, Table};

/// Replaces the value stored under `key`, keeping the key's own formatting (leading blank
/// lines/comments) intact. Plain `Table::insert(&str, ..)` would build a brand-new `Key` with
/// default decor, silently dropping any comment written directly above the entry.
pub(crate) fn set_preserving_key(table: &mut Table, key: &str, item: Item) {
    if let Some(existing) = table.key(key).cloned() {
        table.insert_formatted(&existing, item);
    } else {
        table.insert(key, item);
    }
}

/// Reinserts every entry of `table` in `order`, preserving each entry's own key formatting
/// (leading blank lines/comments). `order` must be a permutation of `table`'s current keys;
/// any current key missing from `order` is dropped.
pub(crate) fn reorder(table: &mut Table, order: &[String]) {
    let mut entries = Vec::with_capacity(order.len());
    for key in order {
        if let Some(existing_key) = table.key(key).cloned() {
            if let Some(item) = table.remove(key) {
                entries.push((existing_key, item));
            }
        }
    }
    for (key, item) in entries {
        table.insert_formatted(&key, item);
    }
}
