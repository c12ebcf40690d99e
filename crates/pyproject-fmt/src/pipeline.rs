//! Pipeline driver (component G): applies the per-table rewriters in the fixed order from the
//! per-table-rewriter design, then serializes.

use toml_edit::DocumentMut;

use crate::settings::Settings;
use crate::tables::{build_system, entry_points, optional_dependencies, project, scripts, tool};

pub(crate) fn run(document: &mut DocumentMut, settings: &Settings) {
    tracing::debug!(bytes = document.to_string().len(), "starting formatting pipeline");

    build_system::rewrite(document, settings);
    project::rewrite(document, settings);
    scripts::rewrite(document);
    entry_points::rewrite(document);
    optional_dependencies::rewrite(document, settings);
    tool::rewrite(document);

    tracing::debug!("finished formatting pipeline");
}
