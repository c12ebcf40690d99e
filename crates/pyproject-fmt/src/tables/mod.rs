//! Per-table rewriters (component E), applied in the fixed order described in `pipeline`.

pub(crate) mod build_system;
pub(crate) mod entry_points;
pub(crate) mod optional_dependencies;
pub(crate) mod project;
pub(crate) mod scripts;
pub(crate) mod tool;
