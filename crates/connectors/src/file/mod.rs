//! Loads flat tabular files into [`RowData`](model::records::row::RowData)
//! records, ready to be served by a [`MemoryTable`](crate::memory::MemoryTable).

pub mod csv;
pub mod json;
pub mod types;

use std::path::Path;

/// Entity name for records loaded from `path`: the file stem.
fn entity_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}
