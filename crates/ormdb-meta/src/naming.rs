//! Generated-name conventions.
//!
//! These names are a compatibility surface for the query and migration
//! layers; keep them stable.

use convert_case::{Case, Casing};

/// Referenced column used when a join column does not name one.
pub const DEFAULT_REFERENCED_COLUMN: &str = "id";

/// Storage column name for a field.
pub fn column_name(field: &str) -> String {
    field.to_case(Case::Snake)
}

/// Inferred table name for a record type: snake case plus `s`.
pub fn table_name(type_name: &str) -> String {
    format!("{}s", type_name.to_case(Case::Snake))
}

/// Generated name for a plain index.
pub fn index_name(table: &str, column: &str) -> String {
    format!("idx_{table}_{column}")
}

/// Generated name for a unique index.
pub fn unique_index_name(table: &str, column: &str) -> String {
    format!("uidx_{table}_{column}")
}
