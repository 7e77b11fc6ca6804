//! Entity metadata aggregate.

use std::collections::HashMap;

use serde::Serialize;

use crate::column::ColumnDescriptor;
use crate::error::Error;
use crate::relation::RelationDescriptor;
use crate::types::RecordType;

/// Table mapping derived from one record type.
///
/// Built once per type and shared read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct EntityMetadata {
    /// Record type this metadata describes.
    #[serde(skip)]
    record: RecordType,
    /// Logical entity name.
    name: String,
    /// Storage table name.
    table_name: String,
    /// Mapped columns in declaration order.
    columns: Vec<ColumnDescriptor>,
    /// Relations in declaration order.
    relations: Vec<RelationDescriptor>,
    /// Non-fatal problems found while parsing.
    warnings: Vec<String>,
    #[serde(skip)]
    columns_by_field: HashMap<String, usize>,
    #[serde(skip)]
    columns_by_name: HashMap<String, usize>,
    #[serde(skip)]
    relations_by_field: HashMap<String, usize>,
    #[serde(skip)]
    primary_keys: Vec<usize>,
    #[serde(skip)]
    created_at: Option<usize>,
    #[serde(skip)]
    updated_at: Option<usize>,
    #[serde(skip)]
    deleted_at: Option<usize>,
}

impl EntityMetadata {
    /// Create empty metadata for a record type.
    pub fn new(record: RecordType, table_name: impl Into<String>) -> Self {
        Self {
            record,
            name: record.name().to_string(),
            table_name: table_name.into(),
            columns: Vec::new(),
            relations: Vec::new(),
            warnings: Vec::new(),
            columns_by_field: HashMap::new(),
            columns_by_name: HashMap::new(),
            relations_by_field: HashMap::new(),
            primary_keys: Vec::new(),
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Record type handle.
    pub fn record(&self) -> RecordType {
        self.record
    }

    /// Logical entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Mapped columns in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Column mapped from a field.
    pub fn column_by_field(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns_by_field.get(field).map(|&i| &self.columns[i])
    }

    /// Column by storage name.
    pub fn column_by_name(&self, column: &str) -> Option<&ColumnDescriptor> {
        self.columns_by_name.get(column).map(|&i| &self.columns[i])
    }

    /// Primary-key columns in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.primary_keys.iter().map(|&i| &self.columns[i])
    }

    /// Creation timestamp column.
    pub fn created_at(&self) -> Option<&ColumnDescriptor> {
        self.created_at.map(|i| &self.columns[i])
    }

    /// Modification timestamp column.
    pub fn updated_at(&self) -> Option<&ColumnDescriptor> {
        self.updated_at.map(|i| &self.columns[i])
    }

    /// Soft-delete timestamp column.
    pub fn deleted_at(&self) -> Option<&ColumnDescriptor> {
        self.deleted_at.map(|i| &self.columns[i])
    }

    /// Check if rows of this entity are soft deleted.
    pub fn has_soft_delete(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Relations in declaration order.
    pub fn relations(&self) -> &[RelationDescriptor] {
        &self.relations
    }

    /// Relation mapped from a field.
    pub fn relation_by_field(&self, field: &str) -> Option<&RelationDescriptor> {
        self.relations_by_field.get(field).map(|&i| &self.relations[i])
    }

    /// Non-fatal problems found while parsing.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// JSON snapshot for tooling.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Storage column name already claimed, and by which field.
    pub(crate) fn column_owner(&self, column: &str) -> Option<&str> {
        self.column_by_name(column).map(|c| c.field_name.as_str())
    }

    /// Append a column and index it.
    ///
    /// The first column flagged for each timestamp role keeps the role;
    /// the names of roles that were already taken are returned.
    pub(crate) fn push_column(&mut self, column: ColumnDescriptor) -> Vec<&'static str> {
        let index = self.columns.len();
        let mut taken = Vec::new();

        self.columns_by_field.insert(column.field_name.clone(), index);
        self.columns_by_name.entry(column.name.clone()).or_insert(index);
        if column.primary_key {
            self.primary_keys.push(index);
        }
        for (flag, slot, role) in [
            (column.created_at, &mut self.created_at, "createdat"),
            (column.updated_at, &mut self.updated_at, "updatedat"),
            (column.deleted_at, &mut self.deleted_at, "deletedat"),
        ] {
            if !flag {
                continue;
            }
            if slot.is_some() {
                taken.push(role);
            } else {
                *slot = Some(index);
            }
        }

        self.columns.push(column);
        taken
    }

    /// Append a relation and index it.
    pub(crate) fn push_relation(&mut self, relation: RelationDescriptor) {
        self.relations_by_field
            .insert(relation.field_name.clone(), self.relations.len());
        self.relations.push(relation);
    }

    pub(crate) fn set_warnings(&mut self, warnings: Vec<String>) {
        self.warnings = warnings;
    }
}
