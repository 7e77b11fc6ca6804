//! Relation descriptors and the relation builder.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::error::TagError;
use crate::naming::DEFAULT_REFERENCED_COLUMN;
use crate::parser::FieldContext;
use crate::tag::{TagKey, TagOption};
use crate::types::{RecordType, TypeKind};

/// Kind of a relation between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// One-to-one relation (unique foreign key).
    OneToOne,
    /// One-to-many relation (foreign key on the many side).
    OneToMany,
    /// Many-to-one relation (foreign key on this side).
    ManyToOne,
    /// Many-to-many relation (requires a join table).
    ManyToMany,
}

impl RelationKind {
    /// Tag literal for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::OneToOne => "one-to-one",
            RelationKind::OneToMany => "one-to-many",
            RelationKind::ManyToOne => "many-to-one",
            RelationKind::ManyToMany => "many-to-many",
        }
    }

    /// Kind seen from the other side of the relation.
    pub fn mirror(&self) -> Self {
        match self {
            RelationKind::OneToMany => RelationKind::ManyToOne,
            RelationKind::ManyToOne => RelationKind::OneToMany,
            other => *other,
        }
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        *self == RelationKind::ManyToMany
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-to-one" => Ok(RelationKind::OneToOne),
            "one-to-many" => Ok(RelationKind::OneToMany),
            "many-to-one" => Ok(RelationKind::ManyToOne),
            "many-to-many" => Ok(RelationKind::ManyToMany),
            _ => Err(()),
        }
    }
}

/// A foreign-key column of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinColumnDescriptor {
    /// Foreign-key column name.
    pub name: String,
    /// Referenced column on the target.
    pub referenced_column: String,
}

impl JoinColumnDescriptor {
    /// Create a join column.
    pub fn new(name: impl Into<String>, referenced_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column: referenced_column.into(),
        }
    }

    /// Parse `col` or `col:refcol`. Returns `None` for an empty column name.
    pub fn parse(raw: &str) -> Option<Self> {
        let (name, referenced) = match raw.split_once(':') {
            Some((name, referenced)) => (name.trim(), referenced.trim()),
            None => (raw.trim(), ""),
        };
        if name.is_empty() {
            return None;
        }
        let referenced = if referenced.is_empty() {
            DEFAULT_REFERENCED_COLUMN
        } else {
            referenced
        };
        Some(Self::new(name, referenced))
    }
}

/// Mapping of one field to a relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationDescriptor {
    /// Name of the owning entity.
    pub entity: String,
    /// Field name as declared.
    pub field_name: String,
    /// Declared field type.
    pub field_type: TypeKind,
    /// Relation kind.
    pub kind: RelationKind,
    /// Target record type.
    pub target: RecordType,
    /// Target entity name.
    pub target_name: String,
    /// Whether this side declares the foreign key or join table.
    pub owning: bool,
    /// Foreign-key columns (owning side).
    pub join_columns: Vec<JoinColumnDescriptor>,
    /// Field on the target that owns the relation (inverse side).
    pub mapped_by: Option<String>,
    /// Join table (many-to-many owning side).
    pub join_table: Option<String>,
    /// Join-table columns pointing at the target.
    pub inverse_join_columns: Vec<JoinColumnDescriptor>,
}

impl RelationDescriptor {
    /// Check if this side only refers to the owning side.
    pub fn is_inverse(&self) -> bool {
        self.mapped_by.is_some()
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.kind.is_many_to_many()
    }
}

/// Build the relation for a field whose `relation` tag named `kind`.
///
/// Returns `None` when the field is dropped; the reason is recorded in
/// `diag`.
pub(crate) fn build_relation(
    ctx: &FieldContext<'_>,
    kind: RelationKind,
    options: &[TagOption],
    diag: &mut Diagnostics,
) -> Option<RelationDescriptor> {
    let field = ctx.field;
    let mut join_columns = Vec::new();
    let mut mapped_by = None;
    let mut join_table = None;
    let mut owning = false;
    let mut empty_join_column = false;

    for option in options {
        let Some(key) = option.tag_key() else {
            continue;
        };

        match key {
            TagKey::Relation => {}
            TagKey::JoinColumn => match JoinColumnDescriptor::parse(option.value_or_empty()) {
                Some(join_column) => {
                    join_columns.push(join_column);
                    owning = true;
                }
                None => {
                    empty_join_column = true;
                    diag.error(TagError::EmptyJoinColumn {
                        field: field.name.clone(),
                    });
                }
            },
            TagKey::MappedBy => match option.value.as_deref().filter(|v| !v.is_empty()) {
                Some(value) => {
                    mapped_by = Some(value.to_string());
                    owning = false;
                }
                None => diag.warn(&field.name, "mappedby tag without a field name is ignored"),
            },
            TagKey::JoinTable => match option.value.as_deref().filter(|v| !v.is_empty()) {
                Some(value) => {
                    join_table = Some(value.to_string());
                    owning = true;
                }
                None => diag.warn(&field.name, "jointable tag without a name is ignored"),
            },
            _ => diag.warn(
                &field.name,
                format!("column tag '{}' ignored on a relation field", option.key),
            ),
        }
    }

    let field_name = || field.name.clone();
    if !join_columns.is_empty() && mapped_by.is_some() {
        diag.error(TagError::JoinColumnWithMappedBy { field: field_name() });
        return None;
    }
    if kind.is_many_to_many() && mapped_by.is_none() && join_table.is_none() {
        diag.error(TagError::ManyToManyWithoutJoinTable { field: field_name() });
        return None;
    }
    if kind.is_many_to_many() && mapped_by.is_some() && join_table.is_some() {
        diag.error(TagError::InverseManyToManyWithJoinTable { field: field_name() });
        return None;
    }
    if join_table.is_some() && !kind.is_many_to_many() {
        diag.error(TagError::JoinTableOnNonManyToMany {
            field: field_name(),
            kind,
        });
        return None;
    }

    let Some(target) = relation_target(&field.kind) else {
        diag.error(TagError::InvalidRelationTarget {
            field: field_name(),
            kind: field.kind.to_string(),
        });
        return None;
    };

    if join_columns.is_empty() && join_table.is_none() && mapped_by.is_none() && !empty_join_column
    {
        diag.warn(
            &field.name,
            "relation declares neither joincolumn, jointable nor mappedby",
        );
    }

    Some(RelationDescriptor {
        entity: ctx.entity.to_string(),
        field_name: field.name.clone(),
        field_type: field.kind.clone(),
        kind,
        target,
        target_name: target.name().to_string(),
        owning,
        join_columns,
        mapped_by,
        join_table,
        inverse_join_columns: Vec::new(),
    })
}

/// Find the record type a relation field points at.
///
/// Accepts `T`, `Option<T>`, `Box<T>`, `Option<Box<T>>`, `Vec<T>` and
/// `Vec<Box<T>>` shapes (and an optional wrapper around the sequence).
pub fn relation_target(kind: &TypeKind) -> Option<RecordType> {
    let mut current = strip_pointer(kind);
    if let TypeKind::Sequence(inner) = current {
        current = strip_pointer(inner);
    }
    current.as_record()
}

fn strip_pointer(kind: &TypeKind) -> &TypeKind {
    let kind = match kind {
        TypeKind::Nullable(inner) => inner.as_ref(),
        other => other,
    };
    match kind {
        TypeKind::Pointer(inner) => inner.as_ref(),
        other => other,
    }
}
