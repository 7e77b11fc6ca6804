//! Error types for metadata extraction.

use thiserror::Error;

use crate::relation::RelationKind;

/// Metadata errors surfaced to callers.
#[derive(Debug, Error)]
pub enum Error {
    /// The parse target is absent or is not a record type.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more fields of an entity carried invalid annotations.
    ///
    /// Only the first problem found is reported; every other problem
    /// is logged as a warning during the scan.
    #[error("failed to parse entity {entity}: {source}")]
    Entity {
        /// Name of the record type being parsed.
        entity: String,
        /// First annotation problem found.
        #[source]
        source: TagError,
    },

    /// The two sides of a relation do not agree.
    #[error("relation error: {0}")]
    Relation(#[from] RelationError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Field-scoped annotation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The same key appeared twice in one field's annotation.
    #[error("field {field}: duplicate tag '{key}'")]
    DuplicateKey {
        /// Field name.
        field: String,
        /// Repeated key (lower-cased).
        key: String,
    },

    /// A numeric option could not be parsed.
    #[error("field {field}: invalid value {value:?} for tag '{key}'")]
    InvalidNumber {
        /// Field name.
        field: String,
        /// Option key.
        key: String,
        /// Raw value.
        value: String,
    },

    /// The `relation` value is not one of the four relation kinds.
    #[error("field {field}: invalid relation type {value:?}")]
    InvalidRelationKind {
        /// Field name.
        field: String,
        /// Raw value.
        value: String,
    },

    /// A `joincolumn` option without a column name.
    #[error("field {field}: joincolumn requires a column name")]
    EmptyJoinColumn {
        /// Field name.
        field: String,
    },

    /// Both `joincolumn` and `mappedby` on the same relation.
    #[error("field {field}: joincolumn and mappedby cannot be used together")]
    JoinColumnWithMappedBy {
        /// Field name.
        field: String,
    },

    /// Owning many-to-many side without a join table.
    #[error("field {field}: owning side of many-to-many requires jointable")]
    ManyToManyWithoutJoinTable {
        /// Field name.
        field: String,
    },

    /// Inverse many-to-many side declaring a join table.
    #[error("field {field}: inverse side of many-to-many (mappedby) cannot declare jointable")]
    InverseManyToManyWithJoinTable {
        /// Field name.
        field: String,
    },

    /// `jointable` on a relation that is not many-to-many.
    #[error("field {field}: jointable is only valid for many-to-many, found {kind}")]
    JoinTableOnNonManyToMany {
        /// Field name.
        field: String,
        /// Declared relation kind.
        kind: RelationKind,
    },

    /// The relation field does not lead to a record type.
    #[error("field {field}: relation target must be a struct, got {kind}")]
    InvalidRelationTarget {
        /// Field name.
        field: String,
        /// Description of the declared field type.
        kind: String,
    },

    /// Two fields map to the same storage column (strict mode).
    #[error("field {field}: column {column:?} already used by field {previous}")]
    DuplicateColumn {
        /// Field name.
        field: String,
        /// Storage column name.
        column: String,
        /// Field that claimed the column first.
        previous: String,
    },
}

/// Errors raised while pairing the two sides of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    /// `mappedby` names a field that is not a relation on the target.
    #[error("{entity}.{field}: mappedby {mapped_by:?} is not a relation on {target}")]
    MissingCounterpart {
        /// Entity declaring the relation.
        entity: String,
        /// Relation field.
        field: String,
        /// Target entity.
        target: String,
        /// Referenced field on the target.
        mapped_by: String,
    },

    /// The two sides declare incompatible relation kinds.
    #[error("{entity}.{field} is {kind} but {target}.{other_field} is {other_kind}")]
    KindMismatch {
        /// Entity declaring the relation.
        entity: String,
        /// Relation field.
        field: String,
        /// Relation kind on this side.
        kind: RelationKind,
        /// Target entity.
        target: String,
        /// Field on the target.
        other_field: String,
        /// Relation kind on the target side.
        other_kind: RelationKind,
    },
}

impl TagError {
    /// Name of the field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            TagError::DuplicateKey { field, .. }
            | TagError::InvalidNumber { field, .. }
            | TagError::InvalidRelationKind { field, .. }
            | TagError::EmptyJoinColumn { field }
            | TagError::JoinColumnWithMappedBy { field }
            | TagError::ManyToManyWithoutJoinTable { field }
            | TagError::InverseManyToManyWithJoinTable { field }
            | TagError::JoinTableOnNonManyToMany { field, .. }
            | TagError::InvalidRelationTarget { field, .. }
            | TagError::DuplicateColumn { field, .. } => field,
        }
    }
}
