//! Entity metadata construction.
//!
//! Walks the fields of a record type once, in declaration order. Each
//! field ends up as a relation, a column, or skipped. Problems are
//! collected by [`Diagnostics`]; the first hard error fails the parse.

use tracing::debug;

use crate::column::build_column;
use crate::config::RegistryConfig;
use crate::diagnostics::Diagnostics;
use crate::entity::EntityMetadata;
use crate::error::{Error, TagError};
use crate::naming;
use crate::relation::{build_relation, RelationKind};
use crate::tag::{self, TagKey};
use crate::types::{FieldDescriptor, RecordType};

/// Per-field state shared by the column and relation builders.
pub(crate) struct FieldContext<'a> {
    /// Owning entity name.
    pub entity: &'static str,
    /// Owning table name, used for generated index names.
    pub table: &'a str,
    /// Field being mapped.
    pub field: &'a FieldDescriptor,
    /// Declaration position.
    pub position: usize,
}

/// Build the metadata for a record type.
pub fn build_metadata(record: RecordType, config: &RegistryConfig) -> Result<EntityMetadata, Error> {
    let (mut meta, diag) = scan(record, config);

    let warnings = diag.finish()?;
    meta.set_warnings(warnings);
    debug!(
        entity = record.name(),
        columns = meta.columns().len(),
        relations = meta.relations().len(),
        "entity metadata built"
    );
    Ok(meta)
}

/// Map every field of `record`, collecting problems instead of stopping.
fn scan(record: RecordType, config: &RegistryConfig) -> (EntityMetadata, Diagnostics) {
    let entity = record.name();
    let table = match record.table_override() {
        Some(table) => table.to_string(),
        None => naming::table_name(entity),
    };
    debug!(entity, table = %table, "building entity metadata");

    let mut meta = EntityMetadata::new(record, table.clone());
    let mut diag = Diagnostics::new(entity);

    for (position, field) in record.fields().iter().enumerate() {
        if !field.exported || tag::is_excluded(&field.tag) {
            continue;
        }

        let tokens = tag::tokenize(&field.tag);
        for key in &tokens.duplicates {
            diag.error(TagError::DuplicateKey {
                field: field.name.clone(),
                key: key.clone(),
            });
        }
        if config.warn_unknown_tags {
            for option in tokens.options.iter().filter(|o| o.tag_key().is_none()) {
                diag.warn(&field.name, format!("unknown tag '{}'", option.key));
            }
        }

        let ctx = FieldContext {
            entity,
            table: &table,
            field,
            position,
        };

        if let Some(option) = tokens.get(TagKey::Relation) {
            match option.value_or_empty().parse::<RelationKind>() {
                Ok(kind) => {
                    if let Some(relation) = build_relation(&ctx, kind, &tokens.options, &mut diag)
                    {
                        meta.push_relation(relation);
                    }
                    continue;
                }
                Err(()) => diag.error(TagError::InvalidRelationKind {
                    field: field.name.clone(),
                    value: option.value_or_empty().to_string(),
                }),
            }
        }

        let Some(column) = build_column(&ctx, &tokens.options, &mut diag) else {
            continue;
        };

        if let Some(previous) = meta.column_owner(&column.name) {
            let err = TagError::DuplicateColumn {
                field: field.name.clone(),
                column: column.name.clone(),
                previous: previous.to_string(),
            };
            if config.strict_column_names {
                diag.error(err);
            } else {
                diag.warn(
                    &field.name,
                    format!("column {:?} already used by field {}", column.name, previous),
                );
            }
        }

        for role in meta.push_column(column) {
            diag.warn(
                &field.name,
                format!("{role} column already defined, keeping the first one"),
            );
        }
    }

    (meta, diag)
}
