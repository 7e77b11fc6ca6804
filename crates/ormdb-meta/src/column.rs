//! Column descriptors and the column builder.

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::error::TagError;
use crate::naming;
use crate::parser::FieldContext;
use crate::tag::{TagKey, TagOption};
use crate::types::TypeKind;

/// Mapping of one field to a storage column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Name of the owning entity.
    pub entity: String,
    /// Field name as declared.
    pub field_name: String,
    /// Declared field type.
    pub field_type: TypeKind,
    /// Position of the field in declaration order.
    pub position: usize,
    /// Storage column name.
    pub name: String,
    /// Explicit storage type, stored verbatim.
    pub sql_type: Option<String>,
    /// Part of the primary key.
    pub primary_key: bool,
    /// Value generated by the database.
    pub auto_increment: bool,
    /// Accepts NULL.
    pub nullable: bool,
    /// Unique constraint.
    pub unique: bool,
    /// Raw default value.
    pub default: Option<String>,
    /// Length for sized types.
    pub size: Option<i64>,
    /// Total digits for decimal types.
    pub precision: Option<i64>,
    /// Fractional digits for decimal types.
    pub scale: Option<i64>,
    /// Plain index name.
    pub index: Option<String>,
    /// Unique index name.
    pub unique_index: Option<String>,
    /// Creation timestamp column.
    pub created_at: bool,
    /// Modification timestamp column.
    pub updated_at: bool,
    /// Soft-delete timestamp column.
    pub deleted_at: bool,
}

impl ColumnDescriptor {
    /// Default mapping for a field: snake-cased name, nullability from the type.
    pub fn new(
        entity: impl Into<String>,
        field_name: impl Into<String>,
        field_type: TypeKind,
        position: usize,
    ) -> Self {
        let field_name = field_name.into();
        let nullable = field_type.is_nullable();
        Self {
            entity: entity.into(),
            name: naming::column_name(&field_name),
            field_name,
            field_type,
            position,
            sql_type: None,
            primary_key: false,
            auto_increment: false,
            nullable,
            unique: false,
            default: None,
            size: None,
            precision: None,
            scale: None,
            index: None,
            unique_index: None,
            created_at: false,
            updated_at: false,
            deleted_at: false,
        }
    }

    /// Whether the column has any index.
    pub fn is_indexed(&self) -> bool {
        self.index.is_some() || self.unique_index.is_some()
    }

    /// Whether the column carries one of the timestamp roles.
    pub fn is_timestamp(&self) -> bool {
        self.created_at || self.updated_at || self.deleted_at
    }
}

/// Index name requested by an option; `None` inside means "generate".
#[derive(Default)]
struct PendingIndex(Option<Option<String>>);

impl PendingIndex {
    fn request(&mut self, option: &TagOption) {
        let explicit = option.value.clone().filter(|v| !v.is_empty());
        self.0 = Some(explicit);
    }

    fn resolve(self, generate: impl FnOnce() -> String) -> Option<String> {
        self.0.map(|explicit| explicit.unwrap_or_else(generate))
    }
}

/// Build the column for a non-relation field.
///
/// Returns `None` when the field is skipped: a complex type with no
/// column option is not mapped.
pub(crate) fn build_column(
    ctx: &FieldContext<'_>,
    options: &[TagOption],
    diag: &mut Diagnostics,
) -> Option<ColumnDescriptor> {
    let field = ctx.field;
    let has_column_option = options
        .iter()
        .filter_map(TagOption::tag_key)
        .any(|key| key.is_column_option());

    if !has_column_option && field.kind.is_complex() {
        return None;
    }

    let mut column = ColumnDescriptor::new(ctx.entity, &field.name, field.kind.clone(), ctx.position);
    let mut index = PendingIndex::default();
    let mut unique_index = PendingIndex::default();
    let mut forced_not_null = false;

    for option in options {
        let Some(key) = option.tag_key() else {
            continue;
        };

        match key {
            TagKey::Column => match non_empty(option) {
                Some(name) => column.name = name,
                None => diag.warn(&field.name, "column tag without a name is ignored"),
            },
            TagKey::Type => match non_empty(option) {
                Some(sql_type) => column.sql_type = Some(sql_type),
                None => diag.warn(&field.name, "type tag without a value is ignored"),
            },
            TagKey::Size => column.size = Some(parse_number(ctx, option, diag)),
            TagKey::Precision => column.precision = Some(parse_number(ctx, option, diag)),
            TagKey::Scale => column.scale = Some(parse_number(ctx, option, diag)),
            TagKey::PrimaryKey => {
                column.primary_key = true;
                column.nullable = false;
            }
            TagKey::AutoIncrement => column.auto_increment = true,
            TagKey::NotNull => {
                column.nullable = false;
                forced_not_null = true;
            }
            TagKey::Nullable => column.nullable = true,
            TagKey::Unique => column.unique = true,
            TagKey::Default => match &option.value {
                Some(value) => column.default = Some(value.clone()),
                None => diag.warn(&field.name, "default tag without a value is ignored"),
            },
            TagKey::Index => index.request(option),
            TagKey::UniqueIndex => {
                column.unique = true;
                unique_index.request(option);
            }
            TagKey::CreatedAt => column.created_at = true,
            TagKey::UpdatedAt => column.updated_at = true,
            TagKey::DeletedAt => column.deleted_at = true,
            TagKey::Relation | TagKey::JoinColumn | TagKey::MappedBy | TagKey::JoinTable => {
                diag.warn(
                    &field.name,
                    format!("tag '{}' ignored on a non-relation field", option.key),
                );
            }
        }
    }

    if column.deleted_at {
        if forced_not_null {
            diag.warn(&field.name, "deletedat column is always nullable, notnull ignored");
        }
        column.nullable = true;
    }
    if column.primary_key {
        if column.nullable {
            diag.warn(&field.name, "primary key column cannot be nullable");
        }
        column.nullable = false;
    }

    column.index = index.resolve(|| naming::index_name(ctx.table, &column.name));
    column.unique_index =
        unique_index.resolve(|| naming::unique_index_name(ctx.table, &column.name));

    Some(column)
}

fn non_empty(option: &TagOption) -> Option<String> {
    option.value.clone().filter(|v| !v.is_empty())
}

/// Malformed values are recorded and read as zero.
fn parse_number(ctx: &FieldContext<'_>, option: &TagOption, diag: &mut Diagnostics) -> i64 {
    let raw = option.value_or_empty();
    match raw.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            diag.error(TagError::InvalidNumber {
                field: ctx.field.name.clone(),
                key: option.key.clone(),
                value: raw.to_string(),
            });
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::tokenize;
    use crate::types::{FieldDescriptor, ScalarType};

    fn build(field: FieldDescriptor) -> (Option<ColumnDescriptor>, Diagnostics) {
        let mut diag = Diagnostics::new("Produto");
        let tokens = tokenize(&field.tag);
        let ctx = FieldContext {
            entity: "Produto",
            table: "produtos",
            field: &field,
            position: 0,
        };
        let column = build_column(&ctx, &tokens.options, &mut diag);
        (column, diag)
    }

    #[test]
    fn test_defaults() {
        let (column, diag) = build(FieldDescriptor::new(
            "NomeProduto",
            TypeKind::scalar(ScalarType::String),
        ));
        let column = column.unwrap();

        assert_eq!(column.name, "nome_produto");
        assert_eq!(column.entity, "Produto");
        assert!(!column.nullable);
        assert!(!column.primary_key);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_nullable_defaults() {
        let (ptr, _) = build(FieldDescriptor::new(
            "Descricao",
            TypeKind::pointer(TypeKind::scalar(ScalarType::String)),
        )
        .tag("column:descricao"));
        assert!(ptr.unwrap().nullable);

        let (wrapper, _) = build(FieldDescriptor::new(
            "Desconto",
            TypeKind::nullable(TypeKind::scalar(ScalarType::Float64)),
        ));
        assert!(wrapper.unwrap().nullable);
    }

    #[test]
    fn test_untagged_pointer_to_scalar_is_mapped() {
        let (column, diag) = build(FieldDescriptor::new(
            "Apelido",
            TypeKind::pointer(TypeKind::scalar(ScalarType::String)),
        ));
        let column = column.unwrap();

        assert_eq!(column.name, "apelido");
        assert!(column.nullable);
        assert!(diag.warnings().is_empty());

        let (column, _) = build(FieldDescriptor::new(
            "Cliente",
            TypeKind::pointer(TypeKind::Map),
        ));
        assert!(column.is_none());
    }

    #[test]
    fn test_negative_size_is_accepted() {
        let (column, diag) = build(
            FieldDescriptor::new("Nome", TypeKind::scalar(ScalarType::String)).tag("size:-1"),
        );

        assert_eq!(column.unwrap().size, Some(-1));
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_primary_key_forces_not_null() {
        let (column, diag) = build(
            FieldDescriptor::new(
                "ID",
                TypeKind::pointer(TypeKind::scalar(ScalarType::Int64)),
            )
            .tag("nullable;pk;autoincrement"),
        );
        let column = column.unwrap();

        assert!(column.primary_key);
        assert!(column.auto_increment);
        assert!(!column.nullable);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_deleted_at_forces_nullable() {
        let (column, diag) = build(
            FieldDescriptor::new("RemovidoEm", TypeKind::scalar(ScalarType::Timestamp))
                .tag("deletedat;notnull"),
        );
        let column = column.unwrap();

        assert!(column.deleted_at);
        assert!(column.nullable);
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_generated_index_names_use_final_column() {
        let (column, _) = build(
            FieldDescriptor::new("Email", TypeKind::scalar(ScalarType::String))
                .tag("index;uniqueindex;column:email_principal"),
        );
        let column = column.unwrap();

        assert_eq!(column.index.as_deref(), Some("idx_produtos_email_principal"));
        assert_eq!(
            column.unique_index.as_deref(),
            Some("uidx_produtos_email_principal")
        );
        assert!(column.unique);
        assert!(column.is_indexed());
    }

    #[test]
    fn test_explicit_index_names() {
        let (column, _) = build(
            FieldDescriptor::new("Codigo", TypeKind::scalar(ScalarType::String))
                .tag("index:idx_codigo;uniqueindex:uq_codigo"),
        );
        let column = column.unwrap();

        assert_eq!(column.index.as_deref(), Some("idx_codigo"));
        assert_eq!(column.unique_index.as_deref(), Some("uq_codigo"));
    }

    #[test]
    fn test_numeric_options() {
        let (column, diag) = build(
            FieldDescriptor::new("Preco", TypeKind::scalar(ScalarType::Decimal))
                .tag("type:numeric;precision:10;scale:2;default:0"),
        );
        let column = column.unwrap();

        assert_eq!(column.sql_type.as_deref(), Some("numeric"));
        assert_eq!(column.precision, Some(10));
        assert_eq!(column.scale, Some(2));
        assert_eq!(column.default.as_deref(), Some("0"));
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_malformed_size_records_error() {
        let (column, diag) = build(
            FieldDescriptor::new("Nome", TypeKind::scalar(ScalarType::String)).tag("size:abc"),
        );

        assert_eq!(column.unwrap().size, Some(0));
        let err = diag.finish().unwrap_err();
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_complex_field_without_column_option_is_skipped() {
        let (column, _) = build(FieldDescriptor::new(
            "Tags",
            TypeKind::sequence(TypeKind::scalar(ScalarType::String)),
        ));
        assert!(column.is_none());

        let (column, _) = build(
            FieldDescriptor::new("Atributos", TypeKind::Map).tag("somethingelse"),
        );
        assert!(column.is_none());

        let (column, _) = build(
            FieldDescriptor::new("Atributos", TypeKind::Map).tag("type:jsonb"),
        );
        assert_eq!(column.unwrap().sql_type.as_deref(), Some("jsonb"));
    }

    #[test]
    fn test_timestamps() {
        let (created, _) = build(
            FieldDescriptor::new("CriadoEm", TypeKind::scalar(ScalarType::Timestamp))
                .tag("created_at"),
        );
        let created = created.unwrap();
        assert!(created.created_at);
        assert!(created.is_timestamp());
        assert!(!created.nullable);

        let (updated, _) = build(
            FieldDescriptor::new("AtualizadoEm", TypeKind::scalar(ScalarType::Timestamp))
                .tag("updatedat"),
        );
        assert!(updated.unwrap().updated_at);
    }
}
