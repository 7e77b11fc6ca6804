//! ORMDB Meta - entity metadata extraction.
//!
//! Turns annotated record types into table metadata: columns, keys,
//! indices and relations. Record types describe their fields through
//! [`Entity`]; each field carries a `key[:value]` annotation string.
//!
//! ```ignore
//! use ormdb_meta::{Entity, FieldDescriptor, MetadataRegistry, ScalarType, TypeKind};
//!
//! struct Usuario;
//!
//! impl Entity for Usuario {
//!     const NAME: &'static str = "Usuario";
//!
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::new("ID", TypeKind::scalar(ScalarType::Int64)).tag("pk;autoincrement"),
//!             FieldDescriptor::new("Email", TypeKind::scalar(ScalarType::String)).tag("uniqueindex;size:255"),
//!         ]
//!     }
//! }
//!
//! let registry = MetadataRegistry::new();
//! let meta = registry.parse::<Usuario>()?;
//! assert_eq!(meta.table_name(), "usuarios");
//! ```

pub mod column;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod naming;
pub mod parser;
pub mod registry;
pub mod relation;
pub mod resolve;
pub mod tag;
pub mod types;

pub use column::ColumnDescriptor;
pub use config::RegistryConfig;
pub use entity::EntityMetadata;
pub use error::{Error, RelationError, TagError};
pub use registry::{MetadataRegistry, RegistryStats};
pub use relation::{JoinColumnDescriptor, RelationDescriptor, RelationKind};
pub use resolve::{resolve, Resolved};
pub use types::{Entity, FieldDescriptor, RecordType, ScalarType, TypeKind};
