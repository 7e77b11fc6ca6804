//! Neutral type model for record definitions.
//!
//! Record types describe themselves through [`Entity`], producing one
//! [`FieldDescriptor`] per field. Everything downstream (tokenizer,
//! builders, registry) works on these descriptors only.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// A record type that can be mapped to a table.
pub trait Entity: 'static {
    /// Logical name of the record type.
    const NAME: &'static str;

    /// Field descriptors in declaration order.
    fn fields() -> Vec<FieldDescriptor>;

    /// Explicit table name, overriding the inferred one.
    fn table_name() -> Option<&'static str> {
        None
    }
}

/// Scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Fixed-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Binary data.
    Bytes,
    /// Point in time.
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int8
                | ScalarType::Int16
                | ScalarType::Int32
                | ScalarType::Int64
                | ScalarType::UInt8
                | ScalarType::UInt16
                | ScalarType::UInt32
                | ScalarType::UInt64
                | ScalarType::Float32
                | ScalarType::Float64
                | ScalarType::Decimal
        )
    }

    fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::UInt8 => "uint8",
            ScalarType::UInt16 => "uint16",
            ScalarType::UInt32 => "uint32",
            ScalarType::UInt64 => "uint64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
            ScalarType::Decimal => "decimal",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Uuid => "uuid",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical handle for a record type.
///
/// Two handles are equal when they denote the same Rust type.
#[derive(Clone, Copy)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
    fields: fn() -> Vec<FieldDescriptor>,
    table_name: fn() -> Option<&'static str>,
}

impl RecordType {
    /// Handle for the entity type `T`.
    pub fn of<T: Entity>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::NAME,
            fields: T::fields,
            table_name: T::table_name,
        }
    }

    /// Type identity used as cache key.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Logical type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field descriptors in declaration order.
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        (self.fields)()
    }

    /// Explicit table name, if the entity overrides it.
    pub fn table_override(&self) -> Option<&'static str> {
        (self.table_name)()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name).finish()
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Classification of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    /// A plain scalar value.
    Scalar(ScalarType),
    /// A nullable wrapper around a value (`Option<T>`).
    Nullable(Box<TypeKind>),
    /// An owned indirection (`Box<T>`, `Arc<T>`).
    Pointer(Box<TypeKind>),
    /// A sequence of values (`Vec<T>`).
    Sequence(Box<TypeKind>),
    /// A key/value map.
    Map,
    /// A trait object.
    Interface,
    /// A channel endpoint.
    Channel,
    /// A function or closure.
    Function,
    /// Another record type.
    Record(RecordType),
}

impl TypeKind {
    /// Scalar field type.
    pub fn scalar(scalar: ScalarType) -> Self {
        TypeKind::Scalar(scalar)
    }

    /// Nullable wrapper around `inner`.
    pub fn nullable(inner: TypeKind) -> Self {
        TypeKind::Nullable(Box::new(inner))
    }

    /// Pointer to `inner`.
    pub fn pointer(inner: TypeKind) -> Self {
        TypeKind::Pointer(Box::new(inner))
    }

    /// Sequence of `inner`.
    pub fn sequence(inner: TypeKind) -> Self {
        TypeKind::Sequence(Box::new(inner))
    }

    /// Record of entity type `T`.
    pub fn record<T: Entity>() -> Self {
        TypeKind::Record(RecordType::of::<T>())
    }

    /// Whether values of this type can be absent by construction.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            TypeKind::Nullable(_)
                | TypeKind::Pointer(_)
                | TypeKind::Sequence(_)
                | TypeKind::Map
                | TypeKind::Interface
                | TypeKind::Channel
                | TypeKind::Function
        )
    }

    /// Aggregate types that are not mapped without an explicit annotation.
    ///
    /// A pointer is complex only when its pointee is.
    pub fn is_complex(&self) -> bool {
        match self {
            TypeKind::Pointer(inner) => inner.is_complex(),
            TypeKind::Record(_) | TypeKind::Sequence(_) | TypeKind::Map | TypeKind::Interface => {
                true
            }
            _ => false,
        }
    }

    /// The record handle, if this is a record type.
    pub fn as_record(&self) -> Option<RecordType> {
        match self {
            TypeKind::Record(record) => Some(*record),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Scalar(scalar) => write!(f, "{scalar}"),
            TypeKind::Nullable(inner) => write!(f, "nullable {inner}"),
            TypeKind::Pointer(inner) => write!(f, "pointer to {inner}"),
            TypeKind::Sequence(inner) => write!(f, "sequence of {inner}"),
            TypeKind::Map => f.write_str("map"),
            TypeKind::Interface => f.write_str("interface"),
            TypeKind::Channel => f.write_str("channel"),
            TypeKind::Function => f.write_str("function"),
            TypeKind::Record(record) => write!(f, "struct {}", record.name()),
        }
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared.
    pub name: String,
    /// Declared type.
    pub kind: TypeKind,
    /// Raw annotation string (empty when untagged).
    pub tag: String,
    /// Whether the field is visible outside its type.
    pub exported: bool,
}

impl FieldDescriptor {
    /// Create an untagged, exported field.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            tag: String::new(),
            exported: true,
        }
    }

    /// Set the raw annotation.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Mark the field as not exported.
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}
