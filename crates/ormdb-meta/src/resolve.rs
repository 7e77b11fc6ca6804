//! Parse target resolution.

use crate::error::Error;
use crate::types::{RecordType, TypeKind};

/// A parse target reduced to its record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Canonical record handle.
    pub record: RecordType,
    /// Whether the target was given through a pointer.
    pub was_pointer: bool,
}

/// Reduce a parse target to the record type it denotes.
///
/// One level of pointer indirection is removed. Anything that is not a
/// record afterwards is rejected, and the error names the kind that was
/// originally passed in.
pub fn resolve(target: Option<&TypeKind>) -> Result<Resolved, Error> {
    let Some(target) = target else {
        return Err(Error::InvalidInput("nil target".into()));
    };

    let (inner, was_pointer) = match target {
        TypeKind::Pointer(inner) => (inner.as_ref(), true),
        other => (other, false),
    };

    match inner {
        TypeKind::Record(record) => Ok(Resolved {
            record: *record,
            was_pointer,
        }),
        _ => Err(Error::InvalidInput(format!(
            "target must be a struct or a pointer to a struct, got {target}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entity, FieldDescriptor, ScalarType};

    struct Conta;

    impl Entity for Conta {
        const NAME: &'static str = "Conta";

        fn fields() -> Vec<FieldDescriptor> {
            Vec::new()
        }
    }

    #[test]
    fn test_resolve_nil() {
        let err = resolve(None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_resolve_record() {
        let resolved = resolve(Some(&TypeKind::record::<Conta>())).unwrap();
        assert_eq!(resolved.record, RecordType::of::<Conta>());
        assert!(!resolved.was_pointer);
    }

    #[test]
    fn test_resolve_pointer_to_record() {
        let kind = TypeKind::pointer(TypeKind::record::<Conta>());
        let resolved = resolve(Some(&kind)).unwrap();
        assert_eq!(resolved.record.name(), "Conta");
        assert!(resolved.was_pointer);
    }

    #[test]
    fn test_resolve_rejects_scalar_with_original_kind() {
        let kind = TypeKind::pointer(TypeKind::scalar(ScalarType::Int64));
        let err = resolve(Some(&kind)).unwrap_err();
        assert!(err.to_string().contains("pointer to int64"));
    }

    #[test]
    fn test_resolve_only_one_pointer_level() {
        let kind = TypeKind::pointer(TypeKind::pointer(TypeKind::record::<Conta>()));
        assert!(resolve(Some(&kind)).is_err());
    }
}
