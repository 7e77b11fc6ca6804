//! Per-parse problem collection.
//!
//! Every anomaly is logged and kept as a warning. The first hard error
//! is retained and becomes the failure of the whole parse, but the scan
//! keeps going so the log shows every problem of the type.

use std::fmt;

use tracing::warn;

use crate::error::{Error, TagError};

/// Collects warnings and the first error while one entity is parsed.
#[derive(Debug)]
pub struct Diagnostics {
    entity: &'static str,
    first_error: Option<TagError>,
    errors: usize,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Start collecting for the named entity.
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            first_error: None,
            errors: 0,
            warnings: Vec::new(),
        }
    }

    /// Record a soft problem on a field.
    pub fn warn(&mut self, field: &str, message: impl fmt::Display) {
        let message = format!("{}.{}: {}", self.entity, field, message);
        warn!(entity = self.entity, field, "{}", message);
        self.warnings.push(message);
    }

    /// Record a hard problem. Only the first one is kept as the error.
    pub fn error(&mut self, err: TagError) {
        let message = format!("{}: {}", self.entity, err);
        warn!(entity = self.entity, field = err.field(), "{}", message);
        self.warnings.push(message);
        self.errors += 1;
        if self.first_error.is_none() {
            self.first_error = Some(err);
        }
    }

    /// Whether any hard error was recorded.
    pub fn has_errors(&self) -> bool {
        self.first_error.is_some()
    }

    /// Number of hard errors recorded.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Finish the scan: the warnings on success, the first error otherwise.
    pub fn finish(self) -> Result<Vec<String>, Error> {
        match self.first_error {
            Some(source) => Err(Error::Entity {
                entity: self.entity.to_string(),
                source,
            }),
            None => Ok(self.warnings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_only_succeeds() {
        let mut diag = Diagnostics::new("Loja");
        diag.warn("Endereco", "unknown tag 'foo'");

        assert!(!diag.has_errors());
        let warnings = diag.finish().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Loja.Endereco"));
    }

    #[test]
    fn test_first_error_wins() {
        let mut diag = Diagnostics::new("Loja");
        diag.error(TagError::EmptyJoinColumn {
            field: "Dono".into(),
        });
        diag.warn("Nome", "unknown tag 'bar'");
        diag.error(TagError::DuplicateKey {
            field: "Nome".into(),
            key: "size".into(),
        });

        assert_eq!(diag.error_count(), 2);
        assert_eq!(diag.warnings().len(), 3);

        match diag.finish().unwrap_err() {
            Error::Entity { entity, source } => {
                assert_eq!(entity, "Loja");
                assert_eq!(
                    source,
                    TagError::EmptyJoinColumn {
                        field: "Dono".into()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
