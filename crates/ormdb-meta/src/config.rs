//! Registry configuration.

/// Configuration for a [`MetadataRegistry`](crate::MetadataRegistry).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Fail the parse when two fields map to the same storage column.
    /// When false the collision is only logged.
    pub strict_column_names: bool,

    /// Log and record a warning for every unrecognized annotation key.
    pub warn_unknown_tags: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_column_names: false,
            warn_unknown_tags: true,
        }
    }
}

impl RegistryConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether storage column collisions are errors.
    pub fn strict_column_names(mut self, strict: bool) -> Self {
        self.strict_column_names = strict;
        self
    }

    /// Set whether unknown annotation keys are reported.
    pub fn warn_unknown_tags(mut self, warn: bool) -> Self {
        self.warn_unknown_tags = warn;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert!(!config.strict_column_names);
        assert!(config.warn_unknown_tags);
    }

    #[test]
    fn test_builder() {
        let config = RegistryConfig::new()
            .strict_column_names(true)
            .warn_unknown_tags(false);
        assert!(config.strict_column_names);
        assert!(!config.warn_unknown_tags);
    }
}
