//! Field annotation tokenizer.
//!
//! Grammar, one string per field:
//!
//! ```text
//! annotation := option (';' option)*
//! option     := key (':' value)?
//! ```
//!
//! Keys are trimmed and case-insensitive. A value runs until the next
//! `;` and is split from the key at the first `:` only, so
//! `joincolumn:user_id:uuid` has the value `user_id:uuid`. The whole
//! annotation `-` excludes the field from mapping.

use std::collections::HashSet;

/// Annotation value marking a field as excluded.
pub const EXCLUDE: &str = "-";

/// One `key[:value]` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOption {
    /// Lower-cased key.
    pub key: String,
    /// Trimmed value, if a `:` was present.
    pub value: Option<String>,
}

impl TagOption {
    /// Value or the empty string.
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Recognized key, if any.
    pub fn tag_key(&self) -> Option<TagKey> {
        TagKey::parse(&self.key)
    }
}

/// Result of tokenizing one annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    /// Options in order of appearance, first occurrence of each key only.
    pub options: Vec<TagOption>,
    /// Keys that appeared more than once (one entry per extra occurrence).
    pub duplicates: Vec<String>,
}

impl Tokenized {
    /// Find an option by recognized key.
    pub fn get(&self, key: TagKey) -> Option<&TagOption> {
        self.options.iter().find(|o| o.tag_key() == Some(key))
    }

    /// Check whether a recognized key is present.
    pub fn has(&self, key: TagKey) -> bool {
        self.get(key).is_some()
    }
}

/// Whether a raw annotation excludes its field.
pub fn is_excluded(raw: &str) -> bool {
    raw.trim() == EXCLUDE
}

/// Split a raw annotation into options.
pub fn tokenize(raw: &str) -> Tokenized {
    let mut seen = HashSet::new();
    let mut out = Tokenized::default();

    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (key, value) = match part.split_once(':') {
            Some((key, value)) => (key, Some(value.trim().to_string())),
            None => (part, None),
        };
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }

        if !seen.insert(key.clone()) {
            out.duplicates.push(key);
            continue;
        }
        out.options.push(TagOption { key, value });
    }

    out
}

/// Recognized annotation keys.
///
/// Aliases collapse onto one variant; duplicate detection works on the
/// literal key, so `pk;primarykey` is two distinct options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// `column`
    Column,
    /// `type`
    Type,
    /// `size`
    Size,
    /// `precision`
    Precision,
    /// `scale`
    Scale,
    /// `primarykey`, `pk`
    PrimaryKey,
    /// `autoincrement`, `auto_increment`, `serial`
    AutoIncrement,
    /// `notnull`, `not_null`
    NotNull,
    /// `nullable`
    Nullable,
    /// `unique`
    Unique,
    /// `default`
    Default,
    /// `index`
    Index,
    /// `uniqueindex`
    UniqueIndex,
    /// `createdat`, `created_at`
    CreatedAt,
    /// `updatedat`, `updated_at`
    UpdatedAt,
    /// `deletedat`, `deleted_at`
    DeletedAt,
    /// `relation`
    Relation,
    /// `joincolumn`, `join_column`
    JoinColumn,
    /// `mappedby`, `mapped_by`
    MappedBy,
    /// `jointable`, `join_table`
    JoinTable,
}

impl TagKey {
    /// Map a lower-cased key to its recognized variant.
    pub fn parse(key: &str) -> Option<Self> {
        let key = match key {
            "column" => TagKey::Column,
            "type" => TagKey::Type,
            "size" => TagKey::Size,
            "precision" => TagKey::Precision,
            "scale" => TagKey::Scale,
            "primarykey" | "pk" => TagKey::PrimaryKey,
            "autoincrement" | "auto_increment" | "serial" => TagKey::AutoIncrement,
            "notnull" | "not_null" => TagKey::NotNull,
            "nullable" => TagKey::Nullable,
            "unique" => TagKey::Unique,
            "default" => TagKey::Default,
            "index" => TagKey::Index,
            "uniqueindex" => TagKey::UniqueIndex,
            "createdat" | "created_at" => TagKey::CreatedAt,
            "updatedat" | "updated_at" => TagKey::UpdatedAt,
            "deletedat" | "deleted_at" => TagKey::DeletedAt,
            "relation" => TagKey::Relation,
            "joincolumn" | "join_column" => TagKey::JoinColumn,
            "mappedby" | "mapped_by" => TagKey::MappedBy,
            "jointable" | "join_table" => TagKey::JoinTable,
            _ => return None,
        };
        Some(key)
    }

    /// Keys that configure a column.
    pub fn is_column_option(&self) -> bool {
        !self.is_relation_option()
    }

    /// Keys that configure a relation.
    pub fn is_relation_option(&self) -> bool {
        matches!(
            self,
            TagKey::Relation | TagKey::JoinColumn | TagKey::MappedBy | TagKey::JoinTable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("column:nome_completo; size:120 ;NotNull");

        assert_eq!(tokens.options.len(), 3);
        assert_eq!(tokens.options[0].key, "column");
        assert_eq!(tokens.options[0].value.as_deref(), Some("nome_completo"));
        assert_eq!(tokens.options[1].key, "size");
        assert_eq!(tokens.options[1].value.as_deref(), Some("120"));
        assert_eq!(tokens.options[2].key, "notnull");
        assert_eq!(tokens.options[2].value, None);
        assert!(tokens.duplicates.is_empty());
    }

    #[test]
    fn test_tokenize_drops_empty_options() {
        let tokens = tokenize(";; pk ;  ;");
        assert_eq!(tokens.options.len(), 1);
        assert_eq!(tokens.options[0].tag_key(), Some(TagKey::PrimaryKey));
    }

    #[test]
    fn test_tokenize_splits_on_first_colon() {
        let tokens = tokenize("joincolumn:cliente_id:codigo");
        assert_eq!(tokens.options[0].value_or_empty(), "cliente_id:codigo");
    }

    #[test]
    fn test_tokenize_duplicate_key() {
        let tokens = tokenize("size:10;SIZE:20");

        assert_eq!(tokens.options.len(), 1);
        assert_eq!(tokens.options[0].value.as_deref(), Some("10"));
        assert_eq!(tokens.duplicates, vec!["size".to_string()]);
    }

    #[test]
    fn test_excluded() {
        assert!(is_excluded("-"));
        assert!(is_excluded(" - "));
        assert!(!is_excluded("-;pk"));
        assert!(!is_excluded(""));
    }

    #[test]
    fn test_tag_key_aliases() {
        assert_eq!(TagKey::parse("pk"), Some(TagKey::PrimaryKey));
        assert_eq!(TagKey::parse("serial"), Some(TagKey::AutoIncrement));
        assert_eq!(TagKey::parse("not_null"), Some(TagKey::NotNull));
        assert_eq!(TagKey::parse("deleted_at"), Some(TagKey::DeletedAt));
        assert_eq!(TagKey::parse("join_table"), Some(TagKey::JoinTable));
        assert_eq!(TagKey::parse("foo"), None);
    }

    #[test]
    fn test_lookup() {
        let tokens = tokenize("relation:one-to-one;mappedby:Perfil");
        assert!(tokens.has(TagKey::Relation));
        assert_eq!(
            tokens.get(TagKey::MappedBy).and_then(|o| o.value.as_deref()),
            Some("Perfil")
        );
        assert!(!tokens.has(TagKey::JoinColumn));
    }
}
