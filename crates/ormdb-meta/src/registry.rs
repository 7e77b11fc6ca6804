//! Metadata registry.
//!
//! Caches one [`EntityMetadata`] per record type. Lookups that hit take
//! the shared lock only. A miss takes the exclusive lock for the whole
//! build, re-checking the table first so that callers racing on the
//! same unseen type build it once. The single lock also serializes
//! builds of different types.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::entity::EntityMetadata;
use crate::error::{Error, RelationError};
use crate::parser::build_metadata;
use crate::relation::RelationDescriptor;
use crate::resolve::resolve;
use crate::types::{Entity, RecordType, TypeKind};

/// Registry statistics.
#[derive(Debug, Default)]
pub struct RegistryStats {
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
}

impl RegistryStats {
    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that missed the fast path.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Metadata builds started.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Metadata builds that failed.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Type-keyed cache of entity metadata.
pub struct MetadataRegistry {
    entries: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
    config: RegistryConfig,
    stats: RegistryStats,
}

impl MetadataRegistry {
    /// Create a registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            stats: RegistryStats::default(),
        }
    }

    /// Metadata for the entity type `T`.
    pub fn parse<T: Entity>(&self) -> Result<Arc<EntityMetadata>, Error> {
        self.get_or_build(RecordType::of::<T>())
    }

    /// Metadata for the type of `value`.
    pub fn parse_value<T: Entity>(&self, _value: &T) -> Result<Arc<EntityMetadata>, Error> {
        self.parse::<T>()
    }

    /// Metadata for a dynamically described target.
    ///
    /// Accepts a record or a pointer to a record; anything else,
    /// including `None`, is rejected before the cache is consulted.
    pub fn parse_type(&self, target: Option<&TypeKind>) -> Result<Arc<EntityMetadata>, Error> {
        let resolved = resolve(target)?;
        self.get_or_build(resolved.record)
    }

    /// Cached metadata without building.
    pub fn get(&self, record: RecordType) -> Option<Arc<EntityMetadata>> {
        self.entries.read().get(&record.id()).cloned()
    }

    /// Check whether metadata for `T` is cached.
    pub fn contains<T: Entity>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of cached entities.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry.
    ///
    /// Metadata already handed out stays valid; later lookups rebuild.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "metadata registry cleared");
    }

    /// Get registry statistics.
    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    /// Configuration in use.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The relation on the other side of `relation`, if the target declares one.
    ///
    /// For an inverse side this is the target relation named by
    /// `mapped_by`, which must exist. For an owning side it is the
    /// target relation whose `mapped_by` names this field; unidirectional
    /// relations have none. Both sides must agree on the relation kind.
    pub fn counterpart(
        &self,
        relation: &RelationDescriptor,
    ) -> Result<Option<RelationDescriptor>, Error> {
        let target = self.get_or_build(relation.target)?;

        let other = match &relation.mapped_by {
            Some(mapped_by) => match target.relation_by_field(mapped_by) {
                Some(other) => other,
                None => {
                    return Err(RelationError::MissingCounterpart {
                        entity: relation.entity.clone(),
                        field: relation.field_name.clone(),
                        target: relation.target_name.clone(),
                        mapped_by: mapped_by.clone(),
                    }
                    .into())
                }
            },
            None => match target.relations().iter().find(|r| {
                r.mapped_by.as_deref() == Some(relation.field_name.as_str())
                    && r.target_name == relation.entity
            }) {
                Some(other) => other,
                None => return Ok(None),
            },
        };

        if other.kind != relation.kind.mirror() {
            return Err(RelationError::KindMismatch {
                entity: relation.entity.clone(),
                field: relation.field_name.clone(),
                kind: relation.kind,
                target: relation.target_name.clone(),
                other_field: other.field_name.clone(),
                other_kind: other.kind,
            }
            .into());
        }

        Ok(Some(other.clone()))
    }

    fn get_or_build(&self, record: RecordType) -> Result<Arc<EntityMetadata>, Error> {
        if let Some(meta) = self.entries.read().get(&record.id()) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(meta));
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write();
        if let Some(meta) = entries.get(&record.id()) {
            debug!(entity = record.name(), "metadata built by a concurrent caller");
            return Ok(Arc::clone(meta));
        }

        self.stats.builds.fetch_add(1, Ordering::Relaxed);
        let meta = match build_metadata(record, &self.config) {
            Ok(meta) => Arc::new(meta),
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };
        entries.insert(record.id(), Arc::clone(&meta));
        Ok(meta)
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}
