//! Registry of change generators.

use super::builtin::{
    ChangedColumnChangeGenerator, ChangedForeignKeyChangeGenerator, ChangedIndexChangeGenerator,
    ChangedTableChangeGenerator,
};
use super::ordering::{order_object_types, rank_by_priority};
use super::{ChangeGenerator, ChangeGeneratorChain};
use crate::change::Change;
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::structure::{DatabaseObject, ObjectType};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

type ResolvedKey = (ObjectType, String);

/// Registry that resolves the generator chain for an object type.
///
/// Resolution results are cached per object type and backend short name;
/// the cache is dropped whenever the registry changes.
#[derive(Default)]
pub struct ChangeGeneratorFactory {
    generators: RwLock<Vec<Arc<dyn ChangeGenerator>>>,
    resolved: DashMap<ResolvedKey, Vec<Arc<dyn ChangeGenerator>>>,
}

impl ChangeGeneratorFactory {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in changed-object generators.
    pub fn with_defaults() -> Self {
        let factory = Self::new();
        factory.register(ChangedTableChangeGenerator);
        factory.register(ChangedColumnChangeGenerator);
        factory.register(ChangedIndexChangeGenerator);
        factory.register(ChangedForeignKeyChangeGenerator);
        factory
    }

    /// Register a generator.
    pub fn register(&self, generator: impl ChangeGenerator + 'static) {
        self.register_arc(Arc::new(generator));
    }

    /// Register a shared generator.
    pub fn register_arc(&self, generator: Arc<dyn ChangeGenerator>) {
        debug!(generator = generator.name(), "registering change generator");
        let mut generators = self.generators.write();
        generators.push(generator);
        // cleared under the write lock so no reader can refill it with a stale ranking
        self.resolved.clear();
    }

    /// Remove every generator with the given name. Returns whether any was removed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut generators = self.generators.write();
        let before = generators.len();
        generators.retain(|g| g.name() != name);
        let removed = generators.len() != before;
        if removed {
            self.resolved.clear();
        }
        removed
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize {
        self.generators.read().len()
    }

    /// Check if no generator is registered.
    pub fn is_empty(&self) -> bool {
        self.generators.read().is_empty()
    }

    /// Applicable generators for an object type, highest priority first.
    pub fn generators(
        &self,
        object_type: &ObjectType,
        database: &dyn Database,
    ) -> Vec<Arc<dyn ChangeGenerator>> {
        let key = (object_type.clone(), database.short_name().to_string());
        // held until the ranking is cached so registration cannot interleave
        let generators = self.generators.read();
        if let Some(cached) = self.resolved.get(&key) {
            return cached.clone();
        }

        let ranked = rank_by_priority(
            generators
                .iter()
                .map(|g| (g.priority(object_type, database), Arc::clone(g))),
        );
        self.resolved.insert(key, ranked.clone());
        drop(generators);

        debug!(
            object_type = %object_type,
            database = database.short_name(),
            count = ranked.len(),
            "resolved change generators"
        );
        ranked
    }

    /// Build a fresh chain for an object type.
    pub fn create_chain(
        &self,
        object_type: &ObjectType,
        database: &dyn Database,
    ) -> ChangeGeneratorChain {
        ChangeGeneratorChain::new(self.generators(object_type, database))
    }

    /// Types that must be processed after `object_type`, across all its generators.
    pub fn run_before_types(
        &self,
        object_type: &ObjectType,
        database: &dyn Database,
    ) -> Vec<ObjectType> {
        collect_unique(
            self.generators(object_type, database)
                .iter()
                .flat_map(|g| g.run_before_types()),
        )
    }

    /// Types that must be processed before `object_type`, across all its generators.
    pub fn run_after_types(
        &self,
        object_type: &ObjectType,
        database: &dyn Database,
    ) -> Vec<ObjectType> {
        collect_unique(
            self.generators(object_type, database)
                .iter()
                .flat_map(|g| g.run_after_types()),
        )
    }

    /// Order a set of object types by the run-before/run-after declarations
    /// of their generators.
    pub fn ordered_object_types(
        &self,
        types: &[ObjectType],
        database: &dyn Database,
    ) -> Result<Vec<ObjectType>> {
        order_object_types(
            types,
            |t| self.run_after_types(t, database),
            |t| self.run_before_types(t, database),
        )
    }

    /// Generate the changes for one changed object.
    ///
    /// An empty result means no generator produced anything.
    pub fn fix_changed(
        &self,
        changed_object: &dyn DatabaseObject,
        differences: &ObjectDifferences,
        control: &DiffOutputControl,
        reference_database: &dyn Database,
        comparison_database: &dyn Database,
    ) -> Result<Vec<Change>> {
        let mut chain = self.create_chain(&changed_object.object_type(), comparison_database);
        let changes = chain.fix_changed(
            changed_object,
            differences,
            control,
            reference_database,
            comparison_database,
        )?;
        Ok(changes.unwrap_or_default())
    }
}

impl std::fmt::Debug for ChangeGeneratorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let generators = self.generators.read();
        f.debug_struct("ChangeGeneratorFactory")
            .field(
                "generators",
                &generators.iter().map(|g| g.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn collect_unique(types: impl Iterator<Item = ObjectType>) -> Vec<ObjectType> {
    let mut unique = Vec::new();
    for object_type in types {
        if !unique.contains(&object_type) {
            unique.push(object_type);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::GenericDatabase;
    use crate::structure::Table;

    #[test]
    fn test_defaults_registered() {
        let factory = ChangeGeneratorFactory::with_defaults();
        assert_eq!(factory.len(), 4);

        let db = GenericDatabase::new("postgresql");
        let table_generators = factory.generators(&ObjectType::Table, &db);
        assert_eq!(table_generators.len(), 1);
        assert_eq!(table_generators[0].name(), "changedTable");

        assert!(factory.generators(&ObjectType::Sequence, &db).is_empty());
    }

    #[test]
    fn test_unregister_invalidates_cache() {
        let factory = ChangeGeneratorFactory::with_defaults();
        let db = GenericDatabase::new("postgresql");
        assert_eq!(factory.generators(&ObjectType::Table, &db).len(), 1);

        assert!(factory.unregister("changedTable"));
        assert!(factory.generators(&ObjectType::Table, &db).is_empty());
        assert!(!factory.unregister("changedTable"));
    }

    #[test]
    fn test_concurrent_registration_reaches_resolution() {
        let factory = ChangeGeneratorFactory::new();
        let db = GenericDatabase::new("postgresql");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        factory.generators(&ObjectType::Table, &db);
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..50 {
                    factory.register(ChangedTableChangeGenerator);
                }
            });
        });

        assert_eq!(factory.generators(&ObjectType::Table, &db).len(), 50);
    }

    #[test]
    fn test_registration_replaces_cached_ranking() {
        let factory = ChangeGeneratorFactory::new();
        let db = GenericDatabase::new("postgresql");
        assert!(factory.generators(&ObjectType::Index, &db).is_empty());

        factory.register(ChangedIndexChangeGenerator);
        let resolved = factory.generators(&ObjectType::Index, &db);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), "changedIndex");
    }

    #[test]
    fn test_unclaimed_type_yields_empty() {
        let factory = ChangeGeneratorFactory::new();
        let db = GenericDatabase::new("h2");
        let table = Table::new("person").with_remarks("hi");
        let diffs = ObjectDifferences::new().with_difference("remarks", "old", "hi");

        let changes = factory
            .fix_changed(&table, &diffs, &DiffOutputControl::default(), &db, &db)
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_default_type_order() {
        let factory = ChangeGeneratorFactory::with_defaults();
        let db = GenericDatabase::new("postgresql");

        let ordered = factory
            .ordered_object_types(
                &[
                    ObjectType::ForeignKey,
                    ObjectType::Index,
                    ObjectType::Column,
                    ObjectType::Table,
                ],
                &db,
            )
            .unwrap();

        assert_eq!(
            ordered,
            vec![
                ObjectType::Table,
                ObjectType::Column,
                ObjectType::Index,
                ObjectType::ForeignKey
            ]
        );
    }
}
