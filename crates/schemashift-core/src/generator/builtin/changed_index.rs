//! Changed indexes.

use crate::change::{Change, TableRef};
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::generator::{ChangeGenerator, ChangeGeneratorChain, Priority};
use crate::structure::{downcast, DatabaseObject, Index, ObjectType};

/// Recreates an index whose columns or uniqueness changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangedIndexChangeGenerator;

impl ChangeGenerator for ChangedIndexChangeGenerator {
    fn name(&self) -> &str {
        "changedIndex"
    }

    fn priority(&self, object_type: &ObjectType, _database: &dyn Database) -> Priority {
        if *object_type == ObjectType::Index {
            Priority::DEFAULT
        } else {
            Priority::NONE
        }
    }

    fn run_after_types(&self) -> Vec<ObjectType> {
        vec![ObjectType::Table, ObjectType::Column]
    }

    fn fix_changed(
        &self,
        changed_object: &dyn DatabaseObject,
        differences: &ObjectDifferences,
        control: &DiffOutputControl,
        _reference_database: &dyn Database,
        _comparison_database: &dyn Database,
        _chain: &mut ChangeGeneratorChain,
    ) -> Result<Option<Vec<Change>>> {
        let index: &Index = downcast(changed_object, ObjectType::Index)?;

        if !differences.is_different("columns") && !differences.is_different("unique") {
            return Ok(None);
        }

        let table = TableRef::qualified(index.schema.as_ref(), &index.table_name, control);
        Ok(Some(vec![
            Change::DropIndex {
                table: table.clone(),
                index_name: index.name.clone(),
            },
            Change::CreateIndex {
                table,
                index_name: index.name.clone(),
                columns: index.columns.clone(),
                unique: index.unique,
            },
        ]))
    }
}
