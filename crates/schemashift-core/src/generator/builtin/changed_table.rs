//! Changed tables.

use crate::change::{Change, TableRef};
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::generator::{ChangeGenerator, ChangeGeneratorChain, Priority};
use crate::structure::{downcast, DatabaseObject, ObjectType, Table};

/// Emits `setTableRemarks` when a table comment changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangedTableChangeGenerator;

impl ChangeGenerator for ChangedTableChangeGenerator {
    fn name(&self) -> &str {
        "changedTable"
    }

    fn priority(&self, object_type: &ObjectType, _database: &dyn Database) -> Priority {
        if *object_type == ObjectType::Table {
            Priority::DEFAULT
        } else {
            Priority::NONE
        }
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
        let table: &Table = downcast(changed_object, ObjectType::Table)?;

        if !differences.is_different("remarks") {
            return Ok(None);
        }

        Ok(Some(vec![Change::SetTableRemarks {
            table: TableRef::qualified(table.schema.as_ref(), &table.name, control),
            remarks: table.remarks.clone(),
        }]))
    }
}
