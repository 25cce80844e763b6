//! Changed foreign keys.

use crate::change::{Change, TableRef};
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::generator::{ChangeGenerator, ChangeGeneratorChain, Priority};
use crate::structure::{downcast, DatabaseObject, ForeignKey, ObjectType};

const WATCHED_FIELDS: [&str; 4] = [
    "baseColumns",
    "referencedTable",
    "referencedColumns",
    "deleteRule",
];

/// Drops and re-adds a foreign key whose definition changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangedForeignKeyChangeGenerator;

impl ChangeGenerator for ChangedForeignKeyChangeGenerator {
    fn name(&self) -> &str {
        "changedForeignKey"
    }

    fn priority(&self, object_type: &ObjectType, _database: &dyn Database) -> Priority {
        if *object_type == ObjectType::ForeignKey {
            Priority::DEFAULT
        } else {
            Priority::NONE
        }
    }

    fn run_after_types(&self) -> Vec<ObjectType> {
        vec![
            ObjectType::Table,
            ObjectType::Column,
            ObjectType::PrimaryKey,
            ObjectType::UniqueConstraint,
            ObjectType::Index,
        ]
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
        let foreign_key: &ForeignKey = downcast(changed_object, ObjectType::ForeignKey)?;

        if !WATCHED_FIELDS.iter().any(|f| differences.is_different(f)) {
            return Ok(None);
        }

        let table = TableRef::qualified(
            foreign_key.schema.as_ref(),
            &foreign_key.base_table,
            control,
        );
        Ok(Some(vec![
            Change::DropForeignKeyConstraint {
                table: table.clone(),
                constraint_name: foreign_key.name.clone(),
            },
            Change::AddForeignKeyConstraint {
                table,
                constraint_name: foreign_key.name.clone(),
                base_column_names: foreign_key.base_columns.clone(),
                referenced_table_name: foreign_key.referenced_table.clone(),
                referenced_column_names: foreign_key.referenced_columns.clone(),
                on_delete: foreign_key.on_delete.clone(),
            },
        ]))
    }
}
