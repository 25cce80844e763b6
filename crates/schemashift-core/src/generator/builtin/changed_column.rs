//! Changed columns.

use crate::change::{Change, TableRef};
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::generator::{ChangeGenerator, ChangeGeneratorChain, Priority};
use crate::structure::{downcast, Column, DatabaseObject, ObjectType};

/// Emits type, nullability, default, and remarks changes for a column.
///
/// Watched fields: `type`, `nullable`, `defaultValue`, `remarks`. Changes are
/// emitted in that order so a new default never lands on the old type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangedColumnChangeGenerator;

impl ChangeGenerator for ChangedColumnChangeGenerator {
    fn name(&self) -> &str {
        "changedColumn"
    }

    fn priority(&self, object_type: &ObjectType, _database: &dyn Database) -> Priority {
        if *object_type == ObjectType::Column {
            Priority::DEFAULT
        } else {
            Priority::NONE
        }
    }

    fn run_before_types(&self) -> Vec<ObjectType> {
        vec![
            ObjectType::PrimaryKey,
            ObjectType::UniqueConstraint,
            ObjectType::ForeignKey,
            ObjectType::Index,
        ]
    }

    fn run_after_types(&self) -> Vec<ObjectType> {
        vec![ObjectType::Table]
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
        let column: &Column = downcast(changed_object, ObjectType::Column)?;
        let table = TableRef::qualified(column.schema.as_ref(), &column.table_name, control);
        let mut changes = Vec::new();

        if differences.is_different("type") {
            changes.push(Change::ModifyDataType {
                table: table.clone(),
                column_name: column.name.clone(),
                new_data_type: column.data_type.clone(),
            });
        }

        if differences.is_different("nullable") {
            let change = if column.nullable {
                Change::DropNotNullConstraint {
                    table: table.clone(),
                    column_name: column.name.clone(),
                    column_data_type: column.data_type.clone(),
                }
            } else {
                Change::AddNotNullConstraint {
                    table: table.clone(),
                    column_name: column.name.clone(),
                    column_data_type: column.data_type.clone(),
                }
            };
            changes.push(change);
        }

        if differences.is_different("defaultValue") {
            let change = match &column.default_value {
                Some(default_value) => Change::AddDefaultValue {
                    table: table.clone(),
                    column_name: column.name.clone(),
                    default_value: default_value.clone(),
                },
                None => Change::DropDefaultValue {
                    table: table.clone(),
                    column_name: column.name.clone(),
                },
            };
            changes.push(change);
        }

        if differences.is_different("remarks") {
            changes.push(Change::SetColumnRemarks {
                table,
                column_name: column.name.clone(),
                remarks: column.remarks.clone(),
            });
        }

        if changes.is_empty() {
            return Ok(None);
        }
        Ok(Some(changes))
    }
}
