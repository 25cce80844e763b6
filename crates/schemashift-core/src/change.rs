//! Change operations emitted by generators.
//!
//! Only the shape of each operation lives here. Rendering SQL from a change
//! is the job of the SQL generation layer.

use crate::diff::DiffOutputControl;
use crate::structure::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualified name of the relation a change applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    pub table_name: String,
}

impl TableRef {
    /// Build a reference, keeping only the qualifiers the output control allows.
    pub fn qualified(
        schema: Option<&Schema>,
        table_name: impl Into<String>,
        control: &DiffOutputControl,
    ) -> Self {
        let catalog_name = schema
            .and_then(|s| s.catalog_name.clone())
            .filter(|_| control.include_catalog);
        let schema_name = schema
            .and_then(|s| s.name.clone())
            .filter(|_| control.include_schema);

        Self {
            catalog_name,
            schema_name,
            table_name: table_name.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog_name {
            write!(f, "{}.", catalog)?;
        }
        if let Some(schema) = &self.schema_name {
            write!(f, "{}.", schema)?;
        }
        f.write_str(&self.table_name)
    }
}

/// An executable unit of schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Change {
    /// Set (or clear) the comment on a table.
    SetTableRemarks {
        #[serde(flatten)]
        table: TableRef,
        remarks: Option<String>,
    },
    /// Set (or clear) the comment on a column.
    SetColumnRemarks {
        #[serde(flatten)]
        table: TableRef,
        column_name: String,
        remarks: Option<String>,
    },
    /// Change the declared type of a column.
    ModifyDataType {
        #[serde(flatten)]
        table: TableRef,
        column_name: String,
        new_data_type: String,
    },
    /// Make a column NOT NULL.
    AddNotNullConstraint {
        #[serde(flatten)]
        table: TableRef,
        column_name: String,
        column_data_type: String,
    },
    /// Allow NULL in a column.
    DropNotNullConstraint {
        #[serde(flatten)]
        table: TableRef,
        column_name: String,
        column_data_type: String,
    },
    /// Set a column default.
    AddDefaultValue {
        #[serde(flatten)]
        table: TableRef,
        column_name: String,
        default_value: String,
    },
    /// Remove a column default.
    DropDefaultValue {
        #[serde(flatten)]
        table: TableRef,
        column_name: String,
    },
    /// Create an index.
    CreateIndex {
        #[serde(flatten)]
        table: TableRef,
        index_name: String,
        columns: Vec<String>,
        unique: bool,
    },
    /// Drop an index.
    DropIndex {
        #[serde(flatten)]
        table: TableRef,
        index_name: String,
    },
    /// Add a foreign key constraint.
    AddForeignKeyConstraint {
        #[serde(flatten)]
        table: TableRef,
        constraint_name: String,
        base_column_names: Vec<String>,
        referenced_table_name: String,
        referenced_column_names: Vec<String>,
        on_delete: Option<String>,
    },
    /// Drop a foreign key constraint.
    DropForeignKeyConstraint {
        #[serde(flatten)]
        table: TableRef,
        constraint_name: String,
    },
}

impl Change {
    /// Changelog name of this change kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::SetTableRemarks { .. } => "setTableRemarks",
            Change::SetColumnRemarks { .. } => "setColumnRemarks",
            Change::ModifyDataType { .. } => "modifyDataType",
            Change::AddNotNullConstraint { .. } => "addNotNullConstraint",
            Change::DropNotNullConstraint { .. } => "dropNotNullConstraint",
            Change::AddDefaultValue { .. } => "addDefaultValue",
            Change::DropDefaultValue { .. } => "dropDefaultValue",
            Change::CreateIndex { .. } => "createIndex",
            Change::DropIndex { .. } => "dropIndex",
            Change::AddForeignKeyConstraint { .. } => "addForeignKeyConstraint",
            Change::DropForeignKeyConstraint { .. } => "dropForeignKeyConstraint",
        }
    }

    /// The relation this change touches.
    pub fn table(&self) -> &TableRef {
        match self {
            Change::SetTableRemarks { table, .. }
            | Change::SetColumnRemarks { table, .. }
            | Change::ModifyDataType { table, .. }
            | Change::AddNotNullConstraint { table, .. }
            | Change::DropNotNullConstraint { table, .. }
            | Change::AddDefaultValue { table, .. }
            | Change::DropDefaultValue { table, .. }
            | Change::CreateIndex { table, .. }
            | Change::DropIndex { table, .. }
            | Change::AddForeignKeyConstraint { table, .. }
            | Change::DropForeignKeyConstraint { table, .. } => table,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::SetTableRemarks { table, .. } => write!(f, "Set remarks on table {}", table),
            Change::SetColumnRemarks {
                table, column_name, ..
            } => write!(f, "Set remarks on column {}.{}", table, column_name),
            Change::ModifyDataType {
                table,
                column_name,
                new_data_type,
            } => write!(
                f,
                "Change type of {}.{} to {}",
                table, column_name, new_data_type
            ),
            Change::AddNotNullConstraint {
                table, column_name, ..
            } => write!(f, "Add NOT NULL to {}.{}", table, column_name),
            Change::DropNotNullConstraint {
                table, column_name, ..
            } => write!(f, "Drop NOT NULL from {}.{}", table, column_name),
            Change::AddDefaultValue {
                table,
                column_name,
                default_value,
            } => write!(
                f,
                "Set default of {}.{} to {}",
                table, column_name, default_value
            ),
            Change::DropDefaultValue { table, column_name } => {
                write!(f, "Drop default of {}.{}", table, column_name)
            }
            Change::CreateIndex {
                table, index_name, ..
            } => write!(f, "Create index {} on {}", index_name, table),
            Change::DropIndex { table, index_name } => {
                write!(f, "Drop index {} on {}", index_name, table)
            }
            Change::AddForeignKeyConstraint {
                table,
                constraint_name,
                ..
            } => write!(f, "Add foreign key {} on {}", constraint_name, table),
            Change::DropForeignKeyConstraint {
                table,
                constraint_name,
            } => write!(f, "Drop foreign key {} on {}", constraint_name, table),
        }
    }
}
