//! Indexes and foreign keys.

use super::{DatabaseObject, ObjectType, Schema};
use std::any::Any;

/// An index on a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Containing schema.
    pub schema: Option<Schema>,
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table_name: String,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl Index {
    /// Create a non-unique index.
    pub fn new(
        name: impl Into<String>,
        table_name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            schema: None,
            name: name.into(),
            table_name: table_name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }

    /// Set the containing schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Make the index unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl DatabaseObject for Index {
    fn object_type(&self) -> ObjectType {
        ObjectType::Index
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Containing schema of the base table.
    pub schema: Option<Schema>,
    /// Constraint name.
    pub name: String,
    /// Table holding the constraint.
    pub base_table: String,
    /// Constrained columns.
    pub base_columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
    /// ON DELETE rule (`CASCADE`, `SET NULL`, ...).
    pub on_delete: Option<String>,
}

impl ForeignKey {
    /// Create a foreign key between two column lists.
    pub fn new(
        name: impl Into<String>,
        base_table: impl Into<String>,
        base_columns: impl IntoIterator<Item = impl Into<String>>,
        referenced_table: impl Into<String>,
        referenced_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            schema: None,
            name: name.into(),
            base_table: base_table.into(),
            base_columns: base_columns.into_iter().map(Into::into).collect(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
            on_delete: None,
        }
    }

    /// Set the containing schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the ON DELETE rule.
    pub fn with_on_delete(mut self, rule: impl Into<String>) -> Self {
        self.on_delete = Some(rule.into());
        self
    }
}

impl DatabaseObject for ForeignKey {
    fn object_type(&self) -> ObjectType {
        ObjectType::ForeignKey
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
