//! Tables and columns.

use super::{DatabaseObject, ObjectType, Schema};
use std::any::Any;

/// A table as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Containing schema.
    pub schema: Option<Schema>,
    /// Table name.
    pub name: String,
    /// Table comment.
    pub remarks: Option<String>,
    /// Tablespace, for backends that expose one.
    pub tablespace: Option<String>,
}

impl Table {
    /// Create a table with no schema and no remarks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            remarks: None,
            tablespace: None,
        }
    }

    /// Set the containing schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the table comment.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Set the tablespace.
    pub fn with_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.tablespace = Some(tablespace.into());
        self
    }
}

impl DatabaseObject for Table {
    fn object_type(&self) -> ObjectType {
        ObjectType::Table
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A column of a table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Containing schema of the owning relation.
    pub schema: Option<Schema>,
    /// Owning relation name.
    pub table_name: String,
    /// Column name.
    pub name: String,
    /// Declared SQL type.
    pub data_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Column comment.
    pub remarks: Option<String>,
}

impl Column {
    /// Create a nullable column without a default.
    pub fn new(
        table_name: impl Into<String>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            schema: None,
            table_name: table_name.into(),
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default_value: None,
            remarks: None,
        }
    }

    /// Set the containing schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set the default value expression.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Set the column comment.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

impl DatabaseObject for Column {
    fn object_type(&self) -> ObjectType {
        ObjectType::Column
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
