//! Database object model.
//!
//! Generators and preconditions consume compared objects through the
//! [`DatabaseObject`] capability trait. The concrete types here cover the
//! objects the built-in generators handle; other crates may add their own
//! by implementing the trait with an [`ObjectType::Custom`] kind.

mod constraint;
mod table;

pub use constraint::{ForeignKey, Index};
pub use table::{Column, Table};

use crate::error::{Error, Result};
use serde::Serialize;
use std::any::Any;
use std::fmt;

/// Kind of database object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    Catalog,
    Schema,
    Table,
    View,
    Column,
    PrimaryKey,
    ForeignKey,
    Index,
    UniqueConstraint,
    Sequence,
    /// Object kind supplied by an extension.
    Custom(String),
}

impl ObjectType {
    /// Changelog-facing name of this kind.
    pub fn name(&self) -> &str {
        match self {
            ObjectType::Catalog => "catalog",
            ObjectType::Schema => "schema",
            ObjectType::Table => "table",
            ObjectType::View => "view",
            ObjectType::Column => "column",
            ObjectType::PrimaryKey => "primaryKey",
            ObjectType::ForeignKey => "foreignKey",
            ObjectType::Index => "index",
            ObjectType::UniqueConstraint => "uniqueConstraint",
            ObjectType::Sequence => "sequence",
            ObjectType::Custom(name) => name,
        }
    }

    /// Whether this kind is a relation (something with columns).
    pub fn is_relation(&self) -> bool {
        matches!(self, ObjectType::Table | ObjectType::View)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability set shared by every compared object.
pub trait DatabaseObject: fmt::Debug + Send + Sync {
    /// Runtime kind of this object.
    fn object_type(&self) -> ObjectType;

    /// Object name.
    fn name(&self) -> &str;

    /// Containing schema, if known.
    fn schema(&self) -> Option<&Schema>;

    /// Free-text remarks (comments) attached to the object.
    fn remarks(&self) -> Option<&str> {
        None
    }

    /// Access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Downcast a compared object to the concrete type a generator handles.
pub fn downcast<'a, T: DatabaseObject + 'static>(
    object: &'a dyn DatabaseObject,
    expected: ObjectType,
) -> Result<&'a T> {
    object
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::UnsupportedObject {
            expected: expected.to_string(),
            actual: object.object_type().to_string(),
        })
}

/// A schema, optionally inside a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Catalog name, for backends that have catalogs.
    pub catalog_name: Option<String>,
    /// Schema name.
    pub name: Option<String>,
}

impl Schema {
    /// Create a schema reference.
    pub fn new(catalog_name: Option<&str>, name: Option<&str>) -> Self {
        Self {
            catalog_name: catalog_name.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    /// Schema with a name and no catalog.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            catalog_name: None,
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.catalog_name, &self.name) {
            (Some(catalog), Some(name)) => write!(f, "{}.{}", catalog, name),
            (None, Some(name)) => f.write_str(name),
            (Some(catalog), None) => f.write_str(catalog),
            (None, None) => f.write_str("DEFAULT"),
        }
    }
}
