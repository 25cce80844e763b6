//! Detected differences between a reference and a comparison object.
//!
//! These records are produced by the snapshot comparison layer and are
//! read-only from here on: generators inspect them, never mutate them.

mod control;

pub use control::DiffOutputControl;

use crate::structure::DatabaseObject;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One field-level delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    field: String,
    reference_value: Value,
    compared_value: Value,
}

impl Difference {
    /// Create a difference record.
    pub fn new(
        field: impl Into<String>,
        reference_value: impl Into<Value>,
        compared_value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            reference_value: reference_value.into(),
            compared_value: compared_value.into(),
        }
    }

    /// Name of the differing field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Value on the reference side.
    pub fn reference_value(&self) -> &Value {
        &self.reference_value
    }

    /// Value on the comparison side.
    pub fn compared_value(&self) -> &Value {
        &self.compared_value
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed from '{}' to '{}'",
            self.field, self.reference_value, self.compared_value
        )
    }
}

/// All differences detected for one compared object pair, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectDifferences {
    differences: HashMap<String, Difference>,
}

impl ObjectDifferences {
    /// Create an empty difference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a difference. A later record for the same field replaces the earlier one.
    pub fn with_difference(
        mut self,
        field: impl Into<String>,
        reference_value: impl Into<Value>,
        compared_value: impl Into<Value>,
    ) -> Self {
        let difference = Difference::new(field, reference_value, compared_value);
        self.differences
            .insert(difference.field.clone(), difference);
        self
    }

    /// Look up the difference for a field.
    pub fn difference(&self, field: &str) -> Option<&Difference> {
        self.differences.get(field)
    }

    /// Check whether a field differs.
    pub fn is_different(&self, field: &str) -> bool {
        self.differences.contains_key(field)
    }

    /// Check if any field differs.
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    /// Number of differing fields.
    pub fn len(&self) -> usize {
        self.differences.len()
    }

    /// Check if there are no differences.
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Iterate over all differences, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Difference> {
        self.differences.values()
    }
}

/// A changed object paired with its differences.
#[derive(Debug, Clone)]
pub struct ChangedObject {
    /// The comparison-side ("after") object.
    pub object: Arc<dyn DatabaseObject>,
    /// What differs from the reference side.
    pub differences: ObjectDifferences,
}

impl ChangedObject {
    /// Pair an object with its differences.
    pub fn new(object: impl DatabaseObject + 'static, differences: ObjectDifferences) -> Self {
        Self {
            object: Arc::new(object),
            differences,
        }
    }
}
