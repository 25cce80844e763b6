//! Change plan generation.
//!
//! Walks the changed objects of a diff run, asks the generator registry for
//! the changes each one needs, and lays them out in an order that respects
//! the generators' run-before/run-after declarations (tables before columns,
//! columns before indexes, indexes before foreign keys, ...).

use crate::change::Change;
use crate::database::Database;
use crate::diff::{ChangedObject, DiffOutputControl};
use crate::error::Result;
use crate::generator::ChangeGeneratorFactory;
use crate::structure::ObjectType;
use tracing::{debug, info};

/// Changes generated for one changed object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    /// Kind of the changed object.
    pub object_type: ObjectType,
    /// Name of the changed object.
    pub object_name: String,
    /// Generated operations, in execution order.
    pub changes: Vec<Change>,
}

/// Ordered result of a diff run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangePlan {
    /// Per-object entries, ordered by object type then input order.
    pub entries: Vec<PlannedChange>,
}

impl ChangePlan {
    /// Total number of change operations.
    pub fn change_count(&self) -> usize {
        self.entries.iter().map(|e| e.changes.len()).sum()
    }

    /// Check if the plan holds no change at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All change operations, flattened in plan order.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.entries.iter().flat_map(|e| e.changes.iter())
    }

    /// Entries for one object type.
    pub fn entries_for(&self, object_type: &ObjectType) -> Vec<&PlannedChange> {
        self.entries
            .iter()
            .filter(|e| &e.object_type == object_type)
            .collect()
    }
}

/// Builds a [`ChangePlan`] from changed objects.
#[derive(Debug)]
pub struct ChangePlanner<'a> {
    factory: &'a ChangeGeneratorFactory,
    control: DiffOutputControl,
}

impl<'a> ChangePlanner<'a> {
    /// Create a planner over a generator registry.
    pub fn new(factory: &'a ChangeGeneratorFactory, control: DiffOutputControl) -> Self {
        Self { factory, control }
    }

    /// Output control applied to every generated change.
    pub fn control(&self) -> &DiffOutputControl {
        &self.control
    }

    /// Generate the plan for a batch of changed objects.
    ///
    /// Objects whose generators produce nothing are left out of the plan.
    pub fn plan(
        &self,
        changed: &[ChangedObject],
        reference_database: &dyn Database,
        comparison_database: &dyn Database,
    ) -> Result<ChangePlan> {
        let types: Vec<ObjectType> = changed.iter().map(|c| c.object.object_type()).collect();
        let ordered_types = self
            .factory
            .ordered_object_types(&types, comparison_database)?;

        let mut entries = Vec::new();
        for object_type in &ordered_types {
            for item in changed
                .iter()
                .filter(|c| &c.object.object_type() == object_type)
            {
                let changes = self.factory.fix_changed(
                    item.object.as_ref(),
                    &item.differences,
                    &self.control,
                    reference_database,
                    comparison_database,
                )?;

                if changes.is_empty() {
                    debug!(
                        object_type = %object_type,
                        object = item.object.name(),
                        "no changes generated"
                    );
                    continue;
                }

                entries.push(PlannedChange {
                    object_type: object_type.clone(),
                    object_name: item.object.name().to_string(),
                    changes,
                });
            }
        }

        let plan = ChangePlan { entries };
        info!(
            objects = changed.len(),
            changes = plan.change_count(),
            "generated change plan"
        );
        Ok(plan)
    }
}
