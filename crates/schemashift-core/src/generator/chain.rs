//! The generator chain handed to each generator.

use super::ChangeGenerator;
use crate::change::Change;
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::structure::DatabaseObject;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Cursor over the generators that still may handle one changed object.
///
/// Every generator is invoked at most once per chain.
pub struct ChangeGeneratorChain {
    generators: VecDeque<Arc<dyn ChangeGenerator>>,
}

impl ChangeGeneratorChain {
    /// Create a chain over generators already sorted by priority.
    pub fn new(generators: impl IntoIterator<Item = Arc<dyn ChangeGenerator>>) -> Self {
        Self {
            generators: generators.into_iter().collect(),
        }
    }

    /// Number of generators not yet invoked.
    pub fn remaining(&self) -> usize {
        self.generators.len()
    }

    /// Run the next generators in line until one produces changes.
    ///
    /// Returns `None` once the chain is exhausted without output, which is
    /// not an error: a difference may legitimately need no change.
    pub fn fix_changed(
        &mut self,
        changed_object: &dyn DatabaseObject,
        differences: &ObjectDifferences,
        control: &DiffOutputControl,
        reference_database: &dyn Database,
        comparison_database: &dyn Database,
    ) -> Result<Option<Vec<Change>>> {
        while let Some(generator) = self.generators.pop_front() {
            debug!(
                generator = generator.name(),
                object = changed_object.name(),
                object_type = %changed_object.object_type(),
                "running change generator"
            );

            let changes = generator.fix_changed(
                changed_object,
                differences,
                control,
                reference_database,
                comparison_database,
                self,
            )?;

            match changes {
                Some(changes) if !changes.is_empty() => return Ok(Some(changes)),
                _ => continue,
            }
        }

        Ok(None)
    }
}

impl std::fmt::Debug for ChangeGeneratorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.generators.iter().map(|g| g.name()))
            .finish()
    }
}
