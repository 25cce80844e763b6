//! Change generation for changed database objects.
//!
//! A [`ChangeGenerator`] turns the differences detected on one changed object
//! into change operations. Generators are registered with a
//! [`ChangeGeneratorFactory`], which resolves the applicable generators for
//! an object type in priority order and runs them through a
//! [`ChangeGeneratorChain`]. A generator either handles the object itself or
//! defers to the next generator in line.
//!
//! # Priorities
//!
//! | Priority | Value | Meaning |
//! |----------|-------|---------|
//! | `NONE` | -1 | Does not apply |
//! | `DEFAULT` | 1 | Built-in, backend-neutral generator |
//! | `DATABASE` | 5 | Backend-specific override |
//! | `ADDITIONAL` | 50 | Extension that runs ahead of everything else |

mod chain;
pub mod builtin;
mod factory;
pub mod ordering;

pub use chain::ChangeGeneratorChain;
pub use factory::ChangeGeneratorFactory;

use crate::change::Change;
use crate::database::Database;
use crate::diff::{DiffOutputControl, ObjectDifferences};
use crate::error::Result;
use crate::structure::{DatabaseObject, ObjectType};
use std::fmt;

/// How strongly a generator claims an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// The generator does not apply.
    pub const NONE: Priority = Priority(-1);
    /// Built-in generator.
    pub const DEFAULT: Priority = Priority(1);
    /// Backend-specific generator.
    pub const DATABASE: Priority = Priority(5);
    /// Extension generator.
    pub const ADDITIONAL: Priority = Priority(50);

    /// Whether this priority makes the generator eligible.
    pub fn applies(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produces change operations for one kind of changed object.
///
/// Implementations must treat their inputs as read-only and keep no state
/// between invocations.
pub trait ChangeGenerator: Send + Sync {
    /// Stable name used in logs, errors, and [`ChangeGeneratorFactory::unregister`].
    fn name(&self) -> &str;

    /// Priority for the given object type on the given backend.
    fn priority(&self, object_type: &ObjectType, database: &dyn Database) -> Priority;

    /// Object types whose changes must be generated after this one's.
    fn run_before_types(&self) -> Vec<ObjectType> {
        Vec::new()
    }

    /// Object types whose changes must be generated before this one's.
    fn run_after_types(&self) -> Vec<ObjectType> {
        Vec::new()
    }

    /// Generate changes for a changed object.
    ///
    /// Returning `None` (or an empty list) means "nothing to do here" and lets
    /// the chain try the next generator. A generator may also call
    /// [`ChangeGeneratorChain::fix_changed`] itself to obtain the output of the
    /// generators below it.
    fn fix_changed(
        &self,
        changed_object: &dyn DatabaseObject,
        differences: &ObjectDifferences,
        control: &DiffOutputControl,
        reference_database: &dyn Database,
        comparison_database: &dyn Database,
        chain: &mut ChangeGeneratorChain,
    ) -> Result<Option<Vec<Change>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::NONE < Priority::DEFAULT);
        assert!(Priority::DEFAULT < Priority::DATABASE);
        assert!(Priority::DATABASE < Priority::ADDITIONAL);
    }

    #[test]
    fn test_priority_applies() {
        assert!(!Priority::NONE.applies());
        assert!(!Priority(0).applies());
        assert!(Priority::DEFAULT.applies());
    }
}
