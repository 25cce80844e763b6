//! Schemashift Core - change generation and precondition evaluation for
//! schema migrations.
//!
//! Two subsystems live here:
//!
//! - **Change generation**: differences detected on a changed database object
//!   are turned into change operations by a priority-ordered chain of
//!   [`ChangeGenerator`]s, and a [`ChangePlanner`] walks a batch of changed
//!   objects in dependency order.
//! - **Preconditions**: a [`PreconditionContainer`] evaluates a tree of checks
//!   against a target database and applies its `onFail` / `onError` /
//!   `onSqlOutput` policy; [`ChangeSet::check_preconditions`] turns the result
//!   into a run decision.

pub mod change;
pub mod changelog;
pub mod database;
pub mod diff;
pub mod error;
pub mod executor;
pub mod generator;
pub mod plan;
pub mod precondition;
pub mod structure;
pub mod ui;

pub use change::{Change, TableRef};
pub use changelog::{
    ChangeSet, DatabaseChangeLog, MigrationFailed, ParsedNode, PreconditionDecision,
};
pub use database::{Database, GenericDatabase};
pub use diff::{ChangedObject, DiffOutputControl, Difference, ObjectDifferences};
pub use error::{Error, ExecutorError, LoadError, Result};
pub use executor::{Executor, LoggingExecutor, MemoryExecutor, ObjectReference};
pub use generator::{ChangeGenerator, ChangeGeneratorChain, ChangeGeneratorFactory, Priority};
pub use plan::{ChangePlan, ChangePlanner, PlannedChange};
pub use precondition::{
    CheckContext, ErrorOption, FailOption, OnSqlOutputOption, Precondition,
    PreconditionCheckError, PreconditionContainer, PreconditionErrored, PreconditionFailed,
};
pub use structure::{Column, DatabaseObject, ForeignKey, Index, ObjectType, Schema, Table};
pub use ui::{LoggingUiService, MemoryUiService, UiService};
