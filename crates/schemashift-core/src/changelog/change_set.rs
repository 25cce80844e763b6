//! Change sets and the caller side of precondition policy.

use super::ParsedNode;
use crate::change::Change;
use crate::error::LoadError;
use crate::precondition::{
    CheckContext, ErrorOption, FailOption, PreconditionCheckError, PreconditionContainer,
};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::info;

/// What the run loop should do with a change set after its preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionDecision {
    /// Execute the change set.
    Run,
    /// Leave it out of this run and continue with the next one.
    Skip,
    /// Record it as applied without executing it.
    MarkRan,
}

/// A HALT policy stopped the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("migration failed for {ran_on}: {cause}")]
pub struct MigrationFailed {
    /// Change set or changelog whose preconditions halted the run.
    pub ran_on: String,
    /// The outcome that triggered the halt.
    #[source]
    pub cause: PreconditionCheckError,
}

/// A unit of changes identified by `id`, `author`, and the changelog path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    id: String,
    author: String,
    file_path: String,
    preconditions: Option<PreconditionContainer>,
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Create a change set with no preconditions or changes.
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Attach the change set's `preConditions` block.
    pub fn with_preconditions(mut self, preconditions: PreconditionContainer) -> Self {
        self.preconditions = Some(preconditions);
        self
    }

    /// Append a change.
    pub fn with_change(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }

    /// Identifier unique within the changelog.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Author recorded on the change set.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Path of the changelog that declares it.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// The `preConditions` block, if declared.
    pub fn preconditions(&self) -> Option<&PreconditionContainer> {
        self.preconditions.as_ref()
    }

    /// Changes in declaration order.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Load a `changeSet` node.
    ///
    /// Each entry under `changes` is named by its change kind, e.g.
    /// `{ "dropIndex": { "tableName": ..., "indexName": ... } }`.
    pub fn load(node: &ParsedNode, file_path: impl Into<String>) -> Result<Self, LoadError> {
        let mut change_set = ChangeSet::new(
            node.required_child_value::<String>(None, "id")?,
            node.required_child_value::<String>(None, "author")?,
            file_path,
        );

        if let Some(preconditions) = node.child(None, "preConditions") {
            change_set.preconditions = Some(PreconditionContainer::load(preconditions)?);
        }

        if let Some(changes) = node.child(None, "changes") {
            for entry in changes.children() {
                change_set.changes.push(load_change(entry)?);
            }
        }

        Ok(change_set)
    }

    /// Check this change set's preconditions and decide what to do with it.
    ///
    /// WARN policies are absorbed by the container and yield
    /// [`PreconditionDecision::Run`]. HALT becomes [`MigrationFailed`].
    pub fn check_preconditions(
        &self,
        ctx: &CheckContext<'_>,
    ) -> Result<PreconditionDecision, MigrationFailed> {
        match &self.preconditions {
            Some(preconditions) => gate(preconditions, &ctx.with_change_set(self)),
            None => Ok(PreconditionDecision::Run),
        }
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.file_path, self.id, self.author)
    }
}

fn load_change(entry: &ParsedNode) -> Result<Change, LoadError> {
    let mut fields = match entry.to_json() {
        Value::Object(fields) => fields,
        _ => {
            return Err(LoadError::InvalidValue {
                name: entry.name().to_string(),
                message: "expected change attributes".to_string(),
            })
        }
    };
    fields.insert("change".to_string(), Value::String(entry.name().to_string()));

    serde_json::from_value(Value::Object(fields)).map_err(|e| LoadError::InvalidValue {
        name: entry.name().to_string(),
        message: e.to_string(),
    })
}

/// Apply the caller's half of the policy table to a container check.
pub(super) fn gate(
    preconditions: &PreconditionContainer,
    ctx: &CheckContext<'_>,
) -> Result<PreconditionDecision, MigrationFailed> {
    let ran_on = ctx.ran_on();

    let cause = match preconditions.check(ctx) {
        Ok(()) => return Ok(PreconditionDecision::Run),
        Err(cause) => cause,
    };

    let decision = match &cause {
        PreconditionCheckError::Failed(failed) => {
            let on_fail = failed.on_fail.unwrap_or(preconditions.on_fail());
            if let Some(listener) = ctx.listener {
                listener.precondition_failed(failed, on_fail);
            }
            match on_fail {
                FailOption::Halt => None,
                FailOption::Continue => {
                    info!(ran_on = %ran_on, "Continuing past: {} despite precondition failure", ran_on);
                    Some(PreconditionDecision::Skip)
                }
                FailOption::MarkRan => {
                    info!(ran_on = %ran_on, "Marking {} as ran despite precondition failure", ran_on);
                    Some(PreconditionDecision::MarkRan)
                }
                FailOption::Warn => Some(PreconditionDecision::Run),
            }
        }
        PreconditionCheckError::Errored(errored) => {
            let on_error = errored.on_error.unwrap_or(preconditions.on_error());
            if let Some(listener) = ctx.listener {
                listener.precondition_errored(errored, on_error);
            }
            match on_error {
                ErrorOption::Halt => None,
                ErrorOption::Continue => {
                    info!(ran_on = %ran_on, "Skipping {} after precondition error", ran_on);
                    Some(PreconditionDecision::Skip)
                }
                ErrorOption::MarkRan => {
                    info!(ran_on = %ran_on, "Marking {} as ran despite precondition error", ran_on);
                    Some(PreconditionDecision::MarkRan)
                }
                ErrorOption::Warn => Some(PreconditionDecision::Run),
            }
        }
    };

    decision.ok_or(MigrationFailed { ran_on, cause })
}
