//! Changelogs, change sets, and the precondition gate in front of them.

mod change_set;
mod parsed_node;

pub use change_set::{ChangeSet, MigrationFailed, PreconditionDecision};
pub use parsed_node::ParsedNode;

use crate::error::LoadError;
use crate::precondition::{CheckContext, PreconditionContainer};
use std::collections::HashMap;
use std::fmt;

/// Namespace tag of the standard changelog vocabulary.
pub const STANDARD_CHANGELOG_NAMESPACE: &str = "http://www.liquibase.org/xml/ns/dbchangelog";

/// A changelog file: properties, changelog-level preconditions, change sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseChangeLog {
    physical_path: String,
    properties: HashMap<String, String>,
    preconditions: Option<PreconditionContainer>,
    change_sets: Vec<ChangeSet>,
}

impl DatabaseChangeLog {
    /// Create an empty changelog read from `physical_path`.
    pub fn new(physical_path: impl Into<String>) -> Self {
        Self {
            physical_path: physical_path.into(),
            ..Self::default()
        }
    }

    /// Define a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set changelog-level preconditions.
    pub fn with_preconditions(mut self, preconditions: PreconditionContainer) -> Self {
        self.preconditions = Some(preconditions);
        self
    }

    /// Append a change set.
    pub fn with_change_set(mut self, change_set: ChangeSet) -> Self {
        self.change_sets.push(change_set);
        self
    }

    pub fn physical_path(&self) -> &str {
        &self.physical_path
    }

    /// Value of a property, if defined.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn preconditions(&self) -> Option<&PreconditionContainer> {
        self.preconditions.as_ref()
    }

    pub fn change_sets(&self) -> &[ChangeSet] {
        &self.change_sets
    }

    /// Load a `databaseChangeLog` node.
    ///
    /// Recognized children are `property` (`name`, `value`), `preConditions`
    /// and `changeSet`. Anything else is ignored.
    pub fn load(node: &ParsedNode, physical_path: impl Into<String>) -> Result<Self, LoadError> {
        let mut change_log = DatabaseChangeLog::new(physical_path);
        for child in node.children() {
            match child.name() {
                "property" => {
                    let name: String = child.required_child_value(None, "name")?;
                    let value: String = child.required_child_value(None, "value")?;
                    change_log.properties.insert(name, value);
                }
                "preConditions" => {
                    change_log.preconditions = Some(PreconditionContainer::load(child)?);
                }
                "changeSet" => {
                    let change_set = ChangeSet::load(child, change_log.physical_path.clone())?;
                    change_log.change_sets.push(change_set);
                }
                _ => {}
            }
        }
        Ok(change_log)
    }

    /// Run the changelog-level preconditions through the gate.
    pub fn check_preconditions(
        &self,
        ctx: &CheckContext<'_>,
    ) -> Result<PreconditionDecision, MigrationFailed> {
        match &self.preconditions {
            Some(preconditions) => change_set::gate(preconditions, ctx),
            None => Ok(PreconditionDecision::Run),
        }
    }
}

impl fmt::Display for DatabaseChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.physical_path)
    }
}
