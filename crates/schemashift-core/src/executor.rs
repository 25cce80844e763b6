//! Executor boundary.
//!
//! An [`Executor`] either applies statements to the database or only renders
//! them (SQL-emission mode). Preconditions use it to run their check queries
//! and to ask whether objects exist.

use crate::error::ExecutorError;
use crate::structure::{ObjectType, Schema};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Name of the executor bound to a live connection.
pub const JDBC_EXECUTOR: &str = "jdbc";

/// Name of the SQL-rendering executor.
pub const LOGGING_EXECUTOR: &str = "logging";

/// Identifies an object to look up in the target database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    /// Kind of object.
    pub object_type: ObjectType,
    /// Containing schema.
    pub schema: Option<Schema>,
    /// Owning relation, for columns, indexes, and constraints.
    pub relation: Option<String>,
    /// Object name.
    pub name: String,
}

impl ObjectReference {
    /// Reference an object by kind and name.
    pub fn new(object_type: ObjectType, name: impl Into<String>) -> Self {
        Self {
            object_type,
            schema: None,
            relation: None,
            name: name.into(),
        }
    }

    /// Set the containing schema.
    pub fn in_schema(mut self, schema: Option<Schema>) -> Self {
        self.schema = schema;
        self
    }

    /// Set the owning relation.
    pub fn on_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.object_type)?;
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        if let Some(relation) = &self.relation {
            write!(f, "{}.", relation)?;
        }
        f.write_str(&self.name)
    }
}

/// Runs statements and queries against one target database.
pub trait Executor: Send + Sync {
    /// Executor binding name (`jdbc`, `logging`, ...).
    fn name(&self) -> &str;

    /// Whether executing statements changes the database.
    ///
    /// `false` means SQL-emission mode: statements are only rendered.
    fn updates_database(&self) -> bool;

    /// Run a query that yields a single value (or no row).
    fn query_for_value(&self, sql: &str) -> Result<Option<Value>, ExecutorError>;

    /// Check whether an object exists in the target database.
    fn object_exists(&self, object: &ObjectReference) -> Result<bool, ExecutorError>;

    /// Execute a statement.
    fn execute(&self, sql: &str) -> Result<(), ExecutorError>;
}

/// SQL-emission executor.
///
/// Reads are delegated to the wrapped executor so preconditions can still be
/// tested; statements are recorded instead of run.
pub struct LoggingExecutor<E> {
    delegate: E,
    statements: Mutex<Vec<String>>,
}

impl<E: Executor> LoggingExecutor<E> {
    /// Wrap a live executor.
    pub fn new(delegate: E) -> Self {
        Self {
            delegate,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Statements rendered so far.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }

    /// The wrapped executor.
    pub fn delegate(&self) -> &E {
        &self.delegate
    }
}

impl<E: Executor> Executor for LoggingExecutor<E> {
    fn name(&self) -> &str {
        LOGGING_EXECUTOR
    }

    fn updates_database(&self) -> bool {
        false
    }

    fn query_for_value(&self, sql: &str) -> Result<Option<Value>, ExecutorError> {
        self.delegate.query_for_value(sql)
    }

    fn object_exists(&self, object: &ObjectReference) -> Result<bool, ExecutorError> {
        self.delegate.object_exists(object)
    }

    fn execute(&self, sql: &str) -> Result<(), ExecutorError> {
        let mut statement = sql.trim_end().to_string();
        if !statement.ends_with(';') {
            statement.push(';');
        }
        self.statements.lock().push(statement);
        Ok(())
    }
}

/// In-memory executor with canned query results, for testing.
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    sql_only: bool,
    results: HashMap<String, Result<Option<Value>, ExecutorError>>,
    objects: Vec<ObjectReference>,
    log: Mutex<Vec<String>>,
}

impl MemoryExecutor {
    /// Create an executor that reports applying changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report SQL-emission mode instead.
    pub fn sql_only(mut self) -> Self {
        self.sql_only = true;
        self
    }

    /// Answer `sql` with a value.
    pub fn with_result(mut self, sql: impl Into<String>, value: impl Into<Value>) -> Self {
        self.results.insert(sql.into(), Ok(Some(value.into())));
        self
    }

    /// Fail `sql` with a query error.
    pub fn with_failure(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        let sql = sql.into();
        let error = ExecutorError::Query {
            sql: sql.clone(),
            message: message.into(),
        };
        self.results.insert(sql, Err(error));
        self
    }

    /// Declare an object as existing.
    pub fn with_object(mut self, object: ObjectReference) -> Self {
        self.objects.push(object);
        self
    }

    /// Every query, lookup, and statement seen so far.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl Executor for MemoryExecutor {
    fn name(&self) -> &str {
        if self.sql_only {
            LOGGING_EXECUTOR
        } else {
            JDBC_EXECUTOR
        }
    }

    fn updates_database(&self) -> bool {
        !self.sql_only
    }

    fn query_for_value(&self, sql: &str) -> Result<Option<Value>, ExecutorError> {
        self.log.lock().push(format!("query {}", sql));
        match self.results.get(sql) {
            Some(result) => result.clone(),
            None => Ok(None),
        }
    }

    fn object_exists(&self, object: &ObjectReference) -> Result<bool, ExecutorError> {
        self.log.lock().push(format!("exists {}", object));
        Ok(self.objects.iter().any(|o| {
            o.object_type == object.object_type
                && o.name.eq_ignore_ascii_case(&object.name)
                && (object.relation.is_none() || o.relation == object.relation)
                && (object.schema.is_none() || o.schema == object.schema)
        }))
    }

    fn execute(&self, sql: &str) -> Result<(), ExecutorError> {
        self.log.lock().push(format!("execute {}", sql));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logging_executor_records_without_applying() {
        let live = MemoryExecutor::new().with_result("select 1", 1);
        let logging = LoggingExecutor::new(live);

        assert!(!logging.updates_database());
        assert_eq!(logging.name(), LOGGING_EXECUTOR);

        logging.execute("create table t (id int)").unwrap();
        assert_eq!(logging.statements(), vec!["create table t (id int);"]);
        assert!(logging.delegate().log().is_empty());

        assert_eq!(logging.query_for_value("select 1").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_memory_executor_lookup() {
        let executor = MemoryExecutor::new().with_object(
            ObjectReference::new(ObjectType::Column, "email").on_relation("person"),
        );

        let hit = ObjectReference::new(ObjectType::Column, "EMAIL").on_relation("person");
        let miss = ObjectReference::new(ObjectType::Column, "email").on_relation("post");
        assert!(executor.object_exists(&hit).unwrap());
        assert!(!executor.object_exists(&miss).unwrap());
        assert_eq!(executor.log().len(), 2);
    }

    #[test]
    fn test_memory_executor_failure() {
        let executor = MemoryExecutor::new().with_failure("select broken", "syntax error");
        let err = executor.query_for_value("select broken").unwrap_err();
        assert!(err.to_string().contains("syntax error"));
    }
}
