//! Precondition engine.
//!
//! A precondition tree is evaluated into an [`Evaluation`] value that lists
//! failed and errored nodes; every child is visited. Only
//! [`PreconditionContainer::check`] turns that value into a raised outcome,
//! applying the container's `onFail` / `onError` / `onSqlOutput` policy.
//!
//! Collaborators (database, executor, changelog, listener, UI sink) are passed
//! explicitly through a [`CheckContext`].

mod container;
mod listener;
mod options;
mod outcome;

pub use container::PreconditionContainer;
pub use listener::{ChangeExecListener, ListenerEvent, MemoryExecListener};
pub use options::{ErrorOption, FailOption, OnSqlOutputOption, PolicyOption};
pub use outcome::{
    ErrorPrecondition, Evaluation, FailedPrecondition, PreconditionCheckError,
    PreconditionErrored, PreconditionFailed,
};

use crate::changelog::{ChangeSet, DatabaseChangeLog, ParsedNode};
use crate::database::Database;
use crate::error::{ExecutorError, LoadError};
use crate::executor::{Executor, ObjectReference};
use crate::structure::{ObjectType, Schema};
use crate::ui::{LoggingUiService, UiService};
use serde_json::Value;
use std::fmt;

static DEFAULT_UI: LoggingUiService = LoggingUiService;

/// Everything a precondition check needs from its surroundings.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    /// Target database.
    pub database: &'a dyn Database,
    /// Executor bound to the target.
    pub executor: &'a dyn Executor,
    /// Changelog being run.
    pub change_log: &'a DatabaseChangeLog,
    /// Change set being run, absent for changelog-level preconditions.
    pub change_set: Option<&'a ChangeSet>,
    /// Execution listener.
    pub listener: Option<&'a dyn ChangeExecListener>,
    /// User-facing message sink.
    pub ui: &'a dyn UiService,
}

impl<'a> CheckContext<'a> {
    /// Context for a changelog-level check, logging UI messages through `tracing`.
    pub fn new(
        database: &'a dyn Database,
        executor: &'a dyn Executor,
        change_log: &'a DatabaseChangeLog,
    ) -> Self {
        Self {
            database,
            executor,
            change_log,
            change_set: None,
            listener: None,
            ui: &DEFAULT_UI,
        }
    }

    /// Check on behalf of a change set.
    pub fn with_change_set(mut self, change_set: &'a ChangeSet) -> Self {
        self.change_set = Some(change_set);
        self
    }

    /// Notify a listener.
    pub fn with_listener(mut self, listener: &'a dyn ChangeExecListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Send user-facing messages to `ui`.
    pub fn with_ui(mut self, ui: &'a dyn UiService) -> Self {
        self.ui = ui;
        self
    }

    /// Label of the unit being checked: the change set if any, else the changelog.
    pub fn ran_on(&self) -> String {
        match self.change_set {
            Some(change_set) => change_set.to_string(),
            None => self.change_log.to_string(),
        }
    }

    fn fail(&self, message: impl Into<String>, precondition: &Precondition) -> Evaluation {
        Evaluation::failed(FailedPrecondition::new(
            message,
            precondition.to_string(),
            self.change_log.to_string(),
        ))
    }

    fn error(&self, cause: ExecutorError, precondition: &Precondition) -> Evaluation {
        Evaluation::errored(ErrorPrecondition::new(
            cause,
            precondition.to_string(),
            self.change_log.to_string(),
        ))
    }
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("database", &self.database.short_name())
            .field("executor", &self.executor.name())
            .field("change_log", &self.change_log.to_string())
            .field("change_set", &self.change_set.map(|c| c.to_string()))
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// A node of a precondition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    /// Passes when every child passes.
    And(Vec<Precondition>),
    /// Passes when any child passes.
    Or(Vec<Precondition>),
    /// Passes when every child fails.
    Not(Vec<Precondition>),
    /// Nested container with its own policy.
    Container(Box<PreconditionContainer>),
    /// Query returning a single value compared against `expected_result`.
    SqlCheck { sql: String, expected_result: String },
    TableExists {
        schema: Option<Schema>,
        table_name: String,
    },
    ColumnExists {
        schema: Option<Schema>,
        table_name: String,
        column_name: String,
    },
    ViewExists {
        schema: Option<Schema>,
        view_name: String,
    },
    IndexExists {
        schema: Option<Schema>,
        table_name: Option<String>,
        index_name: String,
    },
    ForeignKeyExists {
        schema: Option<Schema>,
        table_name: Option<String>,
        foreign_key_name: String,
    },
    /// Comma-separated backend short names; `!name` excludes a backend.
    Dbms { types: String },
    /// Connection user must match, ignoring case.
    RunningAs { username: String },
    /// Changelog property must be set, optionally to a given value.
    ChangeLogPropertyDefined {
        property: String,
        value: Option<String>,
    },
}

impl Precondition {
    /// Changelog node name.
    pub fn name(&self) -> &'static str {
        match self {
            Precondition::And(_) => "and",
            Precondition::Or(_) => "or",
            Precondition::Not(_) => "not",
            Precondition::Container(_) => "preConditions",
            Precondition::SqlCheck { .. } => "sqlCheck",
            Precondition::TableExists { .. } => "tableExists",
            Precondition::ColumnExists { .. } => "columnExists",
            Precondition::ViewExists { .. } => "viewExists",
            Precondition::IndexExists { .. } => "indexExists",
            Precondition::ForeignKeyExists { .. } => "foreignKeyConstraintExists",
            Precondition::Dbms { .. } => "dbms",
            Precondition::RunningAs { .. } => "runningAs",
            Precondition::ChangeLogPropertyDefined { .. } => "changeLogPropertyDefined",
        }
    }

    /// Evaluate this node and all of its descendants.
    pub fn evaluate(&self, ctx: &CheckContext<'_>) -> Evaluation {
        match self {
            Precondition::And(children) => evaluate_all(children, ctx),
            Precondition::Or(children) => {
                let mut combined = Evaluation::passed();
                for child in children {
                    let evaluation = child.evaluate(ctx);
                    if evaluation.is_passed() {
                        return Evaluation::passed();
                    }
                    combined.merge(evaluation);
                }
                combined
            }
            Precondition::Not(children) => {
                let mut combined = Evaluation::passed();
                for child in children {
                    let evaluation = child.evaluate(ctx);
                    if evaluation.is_passed() {
                        combined.merge(ctx.fail("Not precondition failed", self));
                    } else {
                        combined.errors.extend(evaluation.errors);
                    }
                }
                combined
            }
            Precondition::Container(container) => match container.check(ctx) {
                Ok(()) => Evaluation::passed(),
                Err(PreconditionCheckError::Failed(failed)) => Evaluation {
                    failed: failed.failed,
                    errors: Vec::new(),
                },
                Err(PreconditionCheckError::Errored(errored)) => Evaluation {
                    failed: errored.failed,
                    errors: errored.errors,
                },
            },
            Precondition::SqlCheck {
                sql,
                expected_result,
            } => match ctx.executor.query_for_value(sql) {
                Err(cause) => ctx.error(cause, self),
                Ok(None) => ctx.fail("No rows returned from SQL Precondition", self),
                Ok(Some(value)) => {
                    let actual = value_text(&value);
                    if actual == expected_result.trim() {
                        Evaluation::passed()
                    } else {
                        ctx.fail(
                            format!(
                                "SQL Precondition failed.  Expected '{}' got '{}'",
                                expected_result, actual
                            ),
                            self,
                        )
                    }
                }
            },
            Precondition::TableExists { schema, table_name } => {
                let reference =
                    ObjectReference::new(ObjectType::Table, table_name).in_schema(schema.clone());
                self.exists(ctx, &reference, "Table")
            }
            Precondition::ColumnExists {
                schema,
                table_name,
                column_name,
            } => {
                let reference = ObjectReference::new(ObjectType::Column, column_name)
                    .in_schema(schema.clone())
                    .on_relation(table_name);
                self.exists(ctx, &reference, "Column")
            }
            Precondition::ViewExists { schema, view_name } => {
                let reference =
                    ObjectReference::new(ObjectType::View, view_name).in_schema(schema.clone());
                self.exists(ctx, &reference, "View")
            }
            Precondition::IndexExists {
                schema,
                table_name,
                index_name,
            } => {
                let mut reference =
                    ObjectReference::new(ObjectType::Index, index_name).in_schema(schema.clone());
                if let Some(table) = table_name {
                    reference = reference.on_relation(table);
                }
                self.exists(ctx, &reference, "Index")
            }
            Precondition::ForeignKeyExists {
                schema,
                table_name,
                foreign_key_name,
            } => {
                let mut reference = ObjectReference::new(ObjectType::ForeignKey, foreign_key_name)
                    .in_schema(schema.clone());
                if let Some(table) = table_name {
                    reference = reference.on_relation(table);
                }
                self.exists(ctx, &reference, "Foreign Key")
            }
            Precondition::Dbms { types } => {
                let short_name = ctx.database.short_name();
                if dbms_matches(types, short_name) {
                    Evaluation::passed()
                } else {
                    ctx.fail(
                        format!(
                            "DBMS Precondition failed: expected {}, got {}",
                            types, short_name
                        ),
                        self,
                    )
                }
            }
            Precondition::RunningAs { username } => match ctx.database.connection_username() {
                None => ctx.error(
                    ExecutorError::Connection("Cannot determine connection username".into()),
                    self,
                ),
                Some(actual) if actual.eq_ignore_ascii_case(username) => Evaluation::passed(),
                Some(actual) => ctx.fail(
                    format!(
                        "RunningAs Precondition failed: expected {}, was {}",
                        username, actual
                    ),
                    self,
                ),
            },
            Precondition::ChangeLogPropertyDefined { property, value } => {
                match (ctx.change_log.property(property), value) {
                    (None, _) => ctx.fail(format!("Property {} was not defined", property), self),
                    (Some(actual), Some(expected)) if actual != expected => ctx.fail(
                        format!(
                            "Property {} was set to {} not {}",
                            property, actual, expected
                        ),
                        self,
                    ),
                    _ => Evaluation::passed(),
                }
            }
        }
    }

    fn exists(&self, ctx: &CheckContext<'_>, reference: &ObjectReference, kind: &str) -> Evaluation {
        match ctx.executor.object_exists(reference) {
            Ok(true) => Evaluation::passed(),
            Ok(false) => ctx.fail(format!("{} {} does not exist", kind, qualified(reference)), self),
            Err(cause) => ctx.error(cause, self),
        }
    }

    /// Load a node by its changelog name.
    pub fn load(node: &ParsedNode) -> Result<Self, LoadError> {
        let precondition = match node.name() {
            "and" => Precondition::And(load_children(node)?),
            "or" => Precondition::Or(load_children(node)?),
            "not" => Precondition::Not(load_children(node)?),
            "preConditions" => {
                Precondition::Container(Box::new(PreconditionContainer::load(node)?))
            }
            "sqlCheck" => {
                let sql = match node.child_value::<String>(None, "sql")? {
                    Some(sql) => sql,
                    None => node
                        .value_as::<String>()?
                        .ok_or_else(|| LoadError::MissingValue("sqlCheck.sql".into()))?,
                };
                Precondition::SqlCheck {
                    sql: sql.trim().to_string(),
                    expected_result: node.required_child_value(None, "expectedResult")?,
                }
            }
            "tableExists" => Precondition::TableExists {
                schema: load_schema(node)?,
                table_name: node.required_child_value(None, "tableName")?,
            },
            "columnExists" => Precondition::ColumnExists {
                schema: load_schema(node)?,
                table_name: node.required_child_value(None, "tableName")?,
                column_name: node.required_child_value(None, "columnName")?,
            },
            "viewExists" => Precondition::ViewExists {
                schema: load_schema(node)?,
                view_name: node.required_child_value(None, "viewName")?,
            },
            "indexExists" => Precondition::IndexExists {
                schema: load_schema(node)?,
                table_name: node.child_value(None, "tableName")?,
                index_name: node.required_child_value(None, "indexName")?,
            },
            "foreignKeyConstraintExists" => Precondition::ForeignKeyExists {
                schema: load_schema(node)?,
                table_name: node.child_value(None, "foreignKeyTableName")?,
                foreign_key_name: node.required_child_value(None, "foreignKeyName")?,
            },
            "dbms" => Precondition::Dbms {
                types: node.required_child_value(None, "type")?,
            },
            "runningAs" => Precondition::RunningAs {
                username: node.required_child_value(None, "username")?,
            },
            "changeLogPropertyDefined" => Precondition::ChangeLogPropertyDefined {
                property: node.required_child_value(None, "property")?,
                value: node.child_value(None, "value")?,
            },
            other => return Err(LoadError::UnknownPrecondition(other.to_string())),
        };
        Ok(precondition)
    }

    /// Serialize back into a changelog node.
    pub fn to_parsed_node(&self) -> ParsedNode {
        let node = ParsedNode::new(None, self.name());
        match self {
            Precondition::And(children) | Precondition::Or(children) | Precondition::Not(children) => {
                children
                    .iter()
                    .fold(node, |node, child| node.with_child(child.to_parsed_node()))
            }
            Precondition::Container(container) => container.to_parsed_node(),
            Precondition::SqlCheck {
                sql,
                expected_result,
            } => node
                .with_child_value("expectedResult", expected_result.as_str())
                .with_child_value("sql", sql.as_str()),
            Precondition::TableExists { schema, table_name } => {
                with_schema(node, schema).with_child_value("tableName", table_name.as_str())
            }
            Precondition::ColumnExists {
                schema,
                table_name,
                column_name,
            } => with_schema(node, schema)
                .with_child_value("tableName", table_name.as_str())
                .with_child_value("columnName", column_name.as_str()),
            Precondition::ViewExists { schema, view_name } => {
                with_schema(node, schema).with_child_value("viewName", view_name.as_str())
            }
            Precondition::IndexExists {
                schema,
                table_name,
                index_name,
            } => {
                let node = with_optional(with_schema(node, schema), "tableName", table_name);
                node.with_child_value("indexName", index_name.as_str())
            }
            Precondition::ForeignKeyExists {
                schema,
                table_name,
                foreign_key_name,
            } => {
                let node =
                    with_optional(with_schema(node, schema), "foreignKeyTableName", table_name);
                node.with_child_value("foreignKeyName", foreign_key_name.as_str())
            }
            Precondition::Dbms { types } => node.with_child_value("type", types.as_str()),
            Precondition::RunningAs { username } => {
                node.with_child_value("username", username.as_str())
            }
            Precondition::ChangeLogPropertyDefined { property, value } => {
                with_optional(node.with_child_value("property", property.as_str()), "value", value)
            }
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::SqlCheck { sql, .. } => write!(f, "sqlCheck({})", sql),
            Precondition::TableExists { table_name, .. } => write!(f, "tableExists({})", table_name),
            Precondition::ColumnExists {
                table_name,
                column_name,
                ..
            } => write!(f, "columnExists({}.{})", table_name, column_name),
            Precondition::ViewExists { view_name, .. } => write!(f, "viewExists({})", view_name),
            Precondition::IndexExists { index_name, .. } => write!(f, "indexExists({})", index_name),
            Precondition::ForeignKeyExists {
                foreign_key_name, ..
            } => write!(f, "foreignKeyConstraintExists({})", foreign_key_name),
            Precondition::Dbms { types } => write!(f, "dbms({})", types),
            Precondition::RunningAs { username } => write!(f, "runningAs({})", username),
            Precondition::ChangeLogPropertyDefined { property, .. } => {
                write!(f, "changeLogPropertyDefined({})", property)
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Evaluate every child, collecting all failures and errors.
pub(crate) fn evaluate_all(children: &[Precondition], ctx: &CheckContext<'_>) -> Evaluation {
    children
        .iter()
        .fold(Evaluation::passed(), |mut combined, child| {
            combined.merge(child.evaluate(ctx));
            combined
        })
}

pub(crate) fn load_children(node: &ParsedNode) -> Result<Vec<Precondition>, LoadError> {
    node.children().iter().map(Precondition::load).collect()
}

fn load_schema(node: &ParsedNode) -> Result<Option<Schema>, LoadError> {
    let catalog: Option<String> = node.child_value(None, "catalogName")?;
    let schema: Option<String> = node.child_value(None, "schemaName")?;
    if catalog.is_none() && schema.is_none() {
        return Ok(None);
    }
    Ok(Some(Schema::new(catalog.as_deref(), schema.as_deref())))
}

fn with_schema(node: ParsedNode, schema: &Option<Schema>) -> ParsedNode {
    match schema {
        Some(schema) => {
            let node = with_optional(node, "catalogName", &schema.catalog_name);
            with_optional(node, "schemaName", &schema.name)
        }
        None => node,
    }
}

fn with_optional(node: ParsedNode, name: &str, value: &Option<String>) -> ParsedNode {
    match value {
        Some(value) => node.with_child_value(name, value.as_str()),
        None => node,
    }
}

fn qualified(reference: &ObjectReference) -> String {
    let mut name = String::new();
    if let Some(schema) = &reference.schema {
        name.push_str(&schema.to_string());
        name.push('.');
    }
    if let Some(relation) = &reference.relation {
        name.push_str(relation);
        name.push('.');
    }
    name.push_str(&reference.name);
    name
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Match a backend short name against a `dbms` definition.
///
/// An empty definition or `all` matches everything. Negated entries exclude;
/// when any positive entry exists the backend must be listed.
fn dbms_matches(definition: &str, short_name: &str) -> bool {
    let entries: Vec<&str> = definition
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    let mut has_positive = false;
    let mut listed = false;
    for entry in &entries {
        if let Some(excluded) = entry.strip_prefix('!') {
            if excluded.trim().eq_ignore_ascii_case(short_name) {
                return false;
            }
        } else {
            has_positive = true;
            if entry.eq_ignore_ascii_case("all") || entry.eq_ignore_ascii_case(short_name) {
                listed = true;
            }
        }
    }
    !has_positive || listed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::GenericDatabase;
    use crate::executor::MemoryExecutor;
    use serde_json::json;

    fn change_log() -> DatabaseChangeLog {
        DatabaseChangeLog::new("db/changelog.json").with_property("env", "prod")
    }

    #[test]
    fn test_dbms_matching() {
        assert!(dbms_matches("postgresql", "postgresql"));
        assert!(dbms_matches("mysql, PostgreSQL", "postgresql"));
        assert!(!dbms_matches("mysql", "postgresql"));
        assert!(!dbms_matches("!postgresql", "postgresql"));
        assert!(dbms_matches("!mysql", "postgresql"));
        assert!(dbms_matches("all", "h2"));
        assert!(dbms_matches("", "h2"));
    }

    #[test]
    fn test_sql_check() {
        let database = GenericDatabase::new("postgresql");
        let executor = MemoryExecutor::new()
            .with_result("select count(*) from person", 0)
            .with_result("select status from flags", "ready")
            .with_failure("select broken", "syntax error");
        let log = change_log();
        let ctx = CheckContext::new(&database, &executor, &log);

        let check = |sql: &str, expected: &str| Precondition::SqlCheck {
            sql: sql.into(),
            expected_result: expected.into(),
        };

        assert!(check("select count(*) from person", "0").evaluate(&ctx).is_passed());
        assert!(check("select status from flags", "ready").evaluate(&ctx).is_passed());

        let mismatch = check("select count(*) from person", "1").evaluate(&ctx);
        assert_eq!(
            mismatch.failed[0].message,
            "SQL Precondition failed.  Expected '1' got '0'"
        );

        let empty = check("select nothing", "1").evaluate(&ctx);
        assert_eq!(empty.failed[0].message, "No rows returned from SQL Precondition");

        let broken = check("select broken", "1").evaluate(&ctx);
        assert!(broken.failed.is_empty());
        assert_eq!(broken.errors.len(), 1);
    }

    #[test]
    fn test_exists_checks() {
        let database = GenericDatabase::new("postgresql");
        let executor = MemoryExecutor::new()
            .with_object(ObjectReference::new(ObjectType::Table, "person"))
            .with_object(ObjectReference::new(ObjectType::Column, "email").on_relation("person"));
        let log = change_log();
        let ctx = CheckContext::new(&database, &executor, &log);

        let table = Precondition::TableExists {
            schema: None,
            table_name: "person".into(),
        };
        assert!(table.evaluate(&ctx).is_passed());

        let column = Precondition::ColumnExists {
            schema: None,
            table_name: "person".into(),
            column_name: "phone".into(),
        };
        let evaluation = column.evaluate(&ctx);
        assert_eq!(evaluation.failed[0].message, "Column person.phone does not exist");
    }

    #[test]
    fn test_or_and_not() {
        let database = GenericDatabase::new("postgresql");
        let executor = MemoryExecutor::new();
        let log = change_log();
        let ctx = CheckContext::new(&database, &executor, &log);

        let pg = Precondition::Dbms {
            types: "postgresql".into(),
        };
        let mysql = Precondition::Dbms {
            types: "mysql".into(),
        };

        assert!(Precondition::Or(vec![mysql.clone(), pg.clone()])
            .evaluate(&ctx)
            .is_passed());
        assert_eq!(
            Precondition::Or(vec![mysql.clone(), mysql.clone()])
                .evaluate(&ctx)
                .failed
                .len(),
            2
        );
        assert!(Precondition::Not(vec![mysql.clone()]).evaluate(&ctx).is_passed());

        let negated = Precondition::Not(vec![pg]).evaluate(&ctx);
        assert_eq!(negated.failed[0].message, "Not precondition failed");
    }

    #[test]
    fn test_running_as_and_property() {
        let database = GenericDatabase::new("postgresql").with_username("deploy");
        let executor = MemoryExecutor::new();
        let log = change_log();
        let ctx = CheckContext::new(&database, &executor, &log);

        let running_as = |user: &str| Precondition::RunningAs {
            username: user.into(),
        };
        assert!(running_as("DEPLOY").evaluate(&ctx).is_passed());
        assert_eq!(
            running_as("admin").evaluate(&ctx).failed[0].message,
            "RunningAs Precondition failed: expected admin, was deploy"
        );

        let defined = |value: Option<&str>| Precondition::ChangeLogPropertyDefined {
            property: "env".into(),
            value: value.map(str::to_string),
        };
        assert!(defined(None).evaluate(&ctx).is_passed());
        assert!(defined(Some("prod")).evaluate(&ctx).is_passed());
        assert!(!defined(Some("dev")).evaluate(&ctx).is_passed());
    }

    #[test]
    fn test_running_as_unknown_user_errors() {
        let database = GenericDatabase::new("postgresql");
        let executor = MemoryExecutor::new();
        let log = change_log();
        let ctx = CheckContext::new(&database, &executor, &log);

        let evaluation = Precondition::RunningAs {
            username: "deploy".into(),
        }
        .evaluate(&ctx);
        assert_eq!(evaluation.errors.len(), 1);
    }

    #[test]
    fn test_load_and_serialize() {
        let doc = json!({
            "or": [
                { "tableExists": { "schemaName": "app", "tableName": "person" } },
                { "sqlCheck": { "expectedResult": "0", "sql": "select count(*) from person" } }
            ]
        });
        let root = ParsedNode::from_json("root", &doc);
        let loaded = Precondition::load(&root.children()[0]).unwrap();

        match &loaded {
            Precondition::Or(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(
                    children[0],
                    Precondition::TableExists {
                        schema: Some(Schema::named("app")),
                        table_name: "person".into(),
                    }
                );
            }
            other => panic!("unexpected precondition {:?}", other),
        }

        assert_eq!(
            loaded.to_parsed_node().to_json(),
            json!({
                "tableExists": { "schemaName": "app", "tableName": "person" },
                "sqlCheck": { "expectedResult": "0", "sql": "select count(*) from person" }
            })
        );
    }

    #[test]
    fn test_load_unknown_precondition() {
        let node = ParsedNode::new(None, "rowCount");
        let err = Precondition::load(&node).unwrap_err();
        assert_eq!(err, LoadError::UnknownPrecondition("rowCount".into()));
    }
}
