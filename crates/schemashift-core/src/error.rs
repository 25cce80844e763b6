//! Core error types.

use crate::changelog::MigrationFailed;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Core schemashift errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A change generator broke its contract (wrong object kind, bad output).
    #[error("change generator {generator} violated its contract: {message}")]
    ContractViolation {
        /// Name of the offending generator.
        generator: String,
        /// What went wrong.
        message: String,
    },

    /// A generator was handed an object it cannot downcast.
    #[error("expected a {expected} object, got {actual}")]
    UnsupportedObject {
        /// The object type the generator expected.
        expected: String,
        /// The object type it received.
        actual: String,
    },

    /// The run-before/run-after declarations form a cycle.
    #[error("cyclic object type ordering between: {}", .0.join(", "))]
    CyclicTypeOrder(Vec<String>),

    /// Changelog or precondition loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Executor error.
    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),

    /// Preconditions with a HALT policy stopped the run.
    #[error(transparent)]
    Migration(#[from] MigrationFailed),
}

/// Errors raised while loading a changelog tree.
///
/// These are not recoverable: loading of the affected changelog must stop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// An enum-like attribute held an unknown literal.
    #[error("Unknown {attribute} attribute value '{value}'.  Possible values: {}", .possible.join(", "))]
    UnknownOption {
        /// Attribute name (`onFail`, `onError`, `onSqlOutput`).
        attribute: String,
        /// Offending value as written.
        value: String,
        /// Valid literals, in declaration order.
        possible: Vec<String>,
    },

    /// A node named a precondition kind that does not exist.
    #[error("unknown precondition '{0}'")]
    UnknownPrecondition(String),

    /// A value could not be converted to the requested type.
    #[error("invalid value for '{name}': {message}")]
    InvalidValue {
        /// Child node name.
        name: String,
        /// Conversion failure.
        message: String,
    },

    /// A required value was absent.
    #[error("missing required value '{0}'")]
    MissingValue(String),
}

/// Errors reported by an executor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    /// A query could not be run.
    #[error("query failed: {message} [sql: {sql}]")]
    Query {
        /// Statement text.
        sql: String,
        /// Backend message.
        message: String,
    },

    /// The executor does not support the request.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Connection-level failure.
    #[error("connection error: {0}")]
    Connection(String),
}
