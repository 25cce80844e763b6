//! Target database descriptions.

use std::fmt;

/// A target (or reference) database backend.
///
/// Only the facts generators and preconditions dispatch on are exposed here;
/// connections and SQL rendering belong to the executor layer.
pub trait Database: fmt::Debug + Send + Sync {
    /// Short backend name (`postgresql`, `mysql`, `h2`, ...).
    fn short_name(&self) -> &str;

    /// User the connection is authenticated as, if known.
    fn connection_username(&self) -> Option<&str> {
        None
    }

    /// Whether the backend has catalogs distinct from schemas.
    fn supports_catalogs(&self) -> bool {
        false
    }

    /// Default schema for unqualified names.
    fn default_schema_name(&self) -> Option<&str> {
        None
    }
}

/// Plain value implementation of [`Database`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericDatabase {
    short_name: String,
    username: Option<String>,
    supports_catalogs: bool,
    default_schema: Option<String>,
}

impl GenericDatabase {
    /// Create a backend description with the given short name.
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            username: None,
            supports_catalogs: false,
            default_schema: None,
        }
    }

    /// Set the connection user.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Declare catalog support.
    pub fn with_catalogs(mut self) -> Self {
        self.supports_catalogs = true;
        self
    }

    /// Set the default schema.
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }
}

impl Database for GenericDatabase {
    fn short_name(&self) -> &str {
        &self.short_name
    }

    fn connection_username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn supports_catalogs(&self) -> bool {
        self.supports_catalogs
    }

    fn default_schema_name(&self) -> Option<&str> {
        self.default_schema.as_deref()
    }
}
