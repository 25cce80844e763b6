//! Output control for generated changes.

/// Verbosity settings applied to every change generated in one diff run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutputControl {
    /// Emit catalog names on generated changes.
    pub include_catalog: bool,
    /// Emit schema names on generated changes.
    pub include_schema: bool,
    /// Emit tablespace names on generated changes.
    pub include_tablespace: bool,
}

impl Default for DiffOutputControl {
    fn default() -> Self {
        Self {
            include_catalog: true,
            include_schema: true,
            include_tablespace: true,
        }
    }
}

impl DiffOutputControl {
    /// Create a control with explicit catalog/schema/tablespace flags.
    pub fn new(include_catalog: bool, include_schema: bool, include_tablespace: bool) -> Self {
        Self {
            include_catalog,
            include_schema,
            include_tablespace,
        }
    }

    /// Set whether catalog names are emitted.
    pub fn with_include_catalog(mut self, include: bool) -> Self {
        self.include_catalog = include;
        self
    }

    /// Set whether schema names are emitted.
    pub fn with_include_schema(mut self, include: bool) -> Self {
        self.include_schema = include;
        self
    }

    /// Set whether tablespace names are emitted.
    pub fn with_include_tablespace(mut self, include: bool) -> Self {
        self.include_tablespace = include;
        self
    }
}
