//! The `preConditions` block of a changelog or change set.

use super::options::{ErrorOption, FailOption, OnSqlOutputOption, PolicyOption};
use super::outcome::{
    FailedPrecondition, PreconditionCheckError, PreconditionErrored, PreconditionFailed,
};
use super::{evaluate_all, CheckContext, Precondition};
use crate::changelog::{ParsedNode, STANDARD_CHANGELOG_NAMESPACE};
use crate::error::LoadError;
use std::fmt;
use tracing::{debug, info, warn};

/// Attributes a container reads from its own node rather than as children.
const CONTAINER_ATTRIBUTES: [&str; 5] = [
    "onFail",
    "onFailMessage",
    "onError",
    "onErrorMessage",
    "onSqlOutput",
];

/// A set of preconditions combined with AND, plus the policy applied when
/// they fail or error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreconditionContainer {
    on_fail: FailOption,
    on_error: ErrorOption,
    on_sql_output: OnSqlOutputOption,
    on_fail_message: Option<String>,
    on_error_message: Option<String>,
    nested: Vec<Precondition>,
}

impl PreconditionContainer {
    /// Create an empty container with default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy applied when a nested precondition evaluates to false.
    pub fn with_on_fail(mut self, on_fail: FailOption) -> Self {
        self.on_fail = on_fail;
        self
    }

    /// Set the policy applied when a nested precondition cannot be evaluated.
    pub fn with_on_error(mut self, on_error: ErrorOption) -> Self {
        self.on_error = on_error;
        self
    }

    /// Set the behavior when changes are rendered as SQL instead of executed.
    pub fn with_on_sql_output(mut self, on_sql_output: OnSqlOutputOption) -> Self {
        self.on_sql_output = on_sql_output;
        self
    }

    /// Replace the generated failure summary.
    pub fn with_on_fail_message(mut self, message: impl Into<String>) -> Self {
        self.on_fail_message = Some(message.into());
        self
    }

    /// Replace the generated error summary.
    pub fn with_on_error_message(mut self, message: impl Into<String>) -> Self {
        self.on_error_message = Some(message.into());
        self
    }

    /// Append a nested precondition.
    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.nested.push(precondition);
        self
    }

    /// Policy for false conditions.
    pub fn on_fail(&self) -> FailOption {
        self.on_fail
    }

    /// Policy for conditions that could not be evaluated.
    pub fn on_error(&self) -> ErrorOption {
        self.on_error
    }

    /// Behavior in SQL output mode.
    pub fn on_sql_output(&self) -> OnSqlOutputOption {
        self.on_sql_output
    }

    /// Message replacing the generated failure summary, if set.
    pub fn on_fail_message(&self) -> Option<&str> {
        self.on_fail_message.as_deref()
    }

    /// Message replacing the generated error summary, if set.
    pub fn on_error_message(&self) -> Option<&str> {
        self.on_error_message.as_deref()
    }

    /// Nested preconditions in declaration order.
    pub fn nested(&self) -> &[Precondition] {
        &self.nested
    }

    /// Name the container serializes under.
    pub fn serialized_object_name(&self) -> &'static str {
        "preConditions"
    }

    /// Load from a changelog node.
    ///
    /// Option values are matched ignoring case; unknown values fail the load.
    pub fn load(node: &ParsedNode) -> Result<Self, LoadError> {
        let on_fail: Option<String> = node.child_value(None, "onFail")?;
        let on_error: Option<String> = node.child_value(None, "onError")?;
        let on_sql_output: Option<String> = node.child_value(None, "onSqlOutput")?;

        let nested = node
            .children()
            .iter()
            .filter(|child| !CONTAINER_ATTRIBUTES.contains(&child.name()))
            .map(Precondition::load)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            on_fail: FailOption::parse_optional(on_fail.as_deref())?,
            on_error: ErrorOption::parse_optional(on_error.as_deref())?,
            on_sql_output: OnSqlOutputOption::parse_optional(on_sql_output.as_deref())?,
            on_fail_message: node.child_value(None, "onFailMessage")?,
            on_error_message: node.child_value(None, "onErrorMessage")?,
            nested,
        })
    }

    /// Serialize back into a changelog node. Default options are omitted.
    pub fn to_parsed_node(&self) -> ParsedNode {
        let mut node = ParsedNode::new(
            Some(STANDARD_CHANGELOG_NAMESPACE),
            self.serialized_object_name(),
        );
        if self.on_fail != FailOption::default() {
            node = node.with_child_value("onFail", self.on_fail.key());
        }
        if let Some(message) = &self.on_fail_message {
            node = node.with_child_value("onFailMessage", message.as_str());
        }
        if self.on_error != ErrorOption::default() {
            node = node.with_child_value("onError", self.on_error.key());
        }
        if let Some(message) = &self.on_error_message {
            node = node.with_child_value("onErrorMessage", message.as_str());
        }
        if self.on_sql_output != OnSqlOutputOption::default() {
            node = node.with_child_value("onSqlOutput", self.on_sql_output.key());
        }
        self.nested
            .iter()
            .fold(node, |node, nested| node.with_child(nested.to_parsed_node()))
    }

    /// Check the nested preconditions and apply this container's policy.
    ///
    /// `Ok` means execution proceeds, either because everything passed or
    /// because a WARN policy absorbed the outcome. Any other outcome is
    /// returned carrying the declared policy for the caller to act on.
    pub fn check(&self, ctx: &CheckContext<'_>) -> Result<(), PreconditionCheckError> {
        let ran_on = ctx.ran_on();

        if !ctx.executor.updates_database() {
            match self.on_sql_output {
                OnSqlOutputOption::Test => {}
                OnSqlOutputOption::Fail => {
                    let message = format!(
                        "Unexpected precondition in updateSQL mode with onUpdateSQL value: {}",
                        self.on_sql_output
                    );
                    let failed = FailedPrecondition::new(
                        message.clone(),
                        self.to_string(),
                        ctx.change_log.to_string(),
                    );
                    return Err(PreconditionFailed::new(message, vec![failed])
                        .with_policy(self.on_fail)
                        .into());
                }
                OnSqlOutputOption::Ignore => {
                    debug!(ran_on = %ran_on, "skipping preconditions in SQL output mode");
                    return Ok(());
                }
            }
        }

        match evaluate_all(&self.nested, ctx).into_result() {
            Ok(()) => Ok(()),
            Err(PreconditionCheckError::Failed(failed)) => self.handle_failed(ctx, &ran_on, failed),
            Err(PreconditionCheckError::Errored(errored)) if errored.failed.is_empty() => {
                self.handle_errored(ctx, &ran_on, errored)
            }
            Err(PreconditionCheckError::Errored(errored)) => {
                let failed = PreconditionFailed::new(
                    PreconditionFailed::DEFAULT_MESSAGE,
                    errored.failed.clone(),
                );
                let on_failures = self.handle_failed(ctx, &ran_on, failed);
                let on_errors = self.handle_errored(ctx, &ran_on, errored);
                self.stricter(on_failures, on_errors)
            }
        }
    }

    /// Combine the outcomes of a tree that both failed and errored.
    ///
    /// Neither policy may cancel the other: a WARN on one side leaves the
    /// other side's outcome standing, and a failure under onFail=HALT wins
    /// over an error that would only skip or mark the change set.
    fn stricter(
        &self,
        on_failures: Result<(), PreconditionCheckError>,
        on_errors: Result<(), PreconditionCheckError>,
    ) -> Result<(), PreconditionCheckError> {
        match (on_failures, on_errors) {
            (Ok(()), outcome) | (outcome, Ok(())) => outcome,
            (Err(failed), Err(errored)) => {
                if self.on_fail == FailOption::Halt && self.on_error != ErrorOption::Halt {
                    Err(failed)
                } else {
                    Err(errored)
                }
            }
        }
    }

    fn handle_failed(
        &self,
        ctx: &CheckContext<'_>,
        ran_on: &str,
        failed: PreconditionFailed,
    ) -> Result<(), PreconditionCheckError> {
        let message = self
            .on_fail_message
            .clone()
            .unwrap_or_else(|| summary(failed.failed.iter()));

        if self.on_fail == FailOption::Warn {
            let warning = format!(
                "Executing {} despite precondition failure due to onFail='WARN':\n {}",
                ran_on, message
            );
            ctx.ui.send_message(&format!("WARNING: {}", warning));
            warn!(ran_on = %ran_on, failed = failed.failed.len(), "{}", warning);
            if let Some(listener) = ctx.listener {
                listener.precondition_failed(&failed, FailOption::Warn);
            }
            return Ok(());
        }

        match &self.on_fail_message {
            None => Err(failed.with_policy(self.on_fail).into()),
            Some(override_message) => {
                let replacement = FailedPrecondition::new(
                    override_message.clone(),
                    self.to_string(),
                    ctx.change_log.to_string(),
                );
                Err(PreconditionFailed::new(override_message.clone(), vec![replacement])
                    .with_policy(self.on_fail)
                    .into())
            }
        }
    }

    fn handle_errored(
        &self,
        ctx: &CheckContext<'_>,
        ran_on: &str,
        errored: PreconditionErrored,
    ) -> Result<(), PreconditionCheckError> {
        let message = self
            .on_error_message
            .clone()
            .unwrap_or_else(|| summary(errored.errors.iter()));

        match self.on_error {
            ErrorOption::Continue => {
                info!(
                    ran_on = %ran_on,
                    "Continuing past: {} despite precondition error:\n {}", self, message
                );
                Err(errored.with_policy(self.on_error).into())
            }
            ErrorOption::Warn => {
                warn!(
                    ran_on = %ran_on,
                    errors = errored.errors.len(),
                    "Continuing past: {} despite precondition error:\n {}", self, message
                );
                if let Some(listener) = ctx.listener {
                    listener.precondition_errored(&errored, ErrorOption::Warn);
                }
                Ok(())
            }
            ErrorOption::Halt | ErrorOption::MarkRan => match &self.on_error_message {
                None => Err(errored.with_policy(self.on_error).into()),
                Some(override_message) => {
                    Err(PreconditionErrored::new(override_message.clone(), errored.errors)
                        .with_policy(self.on_error)
                        .into())
                }
            },
        }
    }
}

impl fmt::Display for PreconditionContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "preConditions(onFail={}, onError={}, onSqlOutput={}, nested={})",
            self.on_fail,
            self.on_error,
            self.on_sql_output,
            self.nested.len()
        )
    }
}

fn summary<T: fmt::Display>(entries: impl ExactSizeIterator<Item = T>) -> String {
    let mut message = format!("     {} preconditions failed\n", entries.len());
    for entry in entries {
        message.push_str(&format!("     {}\n", entry));
    }
    message
}
