//! Evaluation results and the outcomes raised by a container check.

use super::options::{ErrorOption, FailOption};
use crate::error::ExecutorError;
use std::fmt;
use thiserror::Error;

/// A precondition that evaluated to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPrecondition {
    /// Why it failed.
    pub message: String,
    /// Description of the precondition.
    pub precondition: String,
    /// Changelog the precondition belongs to.
    pub change_log: String,
}

impl FailedPrecondition {
    /// Record a false condition.
    pub fn new(
        message: impl Into<String>,
        precondition: impl Into<String>,
        change_log: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            precondition: precondition.into(),
            change_log: change_log.into(),
        }
    }
}

impl fmt::Display for FailedPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.change_log, self.message)
    }
}

/// A precondition whose check could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPrecondition {
    /// Underlying failure.
    pub cause: ExecutorError,
    /// Description of the precondition.
    pub precondition: String,
    /// Changelog the precondition belongs to.
    pub change_log: String,
}

impl ErrorPrecondition {
    /// Record a check that could not complete.
    pub fn new(
        cause: ExecutorError,
        precondition: impl Into<String>,
        change_log: impl Into<String>,
    ) -> Self {
        Self {
            cause,
            precondition: precondition.into(),
            change_log: change_log.into(),
        }
    }
}

impl fmt::Display for ErrorPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} : {}",
            self.change_log, self.precondition, self.cause
        )
    }
}

/// Result of evaluating a precondition tree: nothing is raised, both lists
/// are simply collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Preconditions that evaluated to false.
    pub failed: Vec<FailedPrecondition>,
    /// Preconditions that could not be evaluated.
    pub errors: Vec<ErrorPrecondition>,
}

impl Evaluation {
    /// A passing evaluation.
    pub fn passed() -> Self {
        Self::default()
    }

    /// A single failure.
    pub fn failed(failed: FailedPrecondition) -> Self {
        Self {
            failed: vec![failed],
            errors: Vec::new(),
        }
    }

    /// A single error.
    pub fn errored(error: ErrorPrecondition) -> Self {
        Self {
            failed: Vec::new(),
            errors: vec![error],
        }
    }

    /// Whether nothing failed or errored.
    pub fn is_passed(&self) -> bool {
        self.failed.is_empty() && self.errors.is_empty()
    }

    /// Fold another evaluation into this one.
    pub fn merge(&mut self, other: Evaluation) {
        self.failed.extend(other.failed);
        self.errors.extend(other.errors);
    }

    /// Convert into the outcome a check raises.
    ///
    /// A tree with both failures and errors raises [`PreconditionErrored`]
    /// carrying the failures, so the checking container can apply both its
    /// policies.
    pub fn into_result(self) -> Result<(), PreconditionCheckError> {
        if !self.errors.is_empty() {
            return Err(PreconditionErrored {
                message: PreconditionErrored::DEFAULT_MESSAGE.to_string(),
                errors: self.errors,
                failed: self.failed,
                on_error: None,
            }
            .into());
        }
        if !self.failed.is_empty() {
            return Err(PreconditionFailed::new(
                PreconditionFailed::DEFAULT_MESSAGE,
                self.failed,
            )
            .into());
        }
        Ok(())
    }
}

/// Raised when preconditions evaluated to false.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PreconditionFailed {
    /// Summary message.
    pub message: String,
    /// Every failed precondition.
    pub failed: Vec<FailedPrecondition>,
    /// Policy declared by the container that raised this, if any.
    pub on_fail: Option<FailOption>,
}

impl PreconditionFailed {
    pub const DEFAULT_MESSAGE: &'static str = "Preconditions Failed";

    pub fn new(message: impl Into<String>, failed: Vec<FailedPrecondition>) -> Self {
        Self {
            message: message.into(),
            failed,
            on_fail: None,
        }
    }

    /// Attach the declaring container's policy.
    pub fn with_policy(mut self, on_fail: FailOption) -> Self {
        self.on_fail = Some(on_fail);
        self
    }
}

/// Raised when preconditions could not be evaluated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PreconditionErrored {
    /// Summary message.
    pub message: String,
    /// Every errored precondition, each with its cause.
    pub errors: Vec<ErrorPrecondition>,
    /// Preconditions that failed alongside the errors.
    pub failed: Vec<FailedPrecondition>,
    /// Policy declared by the container that raised this, if any.
    pub on_error: Option<ErrorOption>,
}

impl PreconditionErrored {
    pub const DEFAULT_MESSAGE: &'static str = "Precondition Error";

    pub fn new(message: impl Into<String>, errors: Vec<ErrorPrecondition>) -> Self {
        Self {
            message: message.into(),
            errors,
            failed: Vec::new(),
            on_error: None,
        }
    }

    /// Attach the declaring container's policy.
    pub fn with_policy(mut self, on_error: ErrorOption) -> Self {
        self.on_error = Some(on_error);
        self
    }
}

/// Outcome of a precondition check that did not pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreconditionCheckError {
    /// A condition was false.
    #[error(transparent)]
    Failed(#[from] PreconditionFailed),

    /// A condition could not be evaluated.
    #[error(transparent)]
    Errored(#[from] PreconditionErrored),
}

impl PreconditionCheckError {
    /// The failure, if this is one.
    pub fn as_failed(&self) -> Option<&PreconditionFailed> {
        match self {
            PreconditionCheckError::Failed(failed) => Some(failed),
            PreconditionCheckError::Errored(_) => None,
        }
    }

    /// The error, if this is one.
    pub fn as_errored(&self) -> Option<&PreconditionErrored> {
        match self {
            PreconditionCheckError::Failed(_) => None,
            PreconditionCheckError::Errored(errored) => Some(errored),
        }
    }
}
