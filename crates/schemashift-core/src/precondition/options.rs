//! Policy options of a precondition container.
//!
//! The literal keys (`HALT`, `MARK_RAN`, ...) are the changelog vocabulary:
//! they are what gets parsed, displayed, and serialized.

use crate::error::LoadError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A closed set of literal-keyed policy values.
pub trait PolicyOption: Sized + Copy + Default + 'static {
    /// Changelog attribute this option is read from.
    const ATTRIBUTE: &'static str;

    /// Every value, in declaration order.
    const ALL: &'static [Self];

    /// Literal key of this value.
    fn key(self) -> &'static str;

    /// Parse a literal key, ignoring case.
    fn parse(value: &str) -> Result<Self, LoadError> {
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.key().eq_ignore_ascii_case(value))
            .ok_or_else(|| LoadError::UnknownOption {
                attribute: Self::ATTRIBUTE.to_string(),
                value: value.to_string(),
                possible: Self::ALL.iter().map(|o| o.key().to_string()).collect(),
            })
    }

    /// Parse an optional attribute; absence selects the default.
    fn parse_optional(value: Option<&str>) -> Result<Self, LoadError> {
        value.map_or_else(|| Ok(Self::default()), Self::parse)
    }
}

/// What to do when a precondition evaluates to false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailOption {
    /// Abort the whole run.
    #[default]
    Halt,
    /// Skip this change set and carry on with the next.
    Continue,
    /// Record the change set as applied without running it.
    MarkRan,
    /// Log a warning and run the change set anyway.
    Warn,
}

impl PolicyOption for FailOption {
    const ATTRIBUTE: &'static str = "onFail";
    const ALL: &'static [Self] = &[
        FailOption::Halt,
        FailOption::Continue,
        FailOption::MarkRan,
        FailOption::Warn,
    ];

    fn key(self) -> &'static str {
        match self {
            FailOption::Halt => "HALT",
            FailOption::Continue => "CONTINUE",
            FailOption::MarkRan => "MARK_RAN",
            FailOption::Warn => "WARN",
        }
    }
}

/// What to do when a precondition could not be evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorOption {
    /// Abort the whole run.
    #[default]
    Halt,
    /// Skip this change set and carry on with the next.
    Continue,
    /// Record the change set as applied without running it.
    MarkRan,
    /// Log a warning and run the change set anyway.
    Warn,
}

impl PolicyOption for ErrorOption {
    const ATTRIBUTE: &'static str = "onError";
    const ALL: &'static [Self] = &[
        ErrorOption::Halt,
        ErrorOption::Continue,
        ErrorOption::MarkRan,
        ErrorOption::Warn,
    ];

    fn key(self) -> &'static str {
        match self {
            ErrorOption::Halt => "HALT",
            ErrorOption::Continue => "CONTINUE",
            ErrorOption::MarkRan => "MARK_RAN",
            ErrorOption::Warn => "WARN",
        }
    }
}

/// How preconditions behave when the executor only renders SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnSqlOutputOption {
    /// Act as if there were no preconditions.
    #[default]
    Ignore,
    /// Evaluate them as in apply mode.
    Test,
    /// Fail without evaluating anything.
    Fail,
}

impl PolicyOption for OnSqlOutputOption {
    const ATTRIBUTE: &'static str = "onSqlOutput";
    const ALL: &'static [Self] = &[
        OnSqlOutputOption::Ignore,
        OnSqlOutputOption::Test,
        OnSqlOutputOption::Fail,
    ];

    fn key(self) -> &'static str {
        match self {
            OnSqlOutputOption::Ignore => "IGNORE",
            OnSqlOutputOption::Test => "TEST",
            OnSqlOutputOption::Fail => "FAIL",
        }
    }
}

impl fmt::Display for FailOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for ErrorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for OnSqlOutputOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FailOption {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for ErrorOption {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for OnSqlOutputOption {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
