//! Closed set of analysis actions accepted on the wire.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Analysis operations a request may name in its `type` field.
///
/// The set is closed: anything else is rejected at the request boundary with
/// an [`UnknownActionError`] before any analysis state is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Symbol and parameter completion at the cursor.
    Autocomplete,
    /// Definition lookup for the symbol at the cursor.
    Goto,
    /// Reference lookup for the symbol at the cursor.
    Usages,
    /// Call-completion snippet for the callable at the cursor.
    Funcargs,
}

impl Action {
    /// Returns the wire spelling of the action.
    ///
    /// The same string keys the result payload in the response envelope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Autocomplete => "autocomplete",
            Self::Goto => "goto",
            Self::Usages => "usages",
            Self::Funcargs => "funcargs",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error raised when a request names an action outside the closed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown action: {0}")]
pub struct UnknownActionError(String);

impl UnknownActionError {
    /// Creates an error recording the unrecognised action name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the action name that failed to resolve.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Action {
    type Err = UnknownActionError;

    /// Resolves the wire spelling of an action.
    ///
    /// Matching is exact: action names are lower-case on the wire and
    /// surrounding whitespace is not tolerated.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "autocomplete" => Ok(Self::Autocomplete),
            "goto" => Ok(Self::Goto),
            "usages" => Ok(Self::Usages),
            "funcargs" => Ok(Self::Funcargs),
            other => Err(UnknownActionError::new(other)),
        }
    }
}
