//! Staged parsing of inbound request lines.
//!
//! A request line passes through four stages: JSON parsing, action-type
//! probing, closed-schema validation, and action resolution. Each stage maps
//! to one variant of [`RequestError`], so a malformed body is always reported
//! as malformed even when it also names an unknown action.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::action::{Action, UnknownActionError};

/// Closed schema for the seven request fields.
///
/// `deny_unknown_fields` enforces the schema boundary: a request carrying
/// anything beyond these fields is rejected before analysis state is built.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequest {
    #[serde(rename = "type")]
    action: String,
    uuid: serde_json::Value,
    source: String,
    line: serde_json::Value,
    offset: serde_json::Value,
    #[serde(default)]
    filename: String,
    #[serde(default = "default_encoding")]
    encoding: String,
}

fn default_encoding() -> String {
    String::from("utf-8")
}

/// A validated analysis request.
///
/// `line` and `offset` are kept as raw JSON values: the wire tolerates a few
/// lenient spellings (floats, numeric strings) and coercion into engine
/// positions is the caller's policy, applied when the cursor context is
/// built.
///
/// # Example
///
/// ```
/// use pythia_protocol::{Action, ActionRequest};
///
/// let request = ActionRequest::parse(
///     r#"{"type":"goto","uuid":"42","source":"import os","line":1,"offset":8}"#,
/// )
/// .expect("request should parse");
/// assert_eq!(request.action(), Action::Goto);
/// assert_eq!(request.source(), "import os");
/// assert_eq!(request.filename(), "");
/// assert_eq!(request.encoding(), "utf-8");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    action: Action,
    uuid: serde_json::Value,
    source: String,
    line: serde_json::Value,
    offset: serde_json::Value,
    filename: String,
    encoding: String,
}

impl ActionRequest {
    /// Parses and validates one request line.
    ///
    /// Surrounding whitespace, including the line terminator, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Malformed`] when the line is not a JSON
    /// object satisfying the request schema, [`RequestError::MissingActionType`]
    /// when the `type` field is absent, null, or blank, and
    /// [`RequestError::UnknownAction`] when the named action is not one the
    /// daemon provides.
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(RequestError::malformed("empty request line"));
        }

        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(RequestError::invalid_json)?;
        let Some(fields) = value.as_object() else {
            return Err(RequestError::malformed("request is not a JSON object"));
        };

        match fields.get("type") {
            None | Some(serde_json::Value::Null) => return Err(RequestError::MissingActionType),
            Some(serde_json::Value::String(name)) if name.trim().is_empty() => {
                return Err(RequestError::MissingActionType);
            }
            Some(serde_json::Value::String(_)) => {}
            Some(_) => {
                return Err(RequestError::malformed("request field `type` must be a string"));
            }
        }

        let raw: RawRequest = serde_json::from_value(value).map_err(RequestError::schema)?;
        let action = Action::from_str(&raw.action)?;

        Ok(Self {
            action,
            uuid: raw.uuid,
            source: raw.source,
            line: raw.line,
            offset: raw.offset,
            filename: raw.filename,
            encoding: raw.encoding,
        })
    }

    /// Returns the resolved action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Returns the opaque correlation token, echoed verbatim in responses.
    #[must_use]
    pub const fn uuid(&self) -> &serde_json::Value {
        &self.uuid
    }

    /// Returns the full buffer text under analysis.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source.as_str()
    }

    /// Returns the raw 1-based line value, prior to coercion.
    #[must_use]
    pub const fn line(&self) -> &serde_json::Value {
        &self.line
    }

    /// Returns the raw 0-based column value, prior to coercion.
    #[must_use]
    pub const fn offset(&self) -> &serde_json::Value {
        &self.offset
    }

    /// Returns the buffer's file path, empty for unsaved buffers.
    #[must_use]
    pub const fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Returns the buffer's text encoding.
    #[must_use]
    pub const fn encoding(&self) -> &str {
        self.encoding.as_str()
    }
}

/// Failures raised while parsing a request line.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The line was not a JSON object satisfying the request schema.
    #[error("malformed request: {message}")]
    Malformed {
        /// Description of the schema violation.
        message: String,
        /// Parser error underlying the violation, when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },
    /// The request's `type` field was absent, null, or blank.
    #[error("request is missing an action type")]
    MissingActionType,
    /// The request named an action outside the closed set.
    #[error(transparent)]
    UnknownAction(#[from] UnknownActionError),
}

impl RequestError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    fn invalid_json(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: format!("invalid JSON: {source}"),
            source: Some(source),
        }
    }

    fn schema(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: format!("invalid request: {source}"),
            source: Some(source),
        }
    }
}
