//! Response envelope and the wire-exact payload shapes inside it.
//!
//! Editors consume positional JSON forms: completion entries are
//! `[display, insert]` pairs and locations are `[module_path, line, column]`
//! triples. The envelope itself keys its payload under the action's own
//! name, so serialisation is hand-written where derives cannot express the
//! shape.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::action::Action;

/// A completion entry shaped for the editor.
///
/// Serialises as the two-element array `[display, insert]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    display: String,
    insert: String,
}

impl CompletionItem {
    /// Creates an entry from its display and insert texts.
    #[must_use]
    pub fn new(display: impl Into<String>, insert: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            insert: insert.into(),
        }
    }

    /// Returns the text shown in the completion list.
    #[must_use]
    pub const fn display(&self) -> &str {
        self.display.as_str()
    }

    /// Returns the text inserted when the entry is accepted.
    #[must_use]
    pub const fn insert(&self) -> &str {
        self.insert.as_str()
    }
}

impl Serialize for CompletionItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_seq(Some(2))?;
        pair.serialize_element(&self.display)?;
        pair.serialize_element(&self.insert)?;
        pair.end()
    }
}

/// A resolved source location.
///
/// Serialises as the three-element array `[module_path, line, column]`;
/// `module_path` is `null` for locations without a backing file, such as
/// definitions inside an unsaved buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    module_path: Option<String>,
    line: u32,
    column: u32,
}

impl SourceLocation {
    /// Creates a location from its module path and 1-based line, 0-based
    /// column position.
    #[must_use]
    pub const fn new(module_path: Option<String>, line: u32, column: u32) -> Self {
        Self {
            module_path,
            line,
            column,
        }
    }

    /// Returns the path of the module holding the location.
    #[must_use]
    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    /// Returns the 1-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 0-based column number.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl Serialize for SourceLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut triple = serializer.serialize_seq(Some(3))?;
        triple.serialize_element(&self.module_path)?;
        triple.serialize_element(&self.line)?;
        triple.serialize_element(&self.column)?;
        triple.end()
    }
}

/// Result payload for one executed action.
///
/// Serialises as the bare payload; the envelope keys it under the action
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Completion entries for `autocomplete`.
    Completions(Vec<CompletionItem>),
    /// Definition locations for `goto`; `None` when the engine reported the
    /// symbol as unresolvable, serialised as `null`.
    Definitions(Option<Vec<SourceLocation>>),
    /// Reference locations for `usages`.
    References(Vec<SourceLocation>),
    /// Call-completion snippet for `funcargs`.
    Snippet(String),
}

impl Serialize for ActionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Completions(items) => items.serialize(serializer),
            Self::Definitions(locations) => locations.serialize(serializer),
            Self::References(locations) => locations.serialize(serializer),
            Self::Snippet(text) => serializer.serialize_str(text),
        }
    }
}

/// One response line: the echoed correlation fields plus the payload keyed
/// under the action's name.
///
/// # Example
///
/// ```
/// use pythia_protocol::{Action, ActionOutcome, CompletionItem, ResponseEnvelope};
///
/// let envelope = ResponseEnvelope::new(
///     serde_json::json!("1"),
///     Action::Autocomplete,
///     ActionOutcome::Completions(vec![CompletionItem::new("path\tmodule", "path")]),
/// );
/// assert_eq!(
///     serde_json::to_string(&envelope).expect("envelope should serialise"),
///     r#"{"uuid":"1","type":"autocomplete","autocomplete":[["path\tmodule","path"]]}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    uuid: serde_json::Value,
    action: Action,
    outcome: ActionOutcome,
}

impl ResponseEnvelope {
    /// Creates an envelope echoing the request's correlation token and
    /// action.
    #[must_use]
    pub const fn new(uuid: serde_json::Value, action: Action, outcome: ActionOutcome) -> Self {
        Self {
            uuid,
            action,
            outcome,
        }
    }

    /// Returns the echoed correlation token.
    #[must_use]
    pub const fn uuid(&self) -> &serde_json::Value {
        &self.uuid
    }

    /// Returns the echoed action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Returns the result payload.
    #[must_use]
    pub const fn outcome(&self) -> &ActionOutcome {
        &self.outcome
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_map(Some(3))?;
        envelope.serialize_entry("uuid", &self.uuid)?;
        envelope.serialize_entry("type", self.action.as_str())?;
        envelope.serialize_entry(self.action.as_str(), &self.outcome)?;
        envelope.end()
    }
}
