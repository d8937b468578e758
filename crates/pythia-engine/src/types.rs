//! Cursor context and result types crossing the engine boundary.

use serde::Deserialize;

/// Buffer and cursor position a query runs against.
///
/// `line` is 1-based and `column` is 0-based, matching the daemon's wire
/// protocol. `filename` is empty for unsaved buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorContext {
    source: String,
    line: u32,
    column: u32,
    filename: String,
    encoding: String,
}

impl CursorContext {
    /// Creates a context for the given buffer and cursor position.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        line: u32,
        column: u32,
        filename: impl Into<String>,
        encoding: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            line,
            column,
            filename: filename.into(),
            encoding: encoding.into(),
        }
    }

    /// Returns the full buffer text.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source.as_str()
    }

    /// Returns the 1-based cursor line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 0-based cursor column.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
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

/// One completion candidate reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionCandidate {
    name: String,
    kind: String,
}

impl CompletionCandidate {
    /// Creates a candidate from its name and kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Returns the completion name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the candidate kind (module, function, class, ...).
    #[must_use]
    pub const fn kind(&self) -> &str {
        self.kind.as_str()
    }
}

/// One location reported by a definition or reference query.
///
/// `module_path` is absent for symbols without a backing file, such as names
/// defined in the unsaved buffer under analysis. `is_builtin` marks
/// locations inside the interpreter's builtin modules; the daemon filters
/// those out of its answers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedLocation {
    module_path: Option<String>,
    line: u32,
    column: u32,
    is_builtin: bool,
}

impl ResolvedLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(module_path: Option<String>, line: u32, column: u32, is_builtin: bool) -> Self {
        Self {
            module_path,
            line,
            column,
            is_builtin,
        }
    }

    /// Returns the path of the module holding the location.
    #[must_use]
    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    /// Consumes the location, returning its module path.
    #[must_use]
    pub fn into_module_path(self) -> Option<String> {
        self.module_path
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

    /// Returns whether the location sits inside a builtin module.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        self.is_builtin
    }
}

/// The callable signature active at the cursor.
///
/// Parameters are the engine's raw declaration strings in declaration order,
/// such as `"a"`, `"b=5"`, `"*args"`, or `"self"`; shaping them into names
/// and defaults is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallSignature {
    params: Vec<String>,
}

impl CallSignature {
    /// Creates a signature from raw parameter strings.
    #[must_use]
    pub const fn new(params: Vec<String>) -> Self {
        Self { params }
    }

    /// Returns the raw parameter strings in declaration order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }
}
