//! Engine seam for Python source analysis.
//!
//! The daemon talks to its analysis engine through [`AnalysisEngine`], a
//! synchronous query interface bound to a [`CursorContext`]. The production
//! implementation, [`PythonJediEngine`], drives the Jedi library in a
//! short-lived `python3` subprocess per query; tests substitute scripted
//! engines.
//!
//! Unresolvable symbols are reported through [`EngineError::NotFound`] rather
//! than empty results, so callers can apply a per-operation policy: the
//! daemon maps it to an empty `goto` answer but fails a `usages` request.

mod error;
mod python;
mod types;

pub use error::EngineError;
pub use python::PythonJediEngine;
pub use types::{CallSignature, CompletionCandidate, CursorContext, ResolvedLocation};

/// Synchronous query interface over a Python analysis engine.
///
/// Every query runs against the buffer and cursor position carried by the
/// [`CursorContext`]. Queries block until the engine answers; there is no
/// timeout at this seam.
pub trait AnalysisEngine {
    /// Lists completion candidates at the cursor.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be reached or
    /// reports a failure.
    fn completions(&self, context: &CursorContext) -> Result<Vec<CompletionCandidate>, EngineError>;

    /// Resolves definition locations for the symbol at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when no symbol resolves at the
    /// cursor, or another [`EngineError`] for operational failures.
    fn definitions(&self, context: &CursorContext) -> Result<Vec<ResolvedLocation>, EngineError>;

    /// Resolves reference locations for the symbol at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when no symbol resolves at the
    /// cursor, or another [`EngineError`] for operational failures.
    fn references(&self, context: &CursorContext) -> Result<Vec<ResolvedLocation>, EngineError>;

    /// Returns the callable signature active at the cursor, or `None` when
    /// the cursor is not inside a call expression.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be reached or
    /// reports a failure.
    fn call_signature(&self, context: &CursorContext) -> Result<Option<CallSignature>, EngineError>;
}
