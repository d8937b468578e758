//! Operation semantics binding a request's cursor to the engine.
//!
//! The facade owns the per-operation policy the wire protocol promises:
//! autocomplete merges parameter entries with symbol completions, goto maps
//! an unresolvable symbol to an empty answer while usages fails on it, and
//! funcargs honours the daemon's parameter-completion mode.

use thiserror::Error;

use pythia_engine::{
    AnalysisEngine, CompletionCandidate, CursorContext, EngineError, ResolvedLocation,
};
use pythia_protocol::{Action, ActionOutcome, ActionRequest, CompletionItem, SourceLocation};

use crate::config::ParamsMode;
use crate::params;

/// Failures raised while building or executing an operation.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// A position field failed coercion or bounds validation.
    #[error("invalid {field} value: {value}")]
    InvalidPosition {
        /// Request field holding the offending value.
        field: &'static str,
        /// The rejected value, rendered as JSON.
        value: String,
    },
    /// The engine failed while executing an operation.
    #[error("analysis failed for '{action}': {source}")]
    Analysis {
        /// Operation that was executing.
        action: Action,
        /// Underlying engine failure.
        #[source]
        source: EngineError,
    },
}

/// Binds a validated request's cursor context to the engine and executes
/// operations against it.
#[derive(Debug)]
pub struct AnalysisFacade<'engine, E> {
    engine: &'engine E,
    context: CursorContext,
    params_mode: ParamsMode,
}

impl<'engine, E: AnalysisEngine> AnalysisFacade<'engine, E> {
    /// Builds a facade, coercing the request's raw position values.
    ///
    /// `line` accepts integers, floats (truncated toward zero), and trimmed
    /// integer strings, and must be at least 1; `offset` accepts the same
    /// spellings and must be at least 0.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidPosition`] when either value fails
    /// coercion or bounds validation.
    pub fn new(
        engine: &'engine E,
        request: &ActionRequest,
        params_mode: ParamsMode,
    ) -> Result<Self, FacadeError> {
        let line = engine_position("line", request.line(), 1)?;
        let column = engine_position("offset", request.offset(), 0)?;
        let context = CursorContext::new(
            request.source(),
            line,
            column,
            request.filename(),
            request.encoding(),
        );

        Ok(Self {
            engine,
            context,
            params_mode,
        })
    }

    /// Executes the operation for `action` and shapes its wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Analysis`] when the engine fails; for `goto`
    /// an engine not-found outcome is success with an empty payload instead.
    pub fn execute(&self, action: Action) -> Result<ActionOutcome, FacadeError> {
        match action {
            Action::Autocomplete => self.autocomplete().map(ActionOutcome::Completions),
            Action::Goto => self.goto().map(ActionOutcome::Definitions),
            Action::Usages => self.usages().map(ActionOutcome::References),
            Action::Funcargs => self.funcargs().map(ActionOutcome::Snippet),
        }
    }

    /// Parameter entries for the active call, then symbol completions.
    fn autocomplete(&self) -> Result<Vec<CompletionItem>, FacadeError> {
        let signature = self
            .engine
            .call_signature(&self.context)
            .map_err(|source| analysis_failure(Action::Autocomplete, source))?;
        let mut items = signature
            .map(|active| params::parameter_completions(&params::extract_parameters(&active)))
            .unwrap_or_default();

        let candidates = self
            .engine
            .completions(&self.context)
            .map_err(|source| analysis_failure(Action::Autocomplete, source))?;
        items.extend(candidates.iter().map(format_completion));

        Ok(items)
    }

    /// Definition locations; an unresolvable symbol is an empty answer.
    fn goto(&self) -> Result<Option<Vec<SourceLocation>>, FacadeError> {
        match self.engine.definitions(&self.context) {
            Ok(locations) => Ok(Some(filter_locations(locations))),
            Err(EngineError::NotFound) => Ok(None),
            Err(source) => Err(analysis_failure(Action::Goto, source)),
        }
    }

    /// Reference locations; an unresolvable symbol fails the request.
    fn usages(&self) -> Result<Vec<SourceLocation>, FacadeError> {
        self.engine
            .references(&self.context)
            .map(filter_locations)
            .map_err(|source| analysis_failure(Action::Usages, source))
    }

    /// Call snippet for the active signature, honouring the daemon mode.
    fn funcargs(&self) -> Result<String, FacadeError> {
        if self.params_mode == ParamsMode::Disabled {
            return Ok(String::new());
        }

        let signature = self
            .engine
            .call_signature(&self.context)
            .map_err(|source| analysis_failure(Action::Funcargs, source))?;
        let snippet = signature
            .map(|active| params::call_snippet(&params::extract_parameters(&active), self.params_mode))
            .unwrap_or_default();

        Ok(snippet)
    }
}

const fn analysis_failure(action: Action, source: EngineError) -> FacadeError {
    FacadeError::Analysis { action, source }
}

/// Shapes an engine candidate as `(name<TAB>kind, name)`.
fn format_completion(candidate: &CompletionCandidate) -> CompletionItem {
    CompletionItem::new(
        format!("{}\t{}", candidate.name(), candidate.kind()),
        candidate.name(),
    )
}

/// Drops builtin-module locations and shapes the rest for the wire.
fn filter_locations(locations: Vec<ResolvedLocation>) -> Vec<SourceLocation> {
    locations
        .into_iter()
        .filter(|location| !location.is_builtin())
        .map(|location| {
            let line = location.line();
            let column = location.column();
            SourceLocation::new(location.into_module_path(), line, column)
        })
        .collect()
}

fn coerce_position(field: &'static str, value: &serde_json::Value) -> Result<i64, FacadeError> {
    let coerced = match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        serde_json::Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| invalid_position(field, value))
}

fn engine_position(
    field: &'static str,
    value: &serde_json::Value,
    minimum: i64,
) -> Result<u32, FacadeError> {
    let coerced = coerce_position(field, value)?;
    if coerced < minimum {
        return Err(invalid_position(field, value));
    }
    u32::try_from(coerced).map_err(|_| invalid_position(field, value))
}

fn invalid_position(field: &'static str, value: &serde_json::Value) -> FacadeError {
    FacadeError::InvalidPosition {
        field,
        value: value.to_string(),
    }
}
