//! Test doubles for the daemon loop: a recording engine and broken channels.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use pythia_engine::{
    AnalysisEngine, CallSignature, CompletionCandidate, CursorContext, EngineError,
    ResolvedLocation,
};

/// Engine double that records queries and serves canned results.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    state: Arc<Mutex<EngineState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `candidates` from completion queries.
    #[must_use]
    pub fn with_completions(self, candidates: Vec<CompletionCandidate>) -> Self {
        self.lock().completions = Ok(candidates);
        self
    }

    /// Serves `outcome` from definition queries.
    #[must_use]
    pub fn with_definitions(self, outcome: Result<Vec<ResolvedLocation>, EngineError>) -> Self {
        self.lock().definitions = outcome;
        self
    }

    /// Serves `outcome` from reference queries.
    #[must_use]
    pub fn with_references(self, outcome: Result<Vec<ResolvedLocation>, EngineError>) -> Self {
        self.lock().references = outcome;
        self
    }

    /// Serves `signature` from call-signature queries.
    #[must_use]
    pub fn with_call_signature(self, signature: Option<CallSignature>) -> Self {
        self.lock().call_signature = Ok(signature);
        self
    }

    /// Returns the query names received, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// Returns the cursor context of the most recent query.
    #[must_use]
    pub fn last_context(&self) -> Option<CursorContext> {
        self.lock().last_context.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().expect("engine state mutex poisoned")
    }

    fn record(&self, query: &'static str, context: &CursorContext) {
        let mut state = self.lock();
        state.calls.push(query);
        state.last_context = Some(context.clone());
    }
}

impl AnalysisEngine for MockEngine {
    fn completions(&self, context: &CursorContext) -> Result<Vec<CompletionCandidate>, EngineError> {
        self.record("completions", context);
        self.lock().completions.clone()
    }

    fn definitions(&self, context: &CursorContext) -> Result<Vec<ResolvedLocation>, EngineError> {
        self.record("definitions", context);
        self.lock().definitions.clone()
    }

    fn references(&self, context: &CursorContext) -> Result<Vec<ResolvedLocation>, EngineError> {
        self.record("references", context);
        self.lock().references.clone()
    }

    fn call_signature(&self, context: &CursorContext) -> Result<Option<CallSignature>, EngineError> {
        self.record("call_signature", context);
        self.lock().call_signature.clone()
    }
}

#[derive(Debug)]
struct EngineState {
    calls: Vec<&'static str>,
    last_context: Option<CursorContext>,
    completions: Result<Vec<CompletionCandidate>, EngineError>,
    definitions: Result<Vec<ResolvedLocation>, EngineError>,
    references: Result<Vec<ResolvedLocation>, EngineError>,
    call_signature: Result<Option<CallSignature>, EngineError>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            last_context: None,
            completions: Ok(Vec::new()),
            definitions: Ok(Vec::new()),
            references: Ok(Vec::new()),
            call_signature: Ok(None),
        }
    }
}

/// Writer whose reader has gone away: every write reports a broken pipe.
pub struct ClosedPipeWriter;

impl Write for ClosedPipeWriter {
    fn write(&mut self, _buffer: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that accepts writes but reports a broken pipe on flush.
#[derive(Default)]
pub struct FlushClosedWriter {
    written: Vec<u8>,
}

impl Write for FlushClosedWriter {
    fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buffer);
        Ok(buffer.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

/// Writer that fails with an error other than a broken pipe.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buffer: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader that fails on every read.
pub struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buffer: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("input channel torn down"))
    }
}
