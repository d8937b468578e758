//! Production engine driving the Python Jedi library.
//!
//! [`PythonJediEngine`] runs one short-lived `python3` process per query. A
//! helper script embedded in the binary reads a single JSON query line from
//! stdin, performs the analysis, and writes a single JSON reply line to
//! stdout. Stderr is captured for diagnostic logging only. The helper probes
//! the installed Jedi at runtime so both the legacy positional API and the
//! modern keyword API work unchanged.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AnalysisEngine;
use crate::error::EngineError;
use crate::types::{CallSignature, CompletionCandidate, CursorContext, ResolvedLocation};

/// Tracing target for engine subprocess operations.
const ENGINE_TARGET: &str = "pythia_engine::python";

/// Interpreter used to run the helper script.
const PYTHON_BINARY: &str = "python3";

const PYTHON_ANALYSIS_SCRIPT: &str = concat!(
    "import json, sys, traceback\n",
    "\n",
    "def reply(payload):\n",
    "    sys.stdout.write(json.dumps(payload) + '\\n')\n",
    "    sys.stdout.flush()\n",
    "\n",
    "def fail(kind, message):\n",
    "    reply({'error': {'kind': kind, 'message': message}})\n",
    "    sys.exit(0)\n",
    "\n",
    "raw = sys.stdin.readline()\n",
    "try:\n",
    "    request = json.loads(raw)\n",
    "except ValueError as err:\n",
    "    fail('bad_request', 'invalid query: %s' % err)\n",
    "\n",
    "for entry in reversed(request.get('search_paths') or []):\n",
    "    if entry not in sys.path:\n",
    "        sys.path.insert(0, entry)\n",
    "\n",
    "try:\n",
    "    import jedi\n",
    "except ImportError as err:\n",
    "    fail('unavailable', 'jedi is not importable: %s' % err)\n",
    "\n",
    "cache_directory = request.get('cache_directory')\n",
    "if cache_directory:\n",
    "    jedi.settings.cache_directory = cache_directory\n",
    "\n",
    "try:\n",
    "    from jedi.api import NotFoundError\n",
    "except ImportError:\n",
    "    class NotFoundError(Exception):\n",
    "        pass\n",
    "\n",
    "source = request['source']\n",
    "line = request['line']\n",
    "column = request['column']\n",
    "filename = request.get('filename') or None\n",
    "encoding = request.get('encoding') or 'utf-8'\n",
    "\n",
    "try:\n",
    "    script = jedi.Script(code=source, path=filename)\n",
    "    legacy = False\n",
    "except TypeError:\n",
    "    script = jedi.Script(source, line, column, filename, encoding)\n",
    "    legacy = True\n",
    "\n",
    "def completions():\n",
    "    return script.completions() if legacy else script.complete(line, column)\n",
    "\n",
    "def definitions():\n",
    "    return script.goto_assignments() if legacy else script.goto(line, column)\n",
    "\n",
    "def references():\n",
    "    return script.usages() if legacy else script.get_references(line, column)\n",
    "\n",
    "def signatures():\n",
    "    return script.call_signatures() if legacy else script.get_signatures(line, column)\n",
    "\n",
    "def location(entry):\n",
    "    path = entry.module_path\n",
    "    return {\n",
    "        'module_path': None if path is None else str(path),\n",
    "        'line': int(entry.line or 0),\n",
    "        'column': int(entry.column or 0),\n",
    "        'is_builtin': bool(entry.in_builtin_module()),\n",
    "    }\n",
    "\n",
    "def param_text(param):\n",
    "    text = getattr(param, 'description', None)\n",
    "    if not isinstance(text, str) or not text:\n",
    "        text = param.get_code()\n",
    "    text = text.strip()\n",
    "    if text.startswith('param '):\n",
    "        text = text[6:]\n",
    "    return text.strip().rstrip(',')\n",
    "\n",
    "query = request.get('query')\n",
    "try:\n",
    "    if query == 'completions':\n",
    "        result = [{'name': c.name, 'kind': c.type} for c in completions()]\n",
    "    elif query == 'definitions':\n",
    "        result = [location(entry) for entry in definitions()]\n",
    "    elif query == 'references':\n",
    "        result = [location(entry) for entry in references()]\n",
    "    elif query == 'call_signature':\n",
    "        active = signatures()\n",
    "        if active:\n",
    "            result = {'params': [param_text(p) for p in active[0].params]}\n",
    "        else:\n",
    "            result = None\n",
    "    else:\n",
    "        fail('bad_request', 'unknown query: %r' % query)\n",
    "except NotFoundError:\n",
    "    fail('not_found', 'no symbol at the requested position')\n",
    "except Exception:\n",
    "    fail('analysis', traceback.format_exc())\n",
    "\n",
    "reply({'result': result})\n",
);

/// Engine queries understood by the helper script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Completions,
    Definitions,
    References,
    CallSignature,
}

impl QueryKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completions => "completions",
            Self::Definitions => "definitions",
            Self::References => "references",
            Self::CallSignature => "call_signature",
        }
    }
}

/// One query line written to the helper's stdin.
#[derive(Debug, Serialize)]
struct EngineQuery<'a> {
    query: &'static str,
    source: &'a str,
    line: u32,
    column: u32,
    filename: &'a str,
    encoding: &'a str,
    search_paths: &'a [String],
    cache_directory: Option<&'a str>,
}

/// One reply line read from the helper's stdout.
///
/// Exactly one of `error` and `result` is populated; a missing `result` is
/// indistinguishable from an explicit `null`, which only the call-signature
/// query produces.
#[derive(Debug, Deserialize)]
struct EngineReply {
    #[serde(default)]
    error: Option<EngineFault>,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EngineFault {
    kind: String,
    #[serde(default)]
    message: String,
}

/// Engine backed by the Jedi library in a per-query `python3` subprocess.
///
/// Search paths are prepended to the helper's module search path in the
/// order given, and the cache directory namespaces Jedi's on-disk analysis
/// cache.
#[derive(Debug, Clone)]
pub struct PythonJediEngine {
    python_binary: PathBuf,
    cache_directory: Option<String>,
    search_paths: Vec<String>,
}

impl PythonJediEngine {
    /// Creates an engine using the `python3` found on `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            python_binary: PathBuf::from(PYTHON_BINARY),
            cache_directory: None,
            search_paths: Vec::new(),
        }
    }

    /// Replaces the interpreter used to run the helper script.
    #[must_use]
    pub fn with_python_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.python_binary = binary.into();
        self
    }

    /// Sets the directory namespacing the engine's analysis cache.
    #[must_use]
    pub fn with_cache_directory(mut self, directory: &Path) -> Self {
        self.cache_directory = Some(directory.to_string_lossy().into_owned());
        self
    }

    /// Sets the extra module search paths, first entry first.
    #[must_use]
    pub fn with_search_paths<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.search_paths = paths
            .into_iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        self
    }

    fn build_query<'a>(&'a self, kind: QueryKind, context: &'a CursorContext) -> EngineQuery<'a> {
        EngineQuery {
            query: kind.as_str(),
            source: context.source(),
            line: context.line(),
            column: context.column(),
            filename: context.filename(),
            encoding: context.encoding(),
            search_paths: &self.search_paths,
            cache_directory: self.cache_directory.as_deref(),
        }
    }

    fn run_query<T: DeserializeOwned>(
        &self,
        kind: QueryKind,
        context: &CursorContext,
    ) -> Result<T, EngineError> {
        let reply_line = self.exchange(kind, context)?;
        decode_reply(&reply_line)
    }

    /// Spawns the helper, writes the query, reads the reply.
    fn exchange(&self, kind: QueryKind, context: &CursorContext) -> Result<String, EngineError> {
        let query = self.build_query(kind, context);

        debug!(
            target: ENGINE_TARGET,
            binary = %self.python_binary.display(),
            query = kind.as_str(),
            "spawning analysis process"
        );

        let mut child = Command::new(&self.python_binary)
            .arg("-c")
            .arg(PYTHON_ANALYSIS_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(EngineError::spawn)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::spawn(std::io::Error::other("stdin pipe was not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::spawn(std::io::Error::other("stdout pipe was not captured")))?;
        let stderr = child.stderr.take();

        write_query(stdin, &query)?;
        let reply_line = read_reply(stdout)?;
        let stderr_output = drain_stderr(stderr);

        let status = child.wait().map_err(EngineError::io)?;
        if !status.success() {
            return Err(EngineError::Exited {
                status: status.code().unwrap_or(-1),
                stderr: stderr_output.trim().to_owned(),
            });
        }
        if reply_line.trim().is_empty() {
            return Err(EngineError::invalid_output("engine produced no output"));
        }
        Ok(reply_line)
    }
}

impl Default for PythonJediEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisEngine for PythonJediEngine {
    fn completions(&self, context: &CursorContext) -> Result<Vec<CompletionCandidate>, EngineError> {
        self.run_query(QueryKind::Completions, context)
    }

    fn definitions(&self, context: &CursorContext) -> Result<Vec<ResolvedLocation>, EngineError> {
        self.run_query(QueryKind::Definitions, context)
    }

    fn references(&self, context: &CursorContext) -> Result<Vec<ResolvedLocation>, EngineError> {
        self.run_query(QueryKind::References, context)
    }

    fn call_signature(&self, context: &CursorContext) -> Result<Option<CallSignature>, EngineError> {
        self.run_query(QueryKind::CallSignature, context)
    }
}

/// Writes the serialised query to the helper's stdin and closes it.
fn write_query(mut stdin: impl Write, query: &EngineQuery<'_>) -> Result<(), EngineError> {
    serde_json::to_writer(&mut stdin, query).map_err(|err| EngineError::io(err.into()))?;
    stdin.write_all(b"\n").map_err(EngineError::io)?;
    stdin.flush().map_err(EngineError::io)?;
    // Closing the pipe lets the helper see EOF after its one query line.
    drop(stdin);
    Ok(())
}

/// Reads a single reply line from the helper's stdout.
fn read_reply(stdout: impl Read) -> Result<String, EngineError> {
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    let bytes_read = reader.read_line(&mut line).map_err(EngineError::io)?;

    debug!(
        target: ENGINE_TARGET,
        bytes_read,
        "read reply from analysis process"
    );

    Ok(line)
}

/// Drains stderr to avoid blocking the helper on a full pipe buffer.
fn drain_stderr(stderr: Option<impl Read>) -> String {
    let Some(handle) = stderr else {
        return String::new();
    };
    let mut buffer = String::new();
    if BufReader::new(handle).read_to_string(&mut buffer).is_ok() && !buffer.is_empty() {
        debug!(
            target: ENGINE_TARGET,
            stderr = %buffer.trim(),
            "analysis process stderr output"
        );
    }
    buffer
}

/// Decodes a reply line into the query's result type.
fn decode_reply<T: DeserializeOwned>(line: &str) -> Result<T, EngineError> {
    let reply: EngineReply = serde_json::from_str(line.trim()).map_err(|err| {
        EngineError::invalid_output(format!("engine reply was not valid JSON: {err}"))
    })?;

    if let Some(fault) = reply.error {
        if fault.kind == "not_found" {
            return Err(EngineError::NotFound);
        }
        return Err(EngineError::failed(format!("{}: {}", fault.kind, fault.message)));
    }

    serde_json::from_value(reply.result).map_err(|err| {
        EngineError::invalid_output(format!("engine reply had an unexpected shape: {err}"))
    })
}
