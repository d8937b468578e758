//! Request loop for the Python source-analysis daemon.
//!
//! The daemon reads one JSON request per line from standard input, runs the
//! requested analysis through a [`pythia_engine::AnalysisEngine`], and writes
//! one JSON response per line to standard output. Requests are served
//! strictly in arrival order; callers correlate answers through the echoed
//! `uuid` and `type` fields.
//!
//! Failures are isolated per request: a line that cannot be parsed or
//! analysed produces no response, is logged through [`telemetry`], and the
//! loop moves on to the next line. The session ends cleanly when input is
//! exhausted or the output channel's reader goes away; only an input channel
//! failure aborts it.
//!
//! Standard output carries responses and nothing else. All diagnostics go to
//! a rolling log file under the daemon's cache directory.

mod config;
mod dispatch;
mod facade;
mod output;
mod params;
mod server;
pub mod telemetry;

pub use config::{ConfigError, DaemonOptions, ParamsMode, ParamsModeParseError};
pub use dispatch::{DispatchError, process_line};
pub use facade::{AnalysisFacade, FacadeError};
pub use output::{OutputError, ResponseWriter};
pub use params::{ParameterSpec, call_snippet, extract_parameters, parameter_completions};
pub use server::{ServeError, ShutdownCause, serve};

#[cfg(test)]
mod tests;
