//! Per-line request processing: parse, execute, respond.
//!
//! A request that fails at any stage produces no response; the caller
//! decides whether the failure ends the session via [`DispatchError::is_fatal`].

use std::io::Write;

use thiserror::Error;

use pythia_engine::AnalysisEngine;
use pythia_protocol::{ActionRequest, RequestError, ResponseEnvelope};

use crate::config::ParamsMode;
use crate::facade::{AnalysisFacade, FacadeError};
use crate::output::{OutputError, ResponseWriter};

/// Failures raised while processing one request line.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The line could not be parsed into a request.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The request was valid but its operation failed.
    #[error(transparent)]
    Facade(#[from] FacadeError),
    /// The response could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl DispatchError {
    /// Returns whether the failure must end the session.
    ///
    /// Only a closed output channel is fatal; every other failure is
    /// isolated to the request that raised it.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Output(OutputError::ChannelClosed))
    }
}

/// Processes one request line end to end.
///
/// On success exactly one response line has been written and flushed; on
/// failure nothing has been written for this request.
///
/// # Errors
///
/// Returns [`DispatchError`] describing the stage that failed.
pub fn process_line<E: AnalysisEngine, W: Write>(
    line: &str,
    engine: &E,
    params_mode: ParamsMode,
    output: &mut ResponseWriter<W>,
) -> Result<(), DispatchError> {
    let request = ActionRequest::parse(line)?;
    let facade = AnalysisFacade::new(engine, &request, params_mode)?;
    let outcome = facade.execute(request.action())?;
    let envelope = ResponseEnvelope::new(request.uuid().clone(), request.action(), outcome);
    output.write_envelope(&envelope)?;
    Ok(())
}
