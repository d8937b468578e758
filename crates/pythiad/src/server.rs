//! The daemon loop: read a line, process it, repeat until a channel dies.

use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{error, info};

use pythia_engine::AnalysisEngine;

use crate::config::ParamsMode;
use crate::dispatch;
use crate::output::ResponseWriter;

const SERVER_TARGET: &str = "pythiad::server";

/// Why the daemon loop stopped cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// The input channel reached end of file.
    InputExhausted,
    /// The output channel was closed by its reader.
    OutputClosed,
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self {
            Self::InputExhausted => "input exhausted",
            Self::OutputClosed => "output closed",
        };
        formatter.write_str(cause)
    }
}

/// Failures that abort the daemon loop.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The input channel failed mid-read.
    #[error("failed to read request line: {source}")]
    Input {
        /// Underlying read failure.
        #[source]
        source: io::Error,
    },
}

/// Serves requests from `reader` until a channel ends the session.
///
/// Each line is processed independently: a failed request is logged and the
/// loop moves on to the next line. End of input and a closed output channel
/// both stop the loop cleanly, reported via [`ShutdownCause`].
///
/// # Errors
///
/// Returns [`ServeError::Input`] when the input channel itself fails.
pub fn serve<R: BufRead, W: Write, E: AnalysisEngine>(
    mut reader: R,
    writer: W,
    engine: &E,
    params_mode: ParamsMode,
) -> Result<ShutdownCause, ServeError> {
    let mut output = ResponseWriter::new(writer);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .map_err(|source| ServeError::Input { source })?;
        if bytes_read == 0 {
            info!(target: SERVER_TARGET, "input exhausted, shutting down");
            return Ok(ShutdownCause::InputExhausted);
        }

        match dispatch::process_line(&line, engine, params_mode, &mut output) {
            Ok(()) => {}
            Err(failure) if failure.is_fatal() => {
                info!(target: SERVER_TARGET, "output channel closed, shutting down");
                return Ok(ShutdownCause::OutputClosed);
            }
            Err(failure) => {
                error!(
                    target: SERVER_TARGET,
                    error = %failure,
                    "failed to process request line"
                );
            }
        }
    }
}
