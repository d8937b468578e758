//! Response writer for the daemon's stdout channel.
//!
//! Every response line is written with exactly one trailing newline and
//! flushed before the next request is read, so a consumer never sees a
//! partial line. A broken pipe is reported as [`OutputError::ChannelClosed`];
//! deciding to shut down on it is the serve loop's call, not the writer's.

use std::io::{self, Write};

use thiserror::Error;

use pythia_protocol::ResponseEnvelope;

/// Errors raised while writing a response line.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The response could not be serialised.
    #[error("failed to serialise response: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The consumer closed the output channel.
    #[error("output channel closed")]
    ChannelClosed,
    /// Writing or flushing the response failed for another reason.
    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),
}

impl OutputError {
    fn from_io(source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::BrokenPipe {
            Self::ChannelClosed
        } else {
            Self::Write(source)
        }
    }
}

/// Writes response lines to the daemon's output channel.
pub struct ResponseWriter<W> {
    inner: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps an output channel.
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Consumes the writer, returning the underlying channel.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Serialises an envelope and writes it as one response line.
    ///
    /// # Errors
    ///
    /// Returns an [`OutputError`] when serialisation fails or the channel
    /// rejects the write.
    pub fn write_envelope(&mut self, envelope: &ResponseEnvelope) -> Result<(), OutputError> {
        let payload = serde_json::to_string(envelope)?;
        self.write_line(&payload)
    }

    /// Writes one pre-serialised response line.
    ///
    /// Any trailing newlines already present are reduced to exactly one,
    /// and one is appended when absent. The channel is flushed before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::ChannelClosed`] when the consumer has closed
    /// the channel, or [`OutputError::Write`] for other I/O failures.
    pub fn write_line(&mut self, text: &str) -> Result<(), OutputError> {
        let body = text.trim_end_matches('\n');
        self.inner
            .write_all(body.as_bytes())
            .map_err(OutputError::from_io)?;
        self.inner.write_all(b"\n").map_err(OutputError::from_io)?;
        self.inner.flush().map_err(OutputError::from_io)?;
        Ok(())
    }
}
