//! Wire protocol for the `pythiad` analysis daemon.
//!
//! The daemon speaks line-delimited JSON over stdio: the client writes one
//! request object per line to the daemon's stdin and reads one response
//! object per line from its stdout. This crate owns the boundary types on
//! both sides of that exchange: the closed [`Action`] set, staged request
//! parsing with the failure taxonomy clients observe in the daemon log, and
//! the wire-exact response envelope.
//!
//! Failed requests produce no response line at all, so every type here
//! describes a successful exchange; failures surface as [`RequestError`]
//! values inside the daemon.

pub mod action;
pub mod envelope;
pub mod request;

pub use action::{Action, UnknownActionError};
pub use envelope::{ActionOutcome, CompletionItem, ResponseEnvelope, SourceLocation};
pub use request::{ActionRequest, RequestError};
