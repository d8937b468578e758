//! Test suites for the daemon loop.

mod session_behaviour;
pub(crate) mod support;
