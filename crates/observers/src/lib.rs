//! Reusable observers for the Skein evaluator.
//!
//! The evaluator never logs on its own. It reports each step of an evaluation
//! as an [`Event`] to whatever observer it holds, and this crate provides the
//! ones most runs want:
//!
//! - [`TracingObserver`]: forwards events to [`tracing`] at the severity
//!   each one warrants
//! - [`init_tracing`]: installs a process-wide `fmt` subscriber for binaries
//!   that have no subscriber of their own
//!
//! [`Event`]: skein_evaluator::Event

mod logging;
mod telemetry;

pub use logging::TracingObserver;
pub use telemetry::{DEFAULT_FILTER, TelemetryInitError, init_tracing};
