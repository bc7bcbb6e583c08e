//! Coded diagnostics, accumulation, and rendering.
//!
//! Composition failures and advisories are reported as structured
//! [`Diagnostic`] values carrying a severity, a stable code such as `E103`,
//! the subject they concern, and optional notes and help lines. The
//! [`DiagnosticSink`] accumulates them and a [`DiagnosticRenderer`] formats
//! them for a terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
