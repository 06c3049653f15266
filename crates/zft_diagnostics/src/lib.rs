//! Diagnostic creation, severity management and terminal rendering.
//!
//! The placement engine and the input parsers report progress and tolerated
//! input problems as structured [`Diagnostic`] values. A thread-safe
//! [`DiagnosticSink`] accumulates them, and [`TerminalRenderer`] formats them
//! for the command line.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, SourceLocation};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
