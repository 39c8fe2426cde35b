//! gloss-core
//!
//! Core library for AI-assisted translation of decompiled pseudocode.
//!
//! This crate defines the data model for decompiled documents, the collector
//! that gathers a function and the helpers it calls into one combined
//! document, host adapters for decompiler tooling, the dispatcher that sends
//! the document to a chat-completion service, and the per-surface session
//! machinery that runs a single request at a time off-thread.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, editor integrations, etc.).

pub mod collector;
pub mod config;
pub mod dispatch;
pub mod hosts;
pub mod model;
pub mod session;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
