#![deny(missing_docs)]

//! Core library for the docugem prompt gateway.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Multi-format document text extraction.
pub mod extract;
/// Gemini API client and prompt gateway.
pub mod gemini;
/// Structured logging and tracing setup.
pub mod logging;
