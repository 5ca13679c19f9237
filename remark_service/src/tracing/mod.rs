//! Tracing and observability module.

/// Subscriber and span exporter installation.
pub mod tracer;
