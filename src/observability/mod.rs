//! Observability module
//!
//! Structured logging setup shared by the library and the `irmap` binary.

pub mod telemetry;
