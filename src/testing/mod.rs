//! Test support
//!
//! In-process stand-ins for external services, used by the crate's own tests
//! and by downstream integration tests.

pub mod mock_analyzer;
