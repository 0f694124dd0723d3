//! Unit tests for irmap modules
//!
//! Network tests talk only to the in-process mock analyzer.

mod test_analyzer;
mod test_cli;
