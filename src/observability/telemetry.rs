//! Telemetry
//!
//! Structured logging via `tracing`. Log levels come from RUST_LOG, then
//! IRMAP_LOG, then the configured filter. Output goes to stderr so stdout
//! stays clean for JSON results.

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Pick the filter directive: RUST_LOG, then IRMAP_LOG, then `fallback`.
pub fn resolve_filter(fallback: &str) -> String {
    std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("IRMAP_LOG"))
        .unwrap_or_else(|_| fallback.to_string())
}

/// Initialize tracing with the resolved filter. Later calls are no-ops.
pub fn init_tracing(fallback: &str) {
    init_tracing_with_filter(&resolve_filter(fallback));
}

/// Initialize tracing for verbose mode
pub fn init_tracing_verbose() {
    init_tracing_with_filter("irmap=debug,info")
}

/// Initialize with custom filter string
pub fn init_tracing_with_filter(filter: &str) {
    INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_level(true)
            .compact()
            .with_writer(std::io::stderr);

        let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

/// Sanitize a string for safe log output by escaping control characters.
/// Prevents log injection through embedded newlines.
pub fn sanitize_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x1b' => out.push_str("\\e"),
            '\x00' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Test-only tracing that writes through the test harness
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
