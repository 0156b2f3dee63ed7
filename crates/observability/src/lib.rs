//! Tracing/logging setup shared by retailops binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging with an explicit format and default filter.
///
/// `RUST_LOG` still takes precedence over `default_filter`. This is safe to
/// call multiple times; subsequent calls become no-ops.
pub fn init_with(format: LogFormat, default_filter: &str) {
    tracing::init(format, default_filter);
}
