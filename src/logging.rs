use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Output goes to stderr: stdout is reserved for protocol responses.
/// `level` (from `--log-level`) wins over `RUST_LOG`; the fallback is `info`.
pub fn init(level: Option<&str>) {
    let filter = level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Verbose subscriber for tests; safe to call repeatedly.
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
