/// Initializes tracing for general application use.
/// Configure the default log level via the RUST_LOG environment variable
/// (e.g., RUST_LOG=rusche=trace,info).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initializes tracing specifically for tests: only once, at trace level,
/// with output captured by the test runner.
#[cfg(test)]
pub fn init_test_logging() {
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init()
            .ok(); // Ignore error if already initialized by another test
    });
}
