/*!
 * Tracer
 * Structured logging initialization
 */

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize structured tracing for the binaries.
///
/// Logs go to stderr: stdout carries exactly the resulting pid and nothing
/// else. Default filter is `warn`; override with `RUST_LOG`.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
