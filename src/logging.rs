//! Logging configuration using tracing
//!
//! Structured logging to stderr with support for the RUST_LOG environment variable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map the CLI `-v` count to a default filter directive
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Filtering via RUST_LOG (falls back to `info`, or `debug`/`trace` with `-v`/`-vv`)
/// - Compact formatted output to stderr
///
/// # Example RUST_LOG values
/// - `RUST_LOG=issue_mirror=debug` - Debug level for this crate only
/// - `RUST_LOG=issue_mirror=trace,reqwest=debug` - Include HTTP client internals
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init(verbosity: u8) -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init()
        .map_err(|e| {
            crate::IssueMirrorError::Other(format!("Failed to initialize tracing: {}", e))
        })?;

    Ok(())
}
