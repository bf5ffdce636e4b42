/// Tracing subscriber setup. Diagnostics go to stderr so stdout stays
/// reserved for run output.
use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `run_tests=debug` with
/// `--verbose`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose { "run_tests=debug,warn" } else { "warn" }
}
