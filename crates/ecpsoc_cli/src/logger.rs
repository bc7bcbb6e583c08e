//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber, writing compact lines to stderr.
///
/// `RUST_LOG` takes precedence over the flags when it is set.
pub fn init(verbose: bool, quiet: bool) {
    let default = default_directives(verbose, quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// Filter used when `RUST_LOG` is unset. `ecpsoc` covers every `ecpsoc_*` target.
fn default_directives(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "ecpsoc=debug,warn"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}
