//! Tracing setup. Logs go to stderr so stdout carries only the widget output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `verbose` turns on debug output for the widget crates; otherwise
/// `RUST_LOG` is honoured, falling back to warnings only.
pub fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("widget_core=debug,weather_widget=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
