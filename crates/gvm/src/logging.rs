use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::{IndicatifFilter, hide_indicatif_span_fields};
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configure `tracing`, taking into account the `RUST_LOG` environment variable.
///
/// `level` is the default verbosity picked with `-v`/`-q`. Log lines are written
/// to stderr through the progress bar layer so the two don't clobber each other.
/// Only spans that opt in with `indicatif.pb_show` get a progress bar.
pub fn setup_logging(level: LevelFilter, color: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let indicatif_layer =
        IndicatifLayer::new().with_span_field_formatter(hide_indicatif_span_fields(DefaultFields::new()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(indicatif_layer.get_stderr_writer())
        .with_ansi(color && std::io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .with_filter(filter);

    // `try_init` so tests that set up logging more than once don't panic.
    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .try_init();
}
