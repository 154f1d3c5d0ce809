//! Subscriber installation.

use anyhow::{Context, Result};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::{LogFormat, TracingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the subscriber installed; hold it for the life of the program.
#[derive(Debug)]
pub struct TracingGuard {
    format: LogFormat,
}

impl TracingGuard {
    /// The format that was installed.
    pub fn format(&self) -> LogFormat {
        self.format
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        tracing::trace!(format = ?self.format, "Tracing guard dropped");
    }
}

/// The fmt layer for a config, writing to stderr so stdout stays free for
/// checkpoint output. JSON also reports span close so run spans carry timing.
fn fmt_layer(config: &TracingConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location())
        .with_line_number(config.include_location())
        .with_thread_ids(config.include_thread_ids());

    match config.format() {
        LogFormat::Json => layer
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .flatten_event(true)
            .boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// Install the global subscriber.
///
/// An invalid filter falls back to `warn`.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<TracingGuard> {
    let filter = EnvFilter::try_new(config.filter()).unwrap_or_else(|e| {
        eprintln!("Ignoring log filter '{}': {}", config.filter(), e);
        EnvFilter::new("warn")
    });

    tracing_subscriber::registry()
        .with(fmt_layer(&config))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(TracingGuard {
        format: config.format(),
    })
}
