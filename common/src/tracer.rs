use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

pub struct TracerOptions<'a> {
    /// Filter directive used when `RUST_LOG` is not set.
    pub default_directive: &'a str,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for TracerOptions<'_> {
    fn default() -> Self {
        Self {
            default_directive: "info",
            ansi: true,
        }
    }
}

/// Initialises the log tracer for a binary.
/// Create it once at the start of `main` and keep it alive for the whole run.
pub struct TracerEngine;

impl TracerEngine {
    /// Initialises the stderr log tracer, leaving stdout free for reports.
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// #Returns
    /// An instance of TracerEngine
    pub fn new(options: TracerOptions) -> Self {
        let log_tracer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(options.ansi);

        // This filter is applied to the log tracer
        let log_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(options.default_directive));

        let subscriber =
            tracing_subscriber::Registry::default().with(log_tracer.with_filter(log_filter));

        // A second call (e.g. from tests) keeps the first subscriber
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            tracing::warn!("{e}");
        }

        Self
    }
}
