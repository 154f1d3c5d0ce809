//! Process-wide tracing setup.
//!
//! The CLI builds its config from the `-v` count; the environment can then
//! override it:
//! - `STEPWISE_LOG_FORMAT`: `json` (structured, for log shippers),
//!   `pretty` (multi-line, colored) or `compact` (single line)
//! - `STEPWISE_LOG_LEVEL` or `RUST_LOG`: an `EnvFilter` directive string
//!
//! # Example
//!
//! ```ignore
//! use stepwise_engine::observability::{LogFormat, TracingConfig, init_tracing};
//!
//! let config = TracingConfig::for_verbosity(2)
//!     .with_env_overrides()
//!     .with_format(LogFormat::Json);
//! let _guard = init_tracing(config)?;
//! ```

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig, verbosity_filter};
pub use tracing_setup::{TracingGuard, init_tracing};

/// Span covering one run of one algorithm.
#[macro_export]
macro_rules! instrument_run {
    ($run_id:expr, $algorithm:expr, $generation:expr) => {
        tracing::info_span!(
            "algorithm_run",
            run_id = %$run_id,
            algorithm = $algorithm,
            generation = %$generation
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn default_config_is_quiet() {
        let config = TracingConfig::default();
        assert_eq!(config.format(), LogFormat::Compact);
        assert_eq!(config.filter(), "warn");
        assert!(!config.include_location());
    }

    #[test]
    fn verbosity_raises_stepwise_targets_only() {
        assert_eq!(verbosity_filter(0), "warn");

        let one = verbosity_filter(1);
        assert!(one.starts_with("warn,"));
        assert!(one.contains("stepwise_engine=info"));
        assert!(one.contains("stepwise=info"));

        let two = verbosity_filter(2);
        assert!(two.contains("stepwise_algorithms=debug"));

        let many = verbosity_filter(7);
        assert!(many.starts_with("info,"));
        assert!(many.contains("stepwise_core=trace"));
    }

    #[test]
    fn verbosity_filters_parse() {
        for verbosity in 0..4 {
            let directives = verbosity_filter(verbosity);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{}", directives);
        }
    }

    #[test]
    fn setters_override() {
        let config = TracingConfig::for_verbosity(1)
            .with_format(LogFormat::Json)
            .with_filter("debug,stepwise_engine=trace")
            .with_location(true);

        assert_eq!(config.format(), LogFormat::Json);
        assert_eq!(config.filter(), "debug,stepwise_engine=trace");
        assert!(config.include_location());
        assert!(!config.include_thread_ids());
    }

    #[test]
    fn unknown_format_is_an_error() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" pretty ".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("loud".parse::<LogFormat>().unwrap_err().contains("loud"));
    }

    #[test]
    fn from_env_has_a_filter() {
        let config = TracingConfig::from_env();
        assert!(!config.filter().is_empty());
    }
}
