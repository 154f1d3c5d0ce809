//! Tracing configuration.
//!
//! The CLI's `-v` count picks how chatty the stepwise crates are; everything
//! else stays at `warn` until the user asks for more through the environment.

use std::env;
use std::io::IsTerminal;
use std::str::FromStr;

/// Targets raised by the verbosity level. `stepwise` is the CLI binary.
const STEPWISE_TARGETS: [&str; 4] = [
    "stepwise",
    "stepwise_core",
    "stepwise_algorithms",
    "stepwise_engine",
];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line, colored output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
}

impl LogFormat {
    /// Pretty when stderr is a terminal, compact when it is piped.
    pub fn for_stderr() -> Self {
        if std::io::stderr().is_terminal() {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// `EnvFilter` directives for a `-v` count.
///
/// Zero keeps everything at `warn`. Each step raises the stepwise targets by
/// one level; three or more also lets dependencies through at `info`.
pub fn verbosity_filter(verbosity: u8) -> String {
    let (base, ours) = match verbosity {
        0 => return "warn".to_string(),
        1 => ("warn", "info"),
        2 => ("warn", "debug"),
        _ => ("info", "trace"),
    };
    let mut directives = vec![base.to_string()];
    directives.extend(STEPWISE_TARGETS.iter().map(|t| format!("{}={}", t, ours)));
    directives.join(",")
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    format: LogFormat,
    filter: String,
    include_location: bool,
    include_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: verbosity_filter(0),
            include_location: false,
            include_thread_ids: false,
        }
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|s| s == "true" || s == "1")
}

impl TracingConfig {
    /// Filter for a `-v` count, format chosen by whether stderr is a terminal.
    pub fn for_verbosity(verbosity: u8) -> Self {
        Self {
            format: LogFormat::for_stderr(),
            filter: verbosity_filter(verbosity),
            ..Self::default()
        }
    }

    /// [`for_verbosity`](Self::for_verbosity)`(0)` with environment overrides.
    pub fn from_env() -> Self {
        Self::for_verbosity(0).with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration.
    ///
    /// - `STEPWISE_LOG_FORMAT`: `json`, `pretty` or `compact`; unknown values
    ///   are ignored
    /// - `STEPWISE_LOG_LEVEL`, else `RUST_LOG`: filter directives
    /// - `STEPWISE_LOG_LOCATION`, `STEPWISE_LOG_THREAD_IDS`: `true` or `1`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(format) = env::var("STEPWISE_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.format = format;
        }
        if let Ok(filter) = env::var("STEPWISE_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
            self.filter = filter;
        }
        if let Some(location) = flag("STEPWISE_LOG_LOCATION") {
            self.include_location = location;
        }
        if let Some(thread_ids) = flag("STEPWISE_LOG_THREAD_IDS") {
            self.include_thread_ids = thread_ids;
        }
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directives.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Include file and line.
    pub fn with_location(mut self, include: bool) -> Self {
        self.include_location = include;
        self
    }

    /// Include thread ids.
    pub fn with_thread_ids(mut self, include: bool) -> Self {
        self.include_thread_ids = include;
        self
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn include_location(&self) -> bool {
        self.include_location
    }

    pub fn include_thread_ids(&self) -> bool {
        self.include_thread_ids
    }
}
