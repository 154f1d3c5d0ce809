//! Run log event types.
//!
//! Events carry the run they belong to and the algorithm name so a
//! presentation layer can show a per-run activity log.

use crate::types::RunId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log severity level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Fine-grained debugging information.
    Trace,
    /// Debugging information.
    Debug,
    /// Informational messages.
    #[default]
    Info,
    /// Warning messages.
    Warn,
    /// Error messages.
    Error,
}

impl LogLevel {
    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or("invalid log level")
    }
}

/// Category of log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    /// Run lifecycle (start, finish, fail, reset).
    Run,
    /// Playback control (pause, resume, speed).
    Playback,
    /// Algorithm dispatch and validation.
    Algorithm,
    /// Tree state changes.
    Tree,
    /// Internal events.
    System,
}

impl LogCategory {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Playback => "playback",
            Self::Algorithm => "algorithm",
            Self::Tree => "tree",
            Self::System => "system",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured log event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Unique event ID, assigned by the collector.
    pub id: u64,
    /// Timestamp in nanoseconds since UNIX epoch.
    pub timestamp_ns: u64,
    /// Log severity level.
    pub level: LogLevel,
    /// Event category.
    pub category: LogCategory,
    /// Associated run (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
    /// Associated algorithm (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Structured fields for additional context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogEvent {
    /// Create a new log event with the current timestamp.
    pub fn new(level: LogLevel, category: LogCategory, message: impl Into<String>) -> Self {
        Self {
            id: 0,
            timestamp_ns: current_timestamp_ns(),
            level,
            category,
            run_id: None,
            algorithm: None,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Create a debug-level log event.
    pub fn debug(category: LogCategory, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, category, message)
    }

    /// Create an info-level log event.
    pub fn info(category: LogCategory, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, category, message)
    }

    /// Create a warn-level log event.
    pub fn warn(category: LogCategory, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, category, message)
    }

    /// Create an error-level log event.
    pub fn error(category: LogCategory, message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, category, message)
    }

    /// Set the run ID.
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Set the algorithm name.
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Add a string field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Add a numeric field.
    pub fn with_field_u64(mut self, key: impl Into<String>, value: u64) -> Self {
        self.fields
            .insert(key.into(), serde_json::Value::Number(value.into()));
        self
    }

    /// Get a field as a string, if present.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    /// Format as a single log line.
    pub fn format_line(&self) -> String {
        let mut parts = vec![
            format_timestamp(self.timestamp_ns),
            format!("[{}]", self.level.as_str().to_uppercase()),
            format!("[{}]", self.category.as_str()),
        ];

        if let Some(run_id) = self.run_id {
            parts.push(format!("run={}", run_id));
        }
        if let Some(ref algorithm) = self.algorithm {
            parts.push(format!("algorithm={}", algorithm));
        }

        parts.push(self.message.clone());

        if !self.fields.is_empty() {
            let mut keys: Vec<_> = self.fields.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}={}", k, self.fields[k]))
                .collect();
            parts.push(format!("{{{}}}", fields.join(", ")));
        }

        parts.join(" ")
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_line())
    }
}

/// Seconds and milliseconds since the epoch.
fn format_timestamp(timestamp_ns: u64) -> String {
    let secs = timestamp_ns / 1_000_000_000;
    let millis = (timestamp_ns % 1_000_000_000) / 1_000_000;
    format!("{}.{:03}", secs, millis)
}

fn current_timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn log_level_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!("error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn event_builder() {
        let run_id = RunId::new();
        let event = LogEvent::info(LogCategory::Run, "Run started")
            .with_run_id(run_id)
            .with_algorithm("quick_sort")
            .with_field("order", "ascending")
            .with_field_u64("generation", 4);

        assert_eq!(event.run_id, Some(run_id));
        assert_eq!(event.algorithm.as_deref(), Some("quick_sort"));
        assert_eq!(event.field_str("order"), Some("ascending"));
        assert!(event.timestamp_ns > 0);
    }

    #[test]
    fn format_line_contains_context() {
        let run_id = RunId::new();
        let event = LogEvent::warn(LogCategory::Playback, "Speed changed")
            .with_run_id(run_id)
            .with_field_u64("speed", 80);

        let line = event.format_line();
        assert!(line.contains("[WARN]"));
        assert!(line.contains("[playback]"));
        assert!(line.contains(&format!("run={}", run_id)));
        assert!(line.contains("speed=80"));
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_timestamp(1_500_000_000), "1.500");
        assert_eq!(format_timestamp(42_007_000_000), "42.007");
    }
}
