//! Engine configuration.

use std::time::Duration;
use stepwise_core::scheduler::{DEFAULT_POLL_INTERVAL, DEFAULT_SPEED, SchedulerConfig};

/// Default fixed delay between tree traversal checkpoints.
pub const DEFAULT_TRAVERSAL_DELAY: Duration = Duration::from_millis(500);

/// Default number of checkpoints kept for replay.
pub const DEFAULT_HISTORY_LIMIT: usize = 100_000;

/// Configuration for a [`RunController`](crate::RunController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Playback speed a new controller starts with (1..=100).
    pub default_speed: u32,
    /// Fixed delay after each tree checkpoint.
    pub traversal_delay: Duration,
    /// Interval between playback re-samples while paused.
    pub poll_interval: Duration,
    /// Maximum checkpoints retained per run. Oldest are dropped first.
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_speed: DEFAULT_SPEED,
            traversal_delay: DEFAULT_TRAVERSAL_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `STEPWISE_DEFAULT_SPEED`: initial playback speed (1..=100)
    /// - `STEPWISE_TRAVERSAL_MS`: tree traversal delay in milliseconds
    /// - `STEPWISE_POLL_MS`: pause poll interval in milliseconds
    /// - `STEPWISE_HISTORY_LIMIT`: checkpoints retained for replay
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let default_speed = std::env::var("STEPWISE_DEFAULT_SPEED")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_SPEED);

        let traversal_ms = std::env::var("STEPWISE_TRAVERSAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TRAVERSAL_DELAY.as_millis() as u64);

        let poll_ms = std::env::var("STEPWISE_POLL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_millis() as u64);

        let history_limit = std::env::var("STEPWISE_HISTORY_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        Self::default()
            .with_default_speed(default_speed)
            .with_traversal_delay(Duration::from_millis(traversal_ms))
            .with_poll_interval(Duration::from_millis(poll_ms))
            .with_history_limit(history_limit)
    }

    /// Set the initial playback speed, clamped to 1..=100.
    pub fn with_default_speed(mut self, speed: u32) -> Self {
        self.default_speed = speed.clamp(1, 100);
        self
    }

    /// Set the tree traversal delay.
    pub fn with_traversal_delay(mut self, delay: Duration) -> Self {
        self.traversal_delay = delay;
        self
    }

    /// Set the pause poll interval. At least one millisecond.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Set the replay history limit. At least 1.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Scheduler settings derived from this configuration.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: self.poll_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_speed, 50);
        assert_eq!(config.traversal_delay, Duration::from_millis(500));
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.scheduler_config().poll_interval, config.poll_interval);
    }

    #[test]
    fn setters_clamp() {
        let config = EngineConfig::default()
            .with_default_speed(0)
            .with_poll_interval(Duration::ZERO)
            .with_history_limit(0);
        assert_eq!(config.default_speed, 1);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert_eq!(config.history_limit, 1);

        assert_eq!(EngineConfig::default().with_default_speed(400).default_speed, 100);
    }
}
