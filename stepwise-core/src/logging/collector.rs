//! Log collector for capturing and storing run log events.

use super::event::{LogCategory, LogEvent, LogLevel};
use crate::types::RunId;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum number of events to keep in the default buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1_000;

/// Trait for log event collectors.
pub trait LogCollector: Send + Sync {
    /// Collect a log event.
    fn collect(&self, event: LogEvent);

    /// Get the number of collected events.
    fn len(&self) -> usize;

    /// Check if the collector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type LogSubscribers = RwLock<Vec<Arc<dyn Fn(&LogEvent) + Send + Sync>>>;

/// Thread-safe log collector with a bounded ring buffer.
pub struct BufferedCollector {
    buffer: RwLock<VecDeque<LogEvent>>,
    capacity: usize,
    next_id: AtomicU64,
    min_level: LogLevel,
    subscribers: LogSubscribers,
}

impl BufferedCollector {
    /// Create a new collector with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_CAPACITY))),
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            min_level: LogLevel::Trace,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Create a collector with default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }

    /// Drop events below `level`.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add a subscriber for real-time event notifications.
    pub fn subscribe(&self, callback: Arc<dyn Fn(&LogEvent) + Send + Sync>) {
        self.subscribers.write().push(callback);
    }

    /// Get events for a specific run.
    pub fn by_run(&self, run_id: RunId) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer
            .iter()
            .filter(|e| e.run_id == Some(run_id))
            .cloned()
            .collect()
    }

    /// Get events at or above a certain level.
    pub fn by_level(&self, min_level: LogLevel) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer
            .iter()
            .filter(|e| e.level >= min_level)
            .cloned()
            .collect()
    }

    /// Get events in one category.
    pub fn by_category(&self, category: LogCategory) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Get all events (up to capacity).
    pub fn all(&self) -> Vec<LogEvent> {
        self.buffer.read().iter().cloned().collect()
    }
}

impl LogCollector for BufferedCollector {
    fn collect(&self, mut event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        event.id = self.next_id.fetch_add(1, Ordering::SeqCst);

        {
            let subscribers = self.subscribers.read();
            for subscriber in subscribers.iter() {
                subscriber(&event);
            }
        }

        let mut buffer = self.buffer.write();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    fn len(&self) -> usize {
        self.buffer.read().len()
    }
}

impl Default for BufferedCollector {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Logging scoped to one run.
#[derive(Clone)]
pub struct LogContext {
    collector: Arc<dyn LogCollector>,
    run_id: Option<RunId>,
    algorithm: Option<String>,
}

impl LogContext {
    /// Create a new log context.
    pub fn new(collector: Arc<dyn LogCollector>) -> Self {
        Self {
            collector,
            run_id: None,
            algorithm: None,
        }
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

    /// Log an event with context fields applied.
    pub fn log(&self, mut event: LogEvent) {
        if event.run_id.is_none() {
            event.run_id = self.run_id;
        }
        if event.algorithm.is_none() {
            event.algorithm = self.algorithm.clone();
        }
        self.collector.collect(event);
    }

    /// Log an info-level message.
    pub fn info(&self, category: LogCategory, message: impl Into<String>) {
        self.log(LogEvent::info(category, message));
    }

    /// Log a warn-level message.
    pub fn warn(&self, category: LogCategory, message: impl Into<String>) {
        self.log(LogEvent::warn(category, message));
    }

    /// Log an error-level message.
    pub fn error(&self, category: LogCategory, message: impl Into<String>) {
        self.log(LogEvent::error(category, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_collector_capacity() {
        let collector = BufferedCollector::new(3);

        for i in 1..=4 {
            collector.collect(LogEvent::info(LogCategory::System, format!("Event {}", i)));
        }

        assert_eq!(collector.len(), 3);
        let events = collector.all();
        assert_eq!(events[0].message, "Event 2");
        assert_eq!(events[2].message, "Event 4");
        assert_eq!(events[2].id, 4);
    }

    #[test]
    fn buffered_collector_by_run() {
        let collector = BufferedCollector::new(100);
        let run_id = RunId::new();

        collector.collect(LogEvent::info(LogCategory::System, "Unrelated"));
        collector.collect(LogEvent::info(LogCategory::Run, "Run started").with_run_id(run_id));
        collector.collect(LogEvent::info(LogCategory::Playback, "Paused").with_run_id(run_id));

        assert_eq!(collector.by_run(run_id).len(), 2);
        assert_eq!(collector.by_category(LogCategory::Playback).len(), 1);
    }

    #[test]
    fn buffered_collector_levels() {
        let collector = BufferedCollector::new(100).with_min_level(LogLevel::Info);

        collector.collect(LogEvent::debug(LogCategory::System, "Dropped"));
        collector.collect(LogEvent::info(LogCategory::System, "Info"));
        collector.collect(LogEvent::error(LogCategory::Run, "Error"));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.by_level(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn log_context_applies_run() {
        let collector = Arc::new(BufferedCollector::new(100));
        let run_id = RunId::new();

        let ctx = LogContext::new(collector.clone())
            .with_run_id(run_id)
            .with_algorithm("bfs");
        ctx.info(LogCategory::Run, "Run finished");

        let events = collector.all();
        assert_eq!(events[0].run_id, Some(run_id));
        assert_eq!(events[0].algorithm.as_deref(), Some("bfs"));
    }

    #[test]
    fn subscriber_notification() {
        use std::sync::atomic::AtomicUsize;

        let collector = BufferedCollector::new(100);
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        collector.subscribe(Arc::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        collector.collect(LogEvent::info(LogCategory::System, "Event 1"));
        collector.collect(LogEvent::info(LogCategory::System, "Event 2"));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
