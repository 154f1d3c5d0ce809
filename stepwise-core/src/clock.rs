//! Clock provider for time abstraction.
//!
//! The scheduler never calls `tokio::time` directly. It sleeps through a
//! [`ClockProvider`], so tests can substitute a [`MockClock`] whose sleeps
//! complete immediately while recording what was requested.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Boxed future returned by [`ClockProvider::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Provider trait for time operations.
pub trait ClockProvider: Send + Sync {
    /// Monotonic time in nanoseconds since the clock was created.
    fn now(&self) -> u64;

    /// Suspend the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;

    /// Check if this is a mock clock.
    fn is_mock(&self) -> bool;
}

/// Real clock backed by the tokio timer.
#[derive(Debug, Clone)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    /// Create a new real clock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockProvider for TokioClock {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn is_mock(&self) -> bool {
        false
    }
}

/// Virtual clock for tests.
///
/// Every sleep advances virtual time by the requested duration, records it,
/// and yields to the runtime once instead of waiting. Runs paced by a mock
/// clock therefore finish as fast as the executor can poll them while still
/// interleaving with other tasks at every suspension point.
#[derive(Debug, Default)]
pub struct MockClock {
    /// Current virtual time in nanoseconds.
    current_nanos: AtomicU64,
    /// Every sleep requested so far, in order.
    sleeps: Mutex<Vec<Duration>>,
}

impl MockClock {
    /// Create a mock clock starting at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance virtual time without sleeping.
    pub fn advance(&self, duration: Duration) {
        self.current_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// All sleeps requested so far.
    pub fn recorded_sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Number of sleeps requested so far.
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().len()
    }

    /// Forget recorded sleeps.
    pub fn clear(&self) {
        self.sleeps.lock().clear();
    }
}

impl ClockProvider for MockClock {
    fn now(&self) -> u64 {
        self.current_nanos.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        self.sleeps.lock().push(duration);
        self.advance(duration);
        Box::pin(tokio::task::yield_now())
    }

    fn is_mock(&self) -> bool {
        true
    }
}
