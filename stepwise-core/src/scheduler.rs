//! Cooperative scheduler.
//!
//! Algorithms suspend only at checkpoints. After each publish the scheduler
//! sleeps for a speed-derived delay, then parks for as long as playback is
//! paused. Pausing never interrupts an algorithm mid-step; it takes effect
//! at the next suspension point.

use crate::clock::{ClockProvider, TokioClock};
use crate::error::{Result, StepwiseError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

/// Slowest playback speed.
pub const MIN_SPEED: u32 = 1;

/// Fastest playback speed.
pub const MAX_SPEED: u32 = 100;

/// Speed used when nothing else is configured.
pub const DEFAULT_SPEED: u32 = 50;

/// Default interval between playback re-samples while paused.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Delay between checkpoints for a speed percentage.
///
/// `floor(800 - speed / 100 * 750)` milliseconds, so speed 100 waits 50ms and
/// speed 1 waits 792ms. Speeds outside `1..=100` are clamped first.
pub fn compute_delay(speed_percent: u32) -> Duration {
    let speed = u64::from(speed_percent.clamp(MIN_SPEED, MAX_SPEED));
    Duration::from_millis((80_000 - 750 * speed) / 100)
}

/// Read-only view of the playback flags.
///
/// Algorithms sample these at every checkpoint; they never write them.
pub trait PlaybackControl: Send + Sync {
    /// Whether playback is running.
    fn is_playing(&self) -> bool;

    /// Current speed in `1..=100`.
    fn speed_percent(&self) -> u32;
}

/// Shared playback flags owned by a controller.
#[derive(Debug)]
pub struct PlaybackState {
    playing: AtomicBool,
    speed: AtomicU32,
}

impl PlaybackState {
    /// Create paused playback at the given speed (clamped).
    pub fn new(speed_percent: u32) -> Self {
        Self {
            playing: AtomicBool::new(false),
            speed: AtomicU32::new(speed_percent.clamp(MIN_SPEED, MAX_SPEED)),
        }
    }

    /// Start or continue playback.
    pub fn play(&self) {
        self.playing.store(true, Ordering::SeqCst);
    }

    /// Pause playback at the next suspension point.
    pub fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    /// Change the speed.
    ///
    /// # Errors
    /// Returns `InvalidSpeed` when the value is outside `1..=100`.
    pub fn set_speed(&self, speed_percent: u32) -> Result<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed_percent) {
            return Err(StepwiseError::InvalidSpeed {
                speed: speed_percent,
            });
        }
        self.speed.store(speed_percent, Ordering::SeqCst);
        Ok(())
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

impl PlaybackControl for PlaybackState {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn speed_percent(&self) -> u32 {
        self.speed.load(Ordering::SeqCst)
    }
}

/// How long to wait after each checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Derive the delay from the current playback speed.
    Speed,
    /// Wait a fixed duration regardless of speed (tree traversals).
    Fixed(Duration),
}

impl Pacing {
    /// Resolve the delay for the current playback state.
    pub fn delay(&self, playback: &dyn PlaybackControl) -> Duration {
        match *self {
            Self::Speed => compute_delay(playback.speed_percent()),
            Self::Fixed(delay) => delay,
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Interval between playback re-samples while paused.
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Suspends algorithm tasks between checkpoints.
#[derive(Clone)]
pub struct Scheduler {
    clock: Arc<dyn ClockProvider>,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler over the given clock.
    pub fn new(clock: Arc<dyn ClockProvider>, config: SchedulerConfig) -> Self {
        Self { clock, config }
    }

    /// Create a scheduler on the tokio timer with default settings.
    pub fn tokio() -> Self {
        Self::new(Arc::new(TokioClock::new()), SchedulerConfig::default())
    }

    /// The underlying clock.
    pub fn clock(&self) -> &Arc<dyn ClockProvider> {
        &self.clock
    }

    /// The configured poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval
    }

    /// Park until playback is running.
    ///
    /// Returns immediately when already playing; otherwise re-samples the
    /// flag every poll interval.
    pub async fn await_resume(&self, playback: &dyn PlaybackControl) {
        let mut parked = false;
        while !playback.is_playing() {
            if !parked {
                tracing::trace!("Playback paused, parking");
                parked = true;
            }
            self.clock.sleep(self.config.poll_interval).await;
        }
        if parked {
            tracing::trace!("Playback resumed");
        }
    }

    /// The post-checkpoint suspension: delay, then wait out any pause.
    pub async fn pace(&self, playback: &dyn PlaybackControl, pacing: Pacing) {
        let delay = pacing.delay(playback);
        if !delay.is_zero() {
            self.clock.sleep(delay).await;
        }
        self.await_resume(playback).await;
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("mock_clock", &self.clock.is_mock())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    #[test]
    fn delay_formula() {
        assert_eq!(compute_delay(100), Duration::from_millis(50));
        assert_eq!(compute_delay(1), Duration::from_millis(792));
        assert_eq!(compute_delay(50), Duration::from_millis(425));
        // 800 - 33 * 7.5 = 552.5
        assert_eq!(compute_delay(33), Duration::from_millis(552));
    }

    #[test]
    fn delay_clamps_out_of_range() {
        assert_eq!(compute_delay(0), compute_delay(1));
        assert_eq!(compute_delay(250), compute_delay(100));
    }

    #[test]
    fn delay_is_monotonic() {
        for speed in MIN_SPEED..MAX_SPEED {
            assert!(compute_delay(speed) >= compute_delay(speed + 1));
        }
    }

    #[test]
    fn playback_speed_validation() {
        let playback = PlaybackState::default();
        assert!(!playback.is_playing());
        assert_eq!(playback.speed_percent(), DEFAULT_SPEED);

        playback.set_speed(100).unwrap();
        assert_eq!(playback.speed_percent(), 100);

        let err = playback.set_speed(0).unwrap_err();
        assert_eq!(err.code(), "E103");
        assert_eq!(playback.speed_percent(), 100);
    }

    #[test]
    fn pacing_resolves_delay() {
        let playback = PlaybackState::new(100);
        assert_eq!(Pacing::Speed.delay(&playback), Duration::from_millis(50));
        assert_eq!(
            Pacing::Fixed(Duration::from_millis(300)).delay(&playback),
            Duration::from_millis(300)
        );
    }

    #[tokio::test]
    async fn await_resume_returns_when_playing() {
        let clock = Arc::new(MockClock::new());
        let scheduler = Scheduler::new(clock.clone(), SchedulerConfig::default());
        let playback = PlaybackState::new(100);
        playback.play();

        scheduler.await_resume(&playback).await;
        assert_eq!(clock.sleep_count(), 0);
    }

    #[tokio::test]
    async fn await_resume_polls_while_paused() {
        let clock = Arc::new(MockClock::new());
        let scheduler = Scheduler::new(clock.clone(), SchedulerConfig::default());
        let playback = Arc::new(PlaybackState::new(100));

        let task = {
            let playback = Arc::clone(&playback);
            tokio::spawn(async move { scheduler.await_resume(playback.as_ref()).await })
        };

        while clock.sleep_count() < 3 {
            tokio::task::yield_now().await;
        }
        assert!(!task.is_finished());

        playback.play();
        task.await.unwrap();

        let sleeps = clock.recorded_sleeps();
        assert!(sleeps.len() >= 3);
        assert!(sleeps.iter().all(|d| *d == DEFAULT_POLL_INTERVAL));
    }

    #[tokio::test]
    async fn pace_sleeps_then_gates() {
        let clock = Arc::new(MockClock::new());
        let scheduler = Scheduler::new(clock.clone(), SchedulerConfig::default());
        let playback = PlaybackState::new(1);
        playback.play();

        scheduler.pace(&playback, Pacing::Speed).await;
        scheduler
            .pace(&playback, Pacing::Fixed(Duration::from_millis(200)))
            .await;

        assert_eq!(
            clock.recorded_sleeps(),
            vec![Duration::from_millis(792), Duration::from_millis(200)]
        );
    }
}
