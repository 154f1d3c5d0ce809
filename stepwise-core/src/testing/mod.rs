//! Test doubles for running algorithms without a controller.
//!
//! [`TestHarness`] wires a [`StepContext`] to a [`RecordingSink`] and a
//! [`MockClock`], with playback already running, so an algorithm can be
//! awaited directly and its checkpoint stream inspected afterwards.
//!
//! ```ignore
//! let harness = TestHarness::new();
//! let sorted = bubble_sort(&harness.ctx, values, SortOrder::Ascending).await?;
//! assert_eq!(harness.sink.count(StepKind::Final), 1);
//! ```

mod recording;

pub use crate::clock::MockClock;
pub use recording::RecordingSink;

use crate::emitter::StepContext;
use crate::scheduler::{Pacing, PlaybackState, Scheduler, SchedulerConfig};
use crate::types::{Generation, RunId};
use std::sync::Arc;

/// A step context wired to test doubles.
pub struct TestHarness {
    /// The context to hand to an algorithm.
    pub ctx: StepContext,
    /// Receives every checkpoint.
    pub sink: Arc<RecordingSink>,
    /// Virtual clock behind the scheduler.
    pub clock: Arc<MockClock>,
    /// Playback flags; playing at the default speed.
    pub playback: Arc<PlaybackState>,
}

impl TestHarness {
    /// Harness with speed-derived pacing.
    pub fn new() -> Self {
        Self::with_pacing(Pacing::Speed)
    }

    /// Harness with the given pacing.
    pub fn with_pacing(pacing: Pacing) -> Self {
        let sink = Arc::new(RecordingSink::new());
        let clock = Arc::new(MockClock::new());
        let playback = Arc::new(PlaybackState::default());
        playback.play();

        let scheduler = Scheduler::new(clock.clone(), SchedulerConfig::default());
        let ctx = StepContext::new(
            RunId::new(),
            Generation::new(1),
            sink.clone(),
            playback.clone(),
            scheduler,
        )
        .with_pacing(pacing);

        Self {
            ctx,
            sink,
            clock,
            playback,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
