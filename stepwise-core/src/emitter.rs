//! Checkpoint emission.
//!
//! Algorithms receive a [`StepContext`] and call [`StepContext::checkpoint`]
//! at every meaningful transition. The context stamps the checkpoint with
//! the run's identity, hands it to the [`CheckpointSink`] and then suspends
//! through the [`Scheduler`].

use crate::checkpoint::{Checkpoint, Highlight, StepKind, Subject};
use crate::error::Result;
use crate::scheduler::{Pacing, PlaybackControl, Scheduler};
use crate::types::{Generation, RunId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Boxed future for recursive algorithm steps.
///
/// Recursive async functions (merge sort, DFS, backtracking) return this so
/// the recursion has a known size.
pub type StepFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Destination for checkpoints.
///
/// A sink applies a checkpoint to whatever state it maintains and forwards
/// it to observers. Returning an error stops the emitting algorithm.
pub trait CheckpointSink: Send + Sync {
    /// Accept one checkpoint.
    ///
    /// # Errors
    /// Returns `RunAbandoned` when the checkpoint's generation is stale.
    fn publish(&self, checkpoint: Checkpoint) -> Result<()>;
}

/// Everything an algorithm needs to emit checkpoints.
pub struct StepContext {
    run_id: RunId,
    generation: Generation,
    sink: Arc<dyn CheckpointSink>,
    playback: Arc<dyn PlaybackControl>,
    scheduler: Scheduler,
    pacing: Pacing,
    next_seq: AtomicU64,
}

impl StepContext {
    /// Create a context with speed-derived pacing.
    pub fn new(
        run_id: RunId,
        generation: Generation,
        sink: Arc<dyn CheckpointSink>,
        playback: Arc<dyn PlaybackControl>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            run_id,
            generation,
            sink,
            playback,
            scheduler,
            pacing: Pacing::Speed,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Override the post-checkpoint pacing.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// The run this context belongs to.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The generation the run was started under.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The active pacing.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Number of checkpoints emitted so far.
    pub fn emitted(&self) -> u64 {
        self.next_seq.load(Ordering::SeqCst)
    }

    /// Emit a checkpoint and suspend.
    ///
    /// Returns the checkpoint's sequence number.
    ///
    /// # Errors
    /// Propagates the sink's error; algorithms forward it with `?` so a
    /// superseded run unwinds at its next checkpoint.
    pub async fn checkpoint(
        &self,
        subject: Subject,
        highlight: Highlight,
        kind: StepKind,
    ) -> Result<u64> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.sink.publish(Checkpoint {
            run_id: self.run_id,
            generation: self.generation,
            seq,
            kind,
            subject,
            highlight,
        })?;

        self.scheduler.pace(self.playback.as_ref(), self.pacing).await;
        Ok(seq)
    }

    /// Emit a checkpoint with no highlight.
    pub async fn checkpoint_plain(&self, subject: Subject, kind: StepKind) -> Result<u64> {
        self.checkpoint(subject, Highlight::None, kind).await
    }

    /// Park until playback is running, without emitting.
    pub async fn gate(&self) {
        self.scheduler.await_resume(self.playback.as_ref()).await;
    }
}

impl std::fmt::Debug for StepContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepContext")
            .field("run_id", &self.run_id)
            .field("generation", &self.generation)
            .field("pacing", &self.pacing)
            .field("emitted", &self.emitted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use std::time::Duration;

    #[tokio::test]
    async fn checkpoints_are_numbered_in_order() {
        let harness = TestHarness::new();
        let ctx = &harness.ctx;

        let first = ctx
            .checkpoint(Subject::Array(vec![2, 1]), Highlight::pair(0, 1), StepKind::Compare)
            .await
            .unwrap();
        let second = ctx
            .checkpoint_plain(Subject::Array(vec![1, 2]), StepKind::Final)
            .await
            .unwrap();

        assert_eq!((first, second), (0, 1));
        assert_eq!(ctx.emitted(), 2);

        let recorded = harness.sink.checkpoints();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].highlight, Highlight::pair(0, 1));
        assert_eq!(recorded[1].seq, 1);
        assert!(recorded.iter().all(|c| c.run_id == ctx.run_id()));
    }

    #[tokio::test]
    async fn each_checkpoint_sleeps_the_speed_delay() {
        let harness = TestHarness::new();
        harness.playback.set_speed(100).unwrap();

        for _ in 0..3 {
            harness
                .ctx
                .checkpoint_plain(Subject::Empty, StepKind::Probe)
                .await
                .unwrap();
        }
        assert_eq!(harness.clock.recorded_sleeps(), vec![Duration::from_millis(50); 3]);
    }

    #[tokio::test]
    async fn fixed_pacing_ignores_speed() {
        let harness = TestHarness::with_pacing(Pacing::Fixed(Duration::from_millis(500)));
        harness.playback.set_speed(1).unwrap();

        harness
            .ctx
            .checkpoint_plain(Subject::Empty, StepKind::Visit)
            .await
            .unwrap();
        assert_eq!(harness.clock.recorded_sleeps(), vec![Duration::from_millis(500)]);
    }

    #[tokio::test]
    async fn sink_error_stops_emission() {
        let harness = TestHarness::new();
        harness.sink.abandon_after(1);

        harness
            .ctx
            .checkpoint_plain(Subject::Empty, StepKind::Probe)
            .await
            .unwrap();
        let err = harness
            .ctx
            .checkpoint_plain(Subject::Empty, StepKind::Probe)
            .await
            .unwrap_err();

        assert!(err.is_abandoned());
        assert_eq!(harness.sink.len(), 1);
        // The rejected checkpoint does not sleep.
        assert_eq!(harness.clock.sleep_count(), 1);
    }
}
