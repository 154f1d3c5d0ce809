//! Run controller.
//!
//! The [`RunController`] owns Run State and drives one algorithm run at a
//! time on a tokio task. Each start or reset bumps the generation under the
//! state lock; the run's sink rejects checkpoints from any older generation,
//! so an abandoned task unwinds at its next checkpoint even if it outlives
//! the abort.
//!
//! ```text
//! start(request)
//!   ├─ registry lookup (E201) ── validate (E1xx/E4xx)
//!   ├─ generation += 1, status = Running, playback = playing
//!   └─ spawn ── gate ── algorithm.run(ctx) ──┐
//!                        │ checkpoint        │ join
//!                        ▼                   ▼
//!                      RunSink ──> Run State ── settle: Finished / Failed
//!                        │
//!                        └──> on_checkpoint observers
//! ```

mod sink;
mod state;

pub use state::{RunState, RunStatus};

use crate::config::EngineConfig;
use crate::replay::Replay;
use parking_lot::{Mutex, RwLock};
use sink::RunSink;
use state::{Failure, Inner};
use std::any::Any;
use std::sync::Arc;
use stepwise_algorithms::AlgorithmRegistry;
use stepwise_core::checkpoint::{Checkpoint, TreeSnapshot};
use stepwise_core::clock::{ClockProvider, TokioClock};
use stepwise_core::emitter::{CheckpointSink, StepContext};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::logging::{BufferedCollector, LogCategory, LogContext, LogEvent};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, RunRequest};
use stepwise_core::scheduler::{PlaybackControl, PlaybackState, Scheduler};
use stepwise_core::types::{Generation, RunId};
use tokio::sync::watch;
use tokio::task::JoinError;
use tracing::Instrument;

/// Observer invoked for every accepted checkpoint, in emission order.
pub type CheckpointCallback = Arc<dyn Fn(&Checkpoint) + Send + Sync>;

/// State shared between the controller, its sinks and run supervisors.
pub(crate) struct Shared {
    pub(crate) inner: Mutex<Inner>,
    pub(crate) playback: Arc<PlaybackState>,
    pub(crate) history_limit: usize,
    observers: RwLock<Vec<CheckpointCallback>>,
    status_tx: watch::Sender<(Generation, RunStatus)>,
}

impl Shared {
    /// Deliver a checkpoint to observers outside of any lock, so callbacks
    /// may call back into the controller.
    ///
    /// The generation is checked again before each observer, since a reset
    /// can land between publishing and delivery or inside an earlier observer.
    pub(crate) fn notify(&self, checkpoint: &Checkpoint) {
        let observers = self.observers.read().clone();
        for observer in observers {
            if self.inner.lock().generation != checkpoint.generation {
                tracing::debug!(
                    run_id = %checkpoint.run_id,
                    seq = checkpoint.seq,
                    "Dropping checkpoint delivery after reset"
                );
                return;
            }
            observer(checkpoint);
        }
    }

    /// Record how a run task ended, unless it was superseded.
    fn settle(
        &self,
        generation: Generation,
        result: std::result::Result<Result<RunOutcome>, JoinError>,
        log: &LogContext,
    ) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(%generation, current = %inner.generation, "Abandoned run ended");
            return;
        }
        inner.task = None;

        let failure = match result {
            Ok(Ok(outcome)) => {
                if let RunOutcome::Tree { snapshot, .. } = &outcome {
                    log.log(
                        LogEvent::debug(LogCategory::Tree, "Tree committed")
                            .with_field_u64("nodes", snapshot.len() as u64),
                    );
                    inner.tree = Some(snapshot.clone());
                }
                inner.outcome = Some(outcome);
                None
            }
            Ok(Err(e)) => {
                tracing::error!(code = e.code(), error = %e, "Run failed");
                Some(Failure::Error(e.to_string()))
            }
            Err(join_error) if join_error.is_panic() => {
                let message = panic_message(join_error.into_panic());
                tracing::error!(panic = %message, "Run task panicked");
                Some(Failure::Panic(message))
            }
            Err(join_error) => {
                tracing::warn!(error = %join_error, "Run task cancelled");
                Some(Failure::Error(join_error.to_string()))
            }
        };

        match failure {
            None => {
                inner.status = RunStatus::Finished;
                tracing::info!(steps = inner.steps, "Run finished");
                log.log(
                    LogEvent::info(LogCategory::Run, "Run finished")
                        .with_field_u64("steps", inner.steps),
                );
            }
            Some(failure) => {
                inner.status = RunStatus::Failed;
                log.log(
                    LogEvent::error(LogCategory::Run, "Run failed")
                        .with_field("cause", failure.message())
                        .with_field_u64("steps", inner.steps),
                );
                inner.failure = Some(failure);
            }
        }

        self.playback.pause();
        self.status_tx.send_replace((generation, inner.status));
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Owns Run State and runs one algorithm at a time.
pub struct RunController {
    shared: Arc<Shared>,
    registry: Arc<AlgorithmRegistry>,
    scheduler: Scheduler,
    config: EngineConfig,
    log_collector: Arc<BufferedCollector>,
}

impl RunController {
    /// Create a controller paced by the tokio timer.
    pub fn new(registry: AlgorithmRegistry, config: EngineConfig) -> Self {
        Self::with_clock(registry, config, Arc::new(TokioClock::new()))
    }

    /// Controller over every built-in algorithm with default settings.
    pub fn standard() -> Self {
        Self::new(AlgorithmRegistry::standard(), EngineConfig::default())
    }

    /// Create a controller paced by the given clock.
    pub fn with_clock(
        registry: AlgorithmRegistry,
        config: EngineConfig,
        clock: Arc<dyn ClockProvider>,
    ) -> Self {
        let (status_tx, _) = watch::channel((Generation::default(), RunStatus::Idle));
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner::default()),
            playback: Arc::new(PlaybackState::new(config.default_speed)),
            history_limit: config.history_limit,
            observers: RwLock::new(Vec::new()),
            status_tx,
        });

        Self {
            shared,
            registry: Arc::new(registry),
            scheduler: Scheduler::new(clock, config.scheduler_config()),
            config,
            log_collector: Arc::new(BufferedCollector::with_default_capacity()),
        }
    }

    /// Record run events into the given collector instead of a private one.
    pub fn with_log_collector(mut self, collector: Arc<BufferedCollector>) -> Self {
        self.log_collector = collector;
        self
    }

    /// The algorithms this controller can dispatch.
    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The run event log.
    pub fn logs(&self) -> &Arc<BufferedCollector> {
        &self.log_collector
    }

    fn log_context(&self, run_id: Option<RunId>, algorithm: Option<&str>) -> LogContext {
        let mut log = LogContext::new(self.log_collector.clone());
        if let Some(run_id) = run_id {
            log = log.with_run_id(run_id);
        }
        if let Some(algorithm) = algorithm {
            log = log.with_algorithm(algorithm);
        }
        log
    }

    /// Validate a request and start it on a new task.
    ///
    /// A tree request without a `base` operates on the tree left by the
    /// previous tree run. Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// - `UnknownAlgorithm` if the name is not registered
    /// - `RunInProgress` if a run is active
    /// - parameter and tree errors from validation; nothing is started
    #[tracing::instrument(skip(self, request), fields(algorithm = %request.algorithm))]
    pub fn start(&self, request: RunRequest) -> Result<RunId> {
        let RunRequest {
            algorithm: name,
            mut input,
        } = request;

        let algorithm = self.registry.get(&name).inspect_err(|e| {
            tracing::error!(code = e.code(), error = %e, "Unsupported algorithm requested");
            self.log_context(None, Some(&name))
                .error(LogCategory::Algorithm, e.to_string());
        })?;

        let mut inner = self.shared.inner.lock();
        if inner.status == RunStatus::Running
            && let Some(run_id) = inner.run_id
        {
            return Err(StepwiseError::RunInProgress { run_id });
        }

        if let RunInput::Tree { base, .. } = &mut input
            && base.is_none()
        {
            base.clone_from(&inner.tree);
        }

        algorithm.validate(&input).inspect_err(|e| {
            tracing::warn!(code = e.code(), error = %e, "Run rejected");
            self.log_context(None, Some(&name))
                .warn(LogCategory::Algorithm, e.to_string());
        })?;

        let run_id = RunId::new();
        let generation = inner.begin(run_id, &name);
        self.shared.playback.play();

        let log = self.log_context(Some(run_id), Some(&name));
        log.log(
            LogEvent::info(LogCategory::Run, "Run started")
                .with_field_u64("generation", generation.as_u64())
                .with_field_u64("speed", u64::from(self.shared.playback.speed_percent())),
        );

        let sink: Arc<dyn CheckpointSink> = Arc::new(RunSink::new(Arc::clone(&self.shared)));
        let ctx = StepContext::new(
            run_id,
            generation,
            sink,
            self.shared.playback.clone(),
            self.scheduler.clone(),
        )
        .with_pacing(algorithm.pacing(self.config.traversal_delay));

        let span = crate::instrument_run!(run_id, name.as_str(), generation);
        let run = tokio::spawn(
            async move {
                ctx.gate().await;
                algorithm.run(&ctx, input).await
            }
            .instrument(span.clone()),
        );
        inner.task = Some(run.abort_handle());

        let shared = Arc::clone(&self.shared);
        tokio::spawn(
            async move {
                let result = run.await;
                shared.settle(generation, result, &log);
            }
            .instrument(span),
        );

        self.shared
            .status_tx
            .send_replace((generation, RunStatus::Running));
        tracing::info!(%run_id, %generation, "Run started");

        Ok(run_id)
    }

    fn require_running(&self, inner: &Inner, operation: &str) -> Result<RunId> {
        match (inner.status, inner.run_id) {
            (RunStatus::Running, Some(run_id)) => Ok(run_id),
            (status, _) => Err(StepwiseError::InvalidState {
                operation: operation.to_string(),
                status: status.to_string(),
            }),
        }
    }

    /// Pause the active run at its next suspension point.
    ///
    /// # Errors
    /// Returns `InvalidState` when no run is active.
    pub fn pause(&self) -> Result<()> {
        let inner = self.shared.inner.lock();
        let run_id = self.require_running(&inner, "pause")?;
        self.shared.playback.pause();

        tracing::info!(%run_id, "Playback paused");
        self.log_context(Some(run_id), inner.algorithm.as_deref())
            .info(LogCategory::Playback, "Paused");
        Ok(())
    }

    /// Resume the active run.
    ///
    /// # Errors
    /// Returns `InvalidState` when no run is active.
    pub fn resume(&self) -> Result<()> {
        let inner = self.shared.inner.lock();
        let run_id = self.require_running(&inner, "resume")?;
        self.shared.playback.play();

        tracing::info!(%run_id, "Playback resumed");
        self.log_context(Some(run_id), inner.algorithm.as_deref())
            .info(LogCategory::Playback, "Resumed");
        Ok(())
    }

    /// Change playback speed from the next checkpoint onward.
    ///
    /// # Errors
    /// Returns `InvalidSpeed` outside `1..=100`; the speed is unchanged.
    pub fn set_speed(&self, speed_percent: u32) -> Result<()> {
        self.shared.playback.set_speed(speed_percent)?;

        let inner = self.shared.inner.lock();
        tracing::debug!(speed = speed_percent, "Speed changed");
        self.log_context(inner.run_id, inner.algorithm.as_deref())
            .log(
                LogEvent::info(LogCategory::Playback, "Speed changed")
                    .with_field_u64("speed", u64::from(speed_percent)),
            );
        Ok(())
    }

    /// Abandon any run and reinitialize Run State, including the held tree.
    ///
    /// Playback is paused; speed is kept. Returns the new generation.
    pub fn reset(&self) -> Generation {
        let mut inner = self.shared.inner.lock();
        let abandoned = (inner.status == RunStatus::Running)
            .then_some(inner.run_id)
            .flatten();
        let algorithm = inner.algorithm.clone();

        let generation = inner.reset();
        self.shared.playback.pause();
        self.shared
            .status_tx
            .send_replace((generation, RunStatus::Idle));

        tracing::info!(%generation, abandoned = ?abandoned, "Run state reset");
        self.log_context(abandoned, algorithm.as_deref()).log(
            LogEvent::info(LogCategory::Run, "Reset")
                .with_field_u64("generation", generation.as_u64()),
        );
        generation
    }

    /// Wait for the current run to stop and return its outcome.
    ///
    /// # Errors
    /// - `RunFailed` / `RunPanic` when the run failed
    /// - `NoFinishedRun` when nothing was started or the run was reset
    pub async fn wait(&self) -> Result<RunOutcome> {
        let mut status_rx = self.shared.status_tx.subscribe();
        status_rx
            .wait_for(|(_, status)| *status != RunStatus::Running)
            .await
            .map(|_| ())
            .map_err(|_| StepwiseError::NoFinishedRun {
                cause: "controller closed".to_string(),
            })?;

        let inner = self.shared.inner.lock();
        match (inner.status, inner.run_id) {
            (RunStatus::Finished, _) => {
                inner
                    .outcome
                    .clone()
                    .ok_or_else(|| StepwiseError::NoFinishedRun {
                        cause: "run produced no outcome".to_string(),
                    })
            }
            (RunStatus::Failed, Some(run_id)) => {
                let algorithm = inner.algorithm.as_deref().unwrap_or_default();
                Err(match &inner.failure {
                    Some(failure) => failure.to_error(run_id, algorithm),
                    None => StepwiseError::RunFailed {
                        run_id,
                        algorithm: algorithm.to_string(),
                        cause: "unknown failure".to_string(),
                    },
                })
            }
            (status, _) => Err(StepwiseError::NoFinishedRun {
                cause: format!("controller is {}", status),
            }),
        }
    }

    /// Copy of the current Run State.
    pub fn snapshot(&self) -> RunState {
        let inner = self.shared.inner.lock();
        RunState {
            run_id: inner.run_id,
            algorithm: inner.algorithm.clone(),
            subject: inner.subject.clone(),
            highlight: inner.highlight.clone(),
            last_kind: inner.last_kind,
            playing: self.shared.playback.is_playing(),
            speed_percent: self.shared.playback.speed_percent(),
            status: inner.status,
            generation: inner.generation,
            steps: inner.steps,
            error: inner.failure.as_ref().map(|f| f.message().to_string()),
        }
    }

    /// Current run status.
    pub fn status(&self) -> RunStatus {
        self.shared.inner.lock().status
    }

    /// The tree carried between tree runs.
    pub fn tree(&self) -> Option<TreeSnapshot> {
        self.shared.inner.lock().tree.clone()
    }

    /// Register an observer for every accepted checkpoint.
    pub fn on_checkpoint<F>(&self, callback: F)
    where
        F: Fn(&Checkpoint) + Send + Sync + 'static,
    {
        self.shared.observers.write().push(Arc::new(callback));
    }

    /// Step scrubbing over the last finished run.
    ///
    /// # Errors
    /// Returns `NoFinishedRun` unless the last run finished.
    pub fn replay(&self) -> Result<Replay> {
        let inner = self.shared.inner.lock();
        if inner.status != RunStatus::Finished {
            return Err(StepwiseError::NoFinishedRun {
                cause: format!("controller is {}", inner.status),
            });
        }

        let solutions = inner
            .outcome
            .as_ref()
            .map(|outcome| outcome.solutions().to_vec())
            .unwrap_or_default();
        Ok(Replay::new(inner.history.iter().cloned().collect(), solutions))
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        if let Some(task) = self.shared.inner.lock().task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("status", &self.status())
            .field("registry", &self.registry)
            .field("scheduler", &self.scheduler)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::clock::MockClock;

    fn controller() -> RunController {
        RunController::with_clock(
            AlgorithmRegistry::standard(),
            EngineConfig::default(),
            Arc::new(MockClock::new()),
        )
    }

    #[test]
    fn panic_payloads() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(7u8)), "non-string panic payload");
    }

    #[test]
    fn idle_controller_rejects_playback_changes() {
        let controller = controller();
        assert_eq!(controller.pause().unwrap_err().code(), "E306");
        assert_eq!(controller.resume().unwrap_err().code(), "E306");
        assert_eq!(controller.replay().unwrap_err().code(), "E305");

        let state = controller.snapshot();
        assert_eq!(state.status, RunStatus::Idle);
        assert!(!state.playing);
        assert_eq!(state.speed_percent, 50);
    }

    #[tokio::test]
    async fn wait_without_run() {
        let controller = controller();
        assert_eq!(controller.wait().await.unwrap_err().code(), "E305");
    }

    #[tokio::test]
    async fn run_settles_finished() {
        let controller = controller();
        controller
            .start(RunRequest::new("fibonacci", RunInput::Fibonacci { n: 5 }))
            .unwrap();

        let outcome = controller.wait().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Sequence { answer: 5, .. }));

        let state = controller.snapshot();
        assert_eq!(state.status, RunStatus::Finished);
        assert_eq!(state.steps, 4);
        assert!(!state.playing);
        assert_eq!(state.generation, Generation::new(1));
    }
}
