//! Common test utilities for controller integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use stepwise_algorithms::{Algorithm, AlgorithmCategory, AlgorithmInfo, AlgorithmRegistry};
use stepwise_core::checkpoint::{Checkpoint, Highlight, StepKind, Subject};
use stepwise_core::clock::MockClock;
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::RunInput;
use stepwise_engine::{EngineConfig, RunController, RunStatus};

/// An array algorithm that checkpoints once and then errors or panics.
pub struct FaultyAlgorithm {
    pub panics: bool,
}

impl FaultyAlgorithm {
    pub fn name(panics: bool) -> &'static str {
        if panics { "panicky" } else { "faulty" }
    }
}

impl Algorithm for FaultyAlgorithm {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new(Self::name(self.panics), AlgorithmCategory::Sorting).with_input("array")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        match input {
            RunInput::Array { .. } => Ok(()),
            other => Err(self.info().mismatch(other)),
        }
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let values = match &input {
                RunInput::Array { values, .. } => values.clone(),
                other => return Err(self.info().mismatch(other)),
            };
            ctx.checkpoint(
                Subject::Array(values),
                Highlight::pair(0, 1),
                StepKind::Compare,
            )
            .await?;

            if self.panics {
                panic!("comparator exploded");
            }
            Err::<RunOutcome, _>(StepwiseError::invalid("values", "comparator failed"))
        })
    }
}

/// Standard registry plus the faulty algorithms.
pub fn test_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::standard();
    registry.register(Arc::new(FaultyAlgorithm { panics: false }));
    registry.register(Arc::new(FaultyAlgorithm { panics: true }));
    registry
}

/// Default test configuration with a short traversal delay.
pub fn test_config() -> EngineConfig {
    EngineConfig::default().with_traversal_delay(Duration::from_millis(120))
}

/// Controller on a mock clock.
pub fn mock_controller(config: EngineConfig) -> (Arc<RunController>, Arc<MockClock>) {
    let clock = Arc::new(MockClock::new());
    let controller = RunController::with_clock(test_registry(), config, clock.clone());
    (Arc::new(controller), clock)
}

/// Collect every checkpoint the controller accepts.
pub fn record(controller: &RunController) -> Arc<Mutex<Vec<Checkpoint>>> {
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    controller.on_checkpoint(move |checkpoint| sink.lock().push(checkpoint.clone()));
    recorded
}

/// The parts of a checkpoint that must match between equivalent runs.
pub fn stream(checkpoints: &[Checkpoint]) -> Vec<(u64, StepKind, Subject, Highlight)> {
    checkpoints
        .iter()
        .map(|c| (c.seq, c.kind, c.subject.clone(), c.highlight.clone()))
        .collect()
}

/// Yield until `condition` holds, failing after a bounded number of polls.
pub async fn until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// Yield a fixed number of times.
pub async fn spin(times: usize) {
    for _ in 0..times {
        tokio::task::yield_now().await;
    }
}

/// Whether the controller is idle or finished.
pub fn settled(controller: &RunController) -> bool {
    controller.status() != RunStatus::Running
}
