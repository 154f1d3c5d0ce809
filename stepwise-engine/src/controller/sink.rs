//! Generation-checked sink from a run task into the controller.

use super::Shared;
use super::state::RunStatus;
use std::sync::Arc;
use stepwise_core::checkpoint::Checkpoint;
use stepwise_core::emitter::CheckpointSink;
use stepwise_core::error::{Result, StepwiseError};

/// Applies checkpoints to Run State while their generation is current.
pub(crate) struct RunSink {
    shared: Arc<Shared>,
}

impl RunSink {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }
}

impl CheckpointSink for RunSink {
    fn publish(&self, checkpoint: Checkpoint) -> Result<()> {
        {
            let mut inner = self.shared.inner.lock();
            if inner.generation != checkpoint.generation || inner.status != RunStatus::Running {
                tracing::debug!(
                    run_id = %checkpoint.run_id,
                    generation = %checkpoint.generation,
                    current = %inner.generation,
                    "Discarding stale checkpoint"
                );
                return Err(StepwiseError::RunAbandoned {
                    run_id: checkpoint.run_id,
                    generation: checkpoint.generation,
                });
            }
            inner.apply(&checkpoint, self.shared.history_limit);
        }

        self.shared.notify(&checkpoint);
        Ok(())
    }
}
