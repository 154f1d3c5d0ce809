//! In-memory checkpoint sink.

use crate::checkpoint::{Checkpoint, StepKind};
use crate::emitter::CheckpointSink;
use crate::error::{Result, StepwiseError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sink that records every checkpoint it accepts.
///
/// Can be told to start rejecting after a number of checkpoints, which is
/// how a superseded run looks to the algorithm.
#[derive(Debug)]
pub struct RecordingSink {
    checkpoints: Mutex<Vec<Checkpoint>>,
    accept_limit: AtomicUsize,
}

impl RecordingSink {
    /// Create an empty sink that accepts everything.
    pub fn new() -> Self {
        Self {
            checkpoints: Mutex::new(Vec::new()),
            accept_limit: AtomicUsize::new(usize::MAX),
        }
    }

    /// Reject with `RunAbandoned` once `count` checkpoints have been accepted.
    pub fn abandon_after(&self, count: usize) {
        self.accept_limit.store(count, Ordering::SeqCst);
    }

    /// All accepted checkpoints in order.
    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        self.checkpoints.lock().clone()
    }

    /// Kinds of all accepted checkpoints in order.
    pub fn kinds(&self) -> Vec<StepKind> {
        self.checkpoints.lock().iter().map(|c| c.kind).collect()
    }

    /// Number of accepted checkpoints of one kind.
    pub fn count(&self, kind: StepKind) -> usize {
        self.checkpoints
            .lock()
            .iter()
            .filter(|c| c.kind == kind)
            .count()
    }

    /// The most recent checkpoint.
    pub fn last(&self) -> Option<Checkpoint> {
        self.checkpoints.lock().last().cloned()
    }

    /// Number of accepted checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.lock().len()
    }

    /// Whether nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.lock().is_empty()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckpointSink for RecordingSink {
    fn publish(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut checkpoints = self.checkpoints.lock();
        if checkpoints.len() >= self.accept_limit.load(Ordering::SeqCst) {
            return Err(StepwiseError::RunAbandoned {
                run_id: checkpoint.run_id,
                generation: checkpoint.generation,
            });
        }
        checkpoints.push(checkpoint);
        Ok(())
    }
}
