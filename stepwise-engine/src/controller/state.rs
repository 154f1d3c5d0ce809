//! Run State held by the controller.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use stepwise_core::checkpoint::{Checkpoint, Highlight, StepKind, Subject, TreeSnapshot};
use stepwise_core::error::StepwiseError;
use stepwise_core::outcome::RunOutcome;
use stepwise_core::types::{Generation, RunId};
use tokio::task::AbortHandle;

/// Lifecycle of the controller's current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Nothing running; fresh or reset.
    #[default]
    Idle,
    /// An algorithm task is active (playing or paused).
    Running,
    /// The last run completed.
    Finished,
    /// The last run errored or panicked.
    Failed,
}

impl RunStatus {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }

    /// Whether the run has stopped on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of the controller's Run State.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Current run, if one was started since the last reset.
    pub run_id: Option<RunId>,
    /// Algorithm of the current run.
    pub algorithm: Option<String>,
    /// Subject from the most recent checkpoint.
    pub subject: Subject,
    /// Highlight from the most recent checkpoint.
    pub highlight: Highlight,
    /// Kind of the most recent checkpoint.
    pub last_kind: Option<StepKind>,
    /// Whether playback is running.
    pub playing: bool,
    /// Playback speed (1..=100).
    pub speed_percent: u32,
    /// Run lifecycle status.
    pub status: RunStatus,
    /// Current generation.
    pub generation: Generation,
    /// Checkpoints applied in this run.
    pub steps: u64,
    /// Failure description when `status` is `Failed`.
    pub error: Option<String>,
}

/// Why a run failed.
#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Error(String),
    Panic(String),
}

impl Failure {
    pub(crate) fn message(&self) -> &str {
        match self {
            Self::Error(message) | Self::Panic(message) => message,
        }
    }

    pub(crate) fn to_error(&self, run_id: RunId, algorithm: &str) -> StepwiseError {
        match self {
            Self::Error(cause) => StepwiseError::RunFailed {
                run_id,
                algorithm: algorithm.to_string(),
                cause: cause.clone(),
            },
            Self::Panic(message) => StepwiseError::RunPanic {
                run_id,
                algorithm: algorithm.to_string(),
                message: message.clone(),
            },
        }
    }
}

/// Mutable Run State behind the controller lock.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) status: RunStatus,
    pub(crate) generation: Generation,
    pub(crate) run_id: Option<RunId>,
    pub(crate) algorithm: Option<String>,
    pub(crate) subject: Subject,
    pub(crate) highlight: Highlight,
    pub(crate) last_kind: Option<StepKind>,
    pub(crate) steps: u64,
    pub(crate) history: VecDeque<Checkpoint>,
    pub(crate) outcome: Option<RunOutcome>,
    pub(crate) failure: Option<Failure>,
    /// Tree carried between tree runs until reset.
    pub(crate) tree: Option<TreeSnapshot>,
    pub(crate) task: Option<AbortHandle>,
}

impl Inner {
    /// Clear per-run fields for a new generation.
    pub(crate) fn begin(&mut self, run_id: RunId, algorithm: &str) -> Generation {
        self.generation = self.generation.next();
        self.status = RunStatus::Running;
        self.run_id = Some(run_id);
        self.algorithm = Some(algorithm.to_string());
        self.subject = Subject::Empty;
        self.highlight = Highlight::None;
        self.last_kind = None;
        self.steps = 0;
        self.history.clear();
        self.outcome = None;
        self.failure = None;
        self.generation
    }

    /// Apply one checkpoint, keeping at most `history_limit` of them.
    pub(crate) fn apply(&mut self, checkpoint: &Checkpoint, history_limit: usize) {
        self.subject = checkpoint.subject.clone();
        self.highlight = checkpoint.highlight.clone();
        self.last_kind = Some(checkpoint.kind);
        self.steps += 1;

        if self.history.len() >= history_limit {
            self.history.pop_front();
        }
        self.history.push_back(checkpoint.clone());
    }

    /// Drop everything and abandon the current task.
    pub(crate) fn reset(&mut self) -> Generation {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let generation = self.generation.next();
        *self = Self {
            generation,
            ..Self::default()
        };
        generation
    }
}
