//! Core types for the stepwise algorithm visualization engine.
//!
//! Algorithms are instrumented to emit [`Checkpoint`]s through a
//! [`StepContext`]. Each checkpoint is an owned snapshot of the algorithm's
//! subject plus a highlight; after publishing it the algorithm suspends on
//! the cooperative [`Scheduler`] for a speed-derived delay and for as long
//! as playback is paused.
//!
//! # Modules
//!
//! - [`checkpoint`]: checkpoints, subjects and highlights
//! - [`emitter`]: the [`CheckpointSink`] seam and [`StepContext`]
//! - [`scheduler`]: delay computation and pause handling
//! - [`clock`]: time abstraction for deterministic tests
//! - [`params`] / [`outcome`]: run inputs and results
//! - [`logging`]: in-memory run log
//! - [`testing`]: test doubles

#![warn(missing_docs)]

pub mod checkpoint;
pub mod clock;
pub mod emitter;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod params;
pub mod scheduler;
pub mod testing;
pub mod types;

pub use checkpoint::{
    Activity, Checkpoint, Highlight, HuffmanNode, NodeColor, StepKind, Subject, TraversalFrame,
    TreeSnapshot, TreeSnapshotNode,
};
pub use clock::{ClockProvider, MockClock, TokioClock};
pub use emitter::{CheckpointSink, StepContext, StepFuture};
pub use error::{Result, StepwiseError};
pub use outcome::{RunOutcome, Solution, TreeResult};
pub use params::{
    GraphEdge, RunInput, RunRequest, SolutionLimit, SortOrder, SymbolWeight, TreeAction, TreeKind,
};
pub use scheduler::{
    DEFAULT_SPEED, Pacing, PlaybackControl, PlaybackState, Scheduler, SchedulerConfig,
    compute_delay,
};
pub use types::{Generation, RunId, TreeNodeId};

/// Prelude for algorithm implementations.
pub mod prelude {
    pub use crate::checkpoint::{Checkpoint, Highlight, StepKind, Subject};
    pub use crate::emitter::{StepContext, StepFuture};
    pub use crate::error::{Result, StepwiseError};
    pub use crate::outcome::RunOutcome;
    pub use crate::params::{RunInput, SortOrder};
}
