//! Error types for stepwise.
//!
//! Every error carries enough context (algorithm name, run id, parameter name)
//! to be reported inline by a presentation layer without further lookups.

use crate::types::{Generation, RunId};
use thiserror::Error;

/// The main error type for stepwise operations.
#[derive(Error, Debug)]
pub enum StepwiseError {
    // =========================================================================
    // Parameter Errors (E100-E199)
    // =========================================================================
    /// A run parameter failed validation.
    #[error("E101: Invalid parameter '{parameter}': {cause}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: String,
        /// Why the value was rejected.
        cause: String,
    },

    /// The input kind does not match what the algorithm expects.
    #[error("E102: Algorithm '{algorithm}' expects {expected} input, got {actual}")]
    InputMismatch {
        /// The algorithm that rejected the input.
        algorithm: String,
        /// The input kind the algorithm expects.
        expected: String,
        /// The input kind that was supplied.
        actual: String,
    },

    /// Playback speed outside of the supported range.
    #[error("E103: Speed {speed} is outside 1..=100")]
    InvalidSpeed {
        /// The rejected speed.
        speed: u32,
    },

    // =========================================================================
    // Dispatch Errors (E200-E299)
    // =========================================================================
    /// No algorithm is registered under the requested name.
    #[error("E201: Unsupported algorithm '{name}'")]
    UnknownAlgorithm {
        /// The name that failed to resolve.
        name: String,
    },

    // =========================================================================
    // Run Lifecycle Errors (E300-E399)
    // =========================================================================
    /// A run is already active on this controller.
    #[error("E301: Run {run_id} is still active")]
    RunInProgress {
        /// The active run.
        run_id: RunId,
    },

    /// The run was reset or restarted and its checkpoints are no longer accepted.
    #[error("E302: Run {run_id} was abandoned at generation {generation}")]
    RunAbandoned {
        /// The abandoned run.
        run_id: RunId,
        /// The generation the run was started under.
        generation: Generation,
    },

    /// The algorithm failed mid-run.
    #[error("E303: Run {run_id} of '{algorithm}' failed: {cause}")]
    RunFailed {
        /// The failed run.
        run_id: RunId,
        /// The algorithm that was running.
        algorithm: String,
        /// Description of the failure.
        cause: String,
    },

    /// The algorithm task panicked.
    #[error("E304: Run {run_id} of '{algorithm}' panicked: {message}")]
    RunPanic {
        /// The panicked run.
        run_id: RunId,
        /// The algorithm that was running.
        algorithm: String,
        /// Panic description.
        message: String,
    },

    /// An operation needs a finished run but none is available.
    #[error("E305: No finished run available: {cause}")]
    NoFinishedRun {
        /// Why no run is available.
        cause: String,
    },

    /// An operation is not valid in the controller's current state.
    #[error("E306: Cannot {operation} while {status}")]
    InvalidState {
        /// The attempted operation.
        operation: String,
        /// The current run status.
        status: String,
    },

    // =========================================================================
    // Tree Errors (E400-E499)
    // =========================================================================
    /// A tree operation targets a tree of a different kind.
    #[error("E401: Tree holds a {current} tree, operation requested {requested}")]
    TreeKindMismatch {
        /// The kind of the tree currently held.
        current: String,
        /// The kind named by the operation.
        requested: String,
    },

    /// A structural tree invariant was found broken.
    #[error("E402: Tree invariant violated: {cause}")]
    TreeInvariant {
        /// Which invariant failed.
        cause: String,
    },

    // =========================================================================
    // Serialization/IO Errors (E900-E999)
    // =========================================================================
    /// Serialization error.
    #[error("E901: Serialization error: {0}")]
    Serialization(String),
}

impl StepwiseError {
    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "E101",
            Self::InputMismatch { .. } => "E102",
            Self::InvalidSpeed { .. } => "E103",
            Self::UnknownAlgorithm { .. } => "E201",
            Self::RunInProgress { .. } => "E301",
            Self::RunAbandoned { .. } => "E302",
            Self::RunFailed { .. } => "E303",
            Self::RunPanic { .. } => "E304",
            Self::NoFinishedRun { .. } => "E305",
            Self::InvalidState { .. } => "E306",
            Self::TreeKindMismatch { .. } => "E401",
            Self::TreeInvariant { .. } => "E402",
            Self::Serialization(_) => "E901",
        }
    }

    /// Shorthand for an [`StepwiseError::InvalidParameter`].
    pub fn invalid(parameter: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            cause: cause.into(),
        }
    }

    /// Check if this error was caused by user-supplied parameters.
    ///
    /// These are rejected before a run starts and are shown inline.
    #[must_use]
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::InputMismatch { .. }
                | Self::InvalidSpeed { .. }
                | Self::TreeKindMismatch { .. }
        )
    }

    /// Check if this error is a programming or configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::UnknownAlgorithm { .. })
    }

    /// Check if this error only signals that the run was superseded.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::RunAbandoned { .. })
    }
}

impl From<serde_json::Error> for StepwiseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias using `StepwiseError`.
pub type Result<T> = std::result::Result<T, StepwiseError>;
