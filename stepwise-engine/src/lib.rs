//! Run controller for the stepwise algorithm engine.
//!
//! This crate owns Run State. It resolves algorithms from an
//! [`AlgorithmRegistry`](stepwise_algorithms::AlgorithmRegistry), runs them
//! on tokio tasks under cooperative playback control, applies their
//! checkpoints in order and keeps the history for step scrubbing.
//!
//! # Example
//!
//! ```ignore
//! use stepwise_core::{RunInput, RunRequest};
//! use stepwise_engine::RunController;
//!
//! let controller = RunController::standard();
//! controller.on_checkpoint(|c| println!("{} {}", c.seq, c.kind));
//! controller.start(RunRequest::new("bubble_sort", RunInput::array(vec![3, 1, 2])))?;
//! controller.set_speed(100)?;
//! let outcome = controller.wait().await?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod observability;
pub mod replay;

pub use config::EngineConfig;
pub use controller::{CheckpointCallback, RunController, RunState, RunStatus};
pub use replay::Replay;
