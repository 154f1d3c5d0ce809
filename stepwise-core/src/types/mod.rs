//! Core types for stepwise.

mod ids;

pub use ids::{Generation, RunId, TreeNodeId};
