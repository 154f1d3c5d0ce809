//! Instrumented algorithms for the stepwise engine.
//!
//! Each algorithm takes a [`StepContext`](stepwise_core::StepContext) and
//! checkpoints every meaningful transition through it. The families are:
//!
//! ## Sorting (`sorting::*`)
//! - bubble, selection, insertion, merge and quick sort, in either
//!   [`SortOrder`](stepwise_core::SortOrder)
//!
//! ## Searching (`searching::*`)
//! - linear scan and binary search
//!
//! ## Graphs (`graph::*`)
//! - breadth-first and depth-first traversal of a directed graph
//!
//! ## Dynamic programming (`dynamic::*`)
//! - fibonacci, 0/1 knapsack, longest common subsequence, longest
//!   increasing subsequence
//!
//! ## Greedy (`greedy::*`)
//! - activity selection and Huffman coding
//!
//! ## Backtracking (`backtracking::*`)
//! - N-Queens and Sudoku under a shared solution limit
//!
//! ## Trees (`tree::*`)
//! - plain BST, AVL and Red-Black insert, delete and search
//!
//! [`AlgorithmRegistry::standard`] registers all of them by name.

#![warn(missing_docs)]

pub mod backtracking;
pub mod dynamic;
pub mod graph;
pub mod greedy;
mod input;
pub mod registry;
pub mod searching;
pub mod sorting;
pub mod tree;

pub use registry::{Algorithm, AlgorithmCategory, AlgorithmInfo, AlgorithmRegistry};
