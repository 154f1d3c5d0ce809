//! Final results of algorithm runs.

use crate::checkpoint::{Activity, HuffmanNode, TreeSnapshot};
use crate::types::TreeNodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A completed backtracking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// The solved board.
    pub board: Vec<Vec<u8>>,
    /// Sequence number of the checkpoint that revealed it.
    pub seq: u64,
}

/// What a tree operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TreeResult {
    /// A new node was attached.
    Inserted {
        /// The new node.
        id: TreeNodeId,
    },
    /// The value was already present; nothing changed.
    Duplicate {
        /// The existing node.
        id: TreeNodeId,
    },
    /// A value was removed.
    Deleted,
    /// A search located the value.
    Found {
        /// The matching node.
        id: TreeNodeId,
    },
    /// The value is not in the tree.
    NotFound,
}

/// The final result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A sorted array.
    Sorted {
        /// The sorted values.
        values: Vec<i64>,
    },
    /// A search result.
    Search {
        /// Index of the target, if present.
        index: Option<usize>,
        /// Number of probes performed.
        probes: usize,
    },
    /// A graph traversal order.
    Traversal {
        /// Vertices in visitation order.
        order: Vec<String>,
    },
    /// A 1-D DP table and its answer cell.
    Sequence {
        /// The filled table.
        table: Vec<i64>,
        /// The answer (last cell for fibonacci, maximum for LIS).
        answer: i64,
    },
    /// A 2-D DP table and its answer cell.
    Table {
        /// The filled table.
        table: Vec<Vec<i64>>,
        /// The bottom-right cell.
        answer: i64,
    },
    /// Activities chosen by activity selection.
    Activities {
        /// Selected activities in finish order.
        selected: Vec<Activity>,
    },
    /// A Huffman tree and its code table.
    Huffman {
        /// Root of the coding tree.
        root: HuffmanNode,
        /// Symbol to bit-string code.
        codes: BTreeMap<String, String>,
    },
    /// Backtracking solutions.
    Solutions {
        /// Solutions in discovery order.
        solutions: Vec<Solution>,
        /// Whether the whole search space was explored.
        exhausted: bool,
    },
    /// A tree operation result.
    Tree {
        /// The tree after the operation.
        snapshot: TreeSnapshot,
        /// What the operation did.
        result: TreeResult,
    },
}

impl RunOutcome {
    /// Search index with `-1` standing for "not found".
    pub fn search_position(&self) -> Option<i64> {
        match self {
            Self::Search { index, .. } => Some(index.map_or(-1, |i| i as i64)),
            _ => None,
        }
    }

    /// Solutions, for backtracking outcomes.
    pub fn solutions(&self) -> &[Solution] {
        match self {
            Self::Solutions { solutions, .. } => solutions,
            _ => &[],
        }
    }
}
