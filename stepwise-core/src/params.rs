//! Run requests and their parameters.
//!
//! A [`RunRequest`] names an algorithm and carries a typed [`RunInput`].
//! Inputs are plain data so they can be built from CLI flags or loaded
//! from a YAML/JSON document.

use crate::checkpoint::{Activity, TreeSnapshot};
use crate::error::{Result, StepwiseError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest array accepted by array-based algorithms.
pub const MAX_ARRAY_LEN: usize = 500;

/// Direction for sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// Whether `left` and `right` are out of order and must be exchanged.
    #[inline]
    pub fn should_swap(self, left: i64, right: i64) -> bool {
        match self {
            Self::Ascending => left > right,
            Self::Descending => left < right,
        }
    }

    /// Whether `left` may stay before `right`.
    #[inline]
    pub fn is_in_order(self, left: i64, right: i64) -> bool {
        !self.should_swap(left, right)
    }

    /// Whether `left` must come strictly before `right`.
    #[inline]
    pub fn precedes(self, left: i64, right: i64) -> bool {
        match self {
            Self::Ascending => left < right,
            Self::Descending => left > right,
        }
    }

    /// Check a whole slice.
    pub fn is_sorted(self, values: &[i64]) -> bool {
        values.windows(2).all(|w| self.is_in_order(w[0], w[1]))
    }
}

/// How many solutions a backtracking search collects before stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionLimit {
    /// Explore the whole search space.
    All,
    /// Stop once this many solutions have been found.
    AtMost(usize),
}

impl SolutionLimit {
    /// Stop at the first solution.
    pub const FIRST: Self = Self::AtMost(1);

    /// Whether `found` solutions satisfy the limit.
    pub fn reached(self, found: usize) -> bool {
        match self {
            Self::All => false,
            Self::AtMost(limit) => found >= limit,
        }
    }
}

fn all_solutions() -> SolutionLimit {
    SolutionLimit::All
}

fn first_solution() -> SolutionLimit {
    SolutionLimit::FIRST
}

/// Balancing discipline of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    /// Plain binary search tree.
    Bst,
    /// AVL tree.
    Avl,
    /// Red-Black tree.
    RedBlack,
}

impl TreeKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bst => "bst",
            Self::Avl => "avl",
            Self::RedBlack => "red_black",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single mutation or lookup on a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum TreeAction {
    /// Insert a value.
    Insert(i64),
    /// Delete a value.
    Delete(i64),
    /// Look up a value.
    Search(i64),
}

impl TreeAction {
    /// The operand value.
    pub fn value(&self) -> i64 {
        match *self {
            Self::Insert(v) | Self::Delete(v) | Self::Search(v) => v,
        }
    }
}

/// A directed edge between two named vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source vertex.
    pub from: String,
    /// Target vertex.
    pub to: String,
}

impl GraphEdge {
    /// Create a new edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A symbol and its frequency for Huffman coding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolWeight {
    /// The symbol.
    pub symbol: String,
    /// Its frequency.
    pub weight: u64,
}

impl SymbolWeight {
    /// Create a new symbol weight.
    pub fn new(symbol: impl Into<String>, weight: u64) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
        }
    }
}

/// Typed algorithm input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunInput {
    /// An array to sort or scan.
    Array {
        /// The values.
        values: Vec<i64>,
        /// Sort direction (ignored by non-sorting algorithms).
        #[serde(default)]
        order: SortOrder,
    },
    /// An array and a search target.
    Search {
        /// The values.
        values: Vec<i64>,
        /// The value to look for.
        target: i64,
    },
    /// A directed graph and a start vertex.
    Graph {
        /// Vertex names.
        nodes: Vec<String>,
        /// Directed edges.
        edges: Vec<GraphEdge>,
        /// Start vertex.
        start: String,
    },
    /// Fibonacci table size.
    Fibonacci {
        /// Index of the last cell.
        n: usize,
    },
    /// 0/1 knapsack.
    Knapsack {
        /// Item values.
        values: Vec<i64>,
        /// Item weights.
        weights: Vec<usize>,
        /// Knapsack capacity.
        capacity: usize,
    },
    /// Two strings for longest common subsequence.
    Sequences {
        /// First string.
        first: String,
        /// Second string.
        second: String,
    },
    /// Activities for activity selection.
    Activities {
        /// Candidate activities.
        activities: Vec<Activity>,
    },
    /// Symbol frequencies for Huffman coding.
    Frequencies {
        /// Symbols and weights.
        symbols: Vec<SymbolWeight>,
    },
    /// N-Queens board size.
    Queens {
        /// Board side length.
        size: usize,
        /// Solution limit.
        #[serde(default = "all_solutions")]
        limit: SolutionLimit,
    },
    /// A Sudoku grid; 0 marks an empty cell.
    Sudoku {
        /// 9x9 grid.
        grid: Vec<Vec<u8>>,
        /// Solution limit.
        #[serde(default = "first_solution")]
        limit: SolutionLimit,
    },
    /// A tree operation.
    Tree {
        /// Tree kind.
        tree: TreeKind,
        /// Operation.
        action: TreeAction,
        /// Tree to operate on. The controller fills this with its current
        /// tree when absent; `None` at run time means an empty tree.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<TreeSnapshot>,
    },
}

impl RunInput {
    /// Name of the input variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Array { .. } => "array",
            Self::Search { .. } => "search",
            Self::Graph { .. } => "graph",
            Self::Fibonacci { .. } => "fibonacci",
            Self::Knapsack { .. } => "knapsack",
            Self::Sequences { .. } => "sequences",
            Self::Activities { .. } => "activities",
            Self::Frequencies { .. } => "frequencies",
            Self::Queens { .. } => "queens",
            Self::Sudoku { .. } => "sudoku",
            Self::Tree { .. } => "tree",
        }
    }

    /// Build an ascending array input.
    pub fn array(values: Vec<i64>) -> Self {
        Self::Array {
            values,
            order: SortOrder::Ascending,
        }
    }
}

/// A request to run one algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Registered algorithm name (e.g., `quick_sort`, `bfs`, `avl`).
    pub algorithm: String,
    /// Algorithm input.
    pub input: RunInput,
}

impl RunRequest {
    /// Create a new request.
    pub fn new(algorithm: impl Into<String>, input: RunInput) -> Self {
        Self {
            algorithm: algorithm.into(),
            input,
        }
    }
}

/// Parse a comma- or whitespace-separated list of integers.
///
/// # Errors
/// Returns `InvalidParameter` when any token is not an integer, when the
/// list is empty, or when it exceeds [`MAX_ARRAY_LEN`].
pub fn parse_values(text: &str) -> Result<Vec<i64>> {
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>().map_err(|_| {
                StepwiseError::invalid("values", format!("'{}' is not an integer", token))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    check_array_len("values", values.len())?;
    Ok(values)
}

/// Parse a single integer search target.
///
/// # Errors
/// Returns `InvalidParameter` when the text is not an integer.
pub fn parse_target(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| StepwiseError::invalid("target", format!("'{}' is not an integer", trimmed)))
}

/// Reject empty or oversized arrays.
pub fn check_array_len(parameter: &str, len: usize) -> Result<()> {
    if len == 0 {
        return Err(StepwiseError::invalid(parameter, "must not be empty"));
    }
    if len > MAX_ARRAY_LEN {
        return Err(StepwiseError::invalid(
            parameter,
            format!("{} elements exceeds the limit of {}", len, MAX_ARRAY_LEN),
        ));
    }
    Ok(())
}
