//! Checkpoints and the subjects they carry.
//!
//! A [`Checkpoint`] is an owned copy of an algorithm's primary subject at one
//! animated step, plus a highlight and a [`StepKind`] naming the transition.
//! Checkpoints never borrow from the algorithm's working storage: every
//! [`Subject`] variant owns its data, so the algorithm is free to keep
//! mutating its buffers after emitting.

use crate::params::TreeKind;
use crate::types::{Generation, RunId, TreeNodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of transition a checkpoint represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Two positions are being compared; nothing has moved yet.
    Compare,
    /// Two positions were swapped.
    Swap,
    /// One position was overwritten.
    Write,
    /// A range was split at the highlighted index.
    Divide,
    /// A search probed the highlighted index.
    Probe,
    /// A search located its target.
    Found,
    /// A graph node came under the cursor ahead of its visited check.
    Dequeue,
    /// A graph or tree node was visited.
    Visit,
    /// A DP table cell was written.
    Fill,
    /// A greedy choice was accepted.
    Accept,
    /// Two Huffman nodes were merged.
    Merge,
    /// A backtracking search placed a piece.
    Place,
    /// A backtracking search removed a piece.
    Remove,
    /// A backtracking search completed a solution.
    Solved,
    /// A backtracking search ran out of candidates.
    Exhausted,
    /// A tree node was attached.
    Attach,
    /// A tree node was detached.
    Detach,
    /// A tree rotation was applied around the highlighted node.
    Rotate,
    /// A tree node changed color.
    Recolor,
    /// The tree settled after an operation.
    Settle,
    /// The algorithm finished; no highlight.
    Final,
}

impl StepKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compare => "compare",
            Self::Swap => "swap",
            Self::Write => "write",
            Self::Divide => "divide",
            Self::Probe => "probe",
            Self::Found => "found",
            Self::Dequeue => "dequeue",
            Self::Visit => "visit",
            Self::Fill => "fill",
            Self::Accept => "accept",
            Self::Merge => "merge",
            Self::Place => "place",
            Self::Remove => "remove",
            Self::Solved => "solved",
            Self::Exhausted => "exhausted",
            Self::Attach => "attach",
            Self::Detach => "detach",
            Self::Rotate => "rotate",
            Self::Recolor => "recolor",
            Self::Settle => "settle",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the presentation layer should draw attention to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Highlight {
    /// Nothing highlighted.
    #[default]
    None,
    /// A single array index.
    Index {
        /// The index.
        index: usize,
    },
    /// A pair of array indices.
    Pair {
        /// First index.
        first: usize,
        /// Second index.
        second: usize,
    },
    /// A board or table cell.
    Cell {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },
    /// A named graph vertex.
    Vertex {
        /// Vertex name.
        name: String,
    },
    /// A tree node.
    Node {
        /// Node handle.
        id: TreeNodeId,
    },
}

impl Highlight {
    /// Highlight one index.
    pub fn index(index: usize) -> Self {
        Self::Index { index }
    }

    /// Highlight two indices.
    pub fn pair(first: usize, second: usize) -> Self {
        Self::Pair { first, second }
    }

    /// Highlight one cell.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::Cell { row, col }
    }

    /// Highlight a graph vertex.
    pub fn vertex(name: impl Into<String>) -> Self {
        Self::Vertex { name: name.into() }
    }

    /// Highlight a tree node.
    pub fn node(id: TreeNodeId) -> Self {
        Self::Node { id }
    }

    /// Whether anything is highlighted.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A single activity for activity selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Display name.
    pub name: String,
    /// Start time.
    pub start: i64,
    /// Finish time.
    pub finish: i64,
}

impl Activity {
    /// Create a new activity.
    pub fn new(name: impl Into<String>, start: i64, finish: i64) -> Self {
        Self {
            name: name.into(),
            start,
            finish,
        }
    }
}

/// A node of a Huffman coding tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanNode {
    /// Symbol for leaves; `None` for internal nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Combined frequency of the subtree.
    pub weight: u64,
    /// Left child (bit `0`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<HuffmanNode>>,
    /// Right child (bit `1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<HuffmanNode>>,
}

impl HuffmanNode {
    /// Create a leaf.
    pub fn leaf(symbol: impl Into<String>, weight: u64) -> Self {
        Self {
            symbol: Some(symbol.into()),
            weight,
            left: None,
            right: None,
        }
    }

    /// Create an internal node over two subtrees.
    ///
    /// Returns `None` when the combined weight does not fit in a `u64`.
    pub fn merge(left: HuffmanNode, right: HuffmanNode) -> Option<Self> {
        let weight = left.weight.checked_add(right.weight)?;
        Some(Self {
            symbol: None,
            weight,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        })
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Graph traversal progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TraversalFrame {
    /// Vertex currently under the cursor.
    pub current: Option<String>,
    /// Vertices in visitation order.
    pub visited: Vec<String>,
    /// Pending vertices (BFS queue front first, DFS call stack bottom first).
    pub frontier: Vec<String>,
}

/// Red-Black node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeColor {
    /// Red node.
    Red,
    /// Black node.
    Black,
}

/// One node in a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshotNode {
    /// Arena handle.
    pub id: TreeNodeId,
    /// Stored value.
    pub value: i64,
    /// Left child.
    pub left: Option<TreeNodeId>,
    /// Right child.
    pub right: Option<TreeNodeId>,
    /// Parent.
    pub parent: Option<TreeNodeId>,
    /// Subtree height (leaf = 1).
    pub height: u32,
    /// Color, for Red-Black trees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<NodeColor>,
}

/// Owned copy of a tree's live nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Balancing discipline of the tree.
    pub kind: TreeKind,
    /// Root handle.
    pub root: Option<TreeNodeId>,
    /// Live nodes, in arena order.
    pub nodes: Vec<TreeSnapshotNode>,
}

impl TreeSnapshot {
    /// An empty tree of the given kind.
    pub fn empty(kind: TreeKind) -> Self {
        Self {
            kind,
            root: None,
            nodes: Vec::new(),
        }
    }

    /// Look up a node by handle.
    pub fn node(&self, id: TreeNodeId) -> Option<&TreeSnapshotNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Values in in-order sequence.
    pub fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.node(id).and_then(|n| n.left);
            }
            if let Some(id) = stack.pop()
                && let Some(node) = self.node(id)
            {
                out.push(node.value);
                cursor = node.right;
            }
        }
        out
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The primary subject of a visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Subject {
    /// Nothing loaded yet.
    #[default]
    Empty,
    /// A flat array (sorting, searching, 1-D DP tables).
    Array(Vec<i64>),
    /// A 2-D DP table.
    Table(Vec<Vec<i64>>),
    /// A board (N-Queens cells are 0/1, Sudoku cells are digits).
    Board(Vec<Vec<u8>>),
    /// Graph traversal progress.
    Traversal(TraversalFrame),
    /// Selected activities so far.
    Activities(Vec<Activity>),
    /// Huffman working list.
    Huffman(Vec<HuffmanNode>),
    /// A binary search tree.
    Tree(TreeSnapshot),
}

impl Subject {
    /// Get the variant name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Array(_) => "array",
            Self::Table(_) => "table",
            Self::Board(_) => "board",
            Self::Traversal(_) => "traversal",
            Self::Activities(_) => "activities",
            Self::Huffman(_) => "huffman",
            Self::Tree(_) => "tree",
        }
    }

    /// Borrow the array, if this is one.
    pub fn as_array(&self) -> Option<&[i64]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Borrow the table, if this is one.
    pub fn as_table(&self) -> Option<&[Vec<i64>]> {
        match self {
            Self::Table(rows) => Some(rows),
            _ => None,
        }
    }

    /// Borrow the board, if this is one.
    pub fn as_board(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Board(rows) => Some(rows),
            _ => None,
        }
    }

    /// Borrow the tree, if this is one.
    pub fn as_tree(&self) -> Option<&TreeSnapshot> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

/// One animated step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Run that produced this checkpoint.
    pub run_id: RunId,
    /// Generation the run was started under.
    pub generation: Generation,
    /// Position in the run's checkpoint stream, starting at 0.
    pub seq: u64,
    /// Transition kind.
    pub kind: StepKind,
    /// Owned copy of the subject.
    pub subject: Subject,
    /// Highlight metadata.
    pub highlight: Highlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u32, value: i64, left: Option<u32>, right: Option<u32>) -> TreeSnapshotNode {
        TreeSnapshotNode {
            id: TreeNodeId::new(id),
            value,
            left: left.map(TreeNodeId::new),
            right: right.map(TreeNodeId::new),
            parent: None,
            height: 1,
            color: None,
        }
    }

    #[test]
    fn tree_snapshot_in_order() {
        let tree = TreeSnapshot {
            kind: TreeKind::Bst,
            root: Some(TreeNodeId::new(0)),
            nodes: vec![
                leaf(0, 10, Some(1), Some(2)),
                leaf(1, 5, None, Some(3)),
                leaf(2, 20, None, None),
                leaf(3, 7, None, None),
            ],
        };
        assert_eq!(tree.in_order(), vec![5, 7, 10, 20]);
        assert_eq!(tree.len(), 4);
        assert!(TreeSnapshot::empty(TreeKind::Avl).in_order().is_empty());
    }

    #[test]
    fn huffman_merge_sums_weights() {
        let merged =
            HuffmanNode::merge(HuffmanNode::leaf("a", 3), HuffmanNode::leaf("b", 4)).unwrap();
        assert_eq!(merged.weight, 7);
        assert!(!merged.is_leaf());
        assert!(merged.symbol.is_none());

        let heavy = HuffmanNode::merge(HuffmanNode::leaf("a", u64::MAX), HuffmanNode::leaf("b", 1));
        assert!(heavy.is_none());
    }

    #[test]
    fn subject_serializes_with_tag() {
        let json = serde_json::to_string(&Subject::Array(vec![3, 1])).unwrap();
        assert_eq!(json, r#"{"type":"array","data":[3,1]}"#);

        let json = serde_json::to_string(&Highlight::pair(0, 1)).unwrap();
        assert_eq!(json, r#"{"type":"pair","first":0,"second":1}"#);
    }
}
