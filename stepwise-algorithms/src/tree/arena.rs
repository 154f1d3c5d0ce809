//! Index arena backing the search trees.
//!
//! Nodes refer to each other by [`TreeNodeId`] rather than by pointer, so
//! parent links carry no ownership. Freed slots are reused by later
//! inserts, which keeps every handle below [`MAX_TREE_NODES`].

use std::fmt;
use stepwise_core::checkpoint::{NodeColor, TreeSnapshot, TreeSnapshotNode};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::params::TreeKind;
use stepwise_core::types::TreeNodeId;

/// Largest number of live nodes a tree may hold.
pub const MAX_TREE_NODES: usize = 128;

/// A child position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// What remains after a node with at most one child is spliced out.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Unlinked {
    /// Parent of the removed node.
    pub parent: Option<TreeNodeId>,
    /// The child that took its place.
    pub child: Option<TreeNodeId>,
    /// Color the removed node had.
    pub color: NodeColor,
}

#[derive(Debug, Clone)]
struct Node {
    value: i64,
    left: Option<TreeNodeId>,
    right: Option<TreeNodeId>,
    parent: Option<TreeNodeId>,
    height: u32,
    color: NodeColor,
    live: bool,
}

impl Node {
    fn vacant() -> Self {
        Self {
            value: 0,
            left: None,
            right: None,
            parent: None,
            height: 0,
            color: NodeColor::Black,
            live: false,
        }
    }
}

fn broken(cause: impl Into<String>) -> StepwiseError {
    StepwiseError::TreeInvariant {
        cause: cause.into(),
    }
}

/// A binary search tree stored in a vector of slots.
#[derive(Debug, Clone)]
pub struct TreeArena {
    kind: TreeKind,
    nodes: Vec<Node>,
    root: Option<TreeNodeId>,
    len: usize,
}

impl TreeArena {
    /// An empty tree.
    pub fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Rebuild a tree from a snapshot, checking every structural invariant
    /// of its kind. Heights are recomputed rather than trusted.
    ///
    /// # Errors
    /// Returns `TreeInvariant` when the snapshot is not a valid tree.
    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Result<Self> {
        if snapshot.nodes.len() > MAX_TREE_NODES {
            return Err(broken(format!(
                "{} nodes exceeds the limit of {}",
                snapshot.nodes.len(),
                MAX_TREE_NODES
            )));
        }

        let mut arena = Self::new(snapshot.kind);
        for node in &snapshot.nodes {
            let index = node.id.index();
            if index >= MAX_TREE_NODES {
                return Err(broken(format!("{} is out of range", node.id)));
            }
            if arena.nodes.len() <= index {
                arena.nodes.resize(index + 1, Node::vacant());
            }
            if arena.nodes[index].live {
                return Err(broken(format!("{} appears twice", node.id)));
            }
            let color = match (snapshot.kind, node.color) {
                (TreeKind::RedBlack, Some(color)) => color,
                (TreeKind::RedBlack, None) => {
                    return Err(broken(format!("{} has no color", node.id)));
                }
                _ => NodeColor::Black,
            };
            arena.nodes[index] = Node {
                value: node.value,
                left: node.left,
                right: node.right,
                parent: node.parent,
                height: node.height,
                color,
                live: true,
            };
            arena.len += 1;
        }
        arena.root = snapshot.root;

        arena.check_structure()?;
        arena.recompute_heights();
        arena.verify()?;
        Ok(arena)
    }

    /// Owned copy of the live nodes. Colors are only included for
    /// Red-Black trees.
    pub fn snapshot(&self) -> TreeSnapshot {
        let with_color = self.kind == TreeKind::RedBlack;
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.live)
            .map(|(index, node)| TreeSnapshotNode {
                id: TreeNodeId::new(index as u32),
                value: node.value,
                left: node.left,
                right: node.right,
                parent: node.parent,
                height: node.height,
                color: with_color.then_some(node.color),
            })
            .collect();

        TreeSnapshot {
            kind: self.kind,
            root: self.root,
            nodes,
        }
    }

    /// Balancing discipline.
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Root handle.
    pub fn root(&self) -> Option<TreeNodeId> {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, id: TreeNodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: TreeNodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn is_live(&self, id: TreeNodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.live)
    }

    /// Value stored at a node.
    pub fn value(&self, id: TreeNodeId) -> i64 {
        self.node(id).value
    }

    /// Left child.
    pub fn left(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.node(id).left
    }

    /// Right child.
    pub fn right(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.node(id).right
    }

    /// Parent.
    pub fn parent(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.node(id).parent
    }

    pub(crate) fn child(&self, id: TreeNodeId, side: Side) -> Option<TreeNodeId> {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    /// Subtree height; an absent node has height 0.
    pub fn height(&self, id: Option<TreeNodeId>) -> u32 {
        id.map_or(0, |id| self.node(id).height)
    }

    /// Left height minus right height.
    pub fn balance(&self, id: TreeNodeId) -> i64 {
        i64::from(self.height(self.left(id))) - i64::from(self.height(self.right(id)))
    }

    /// Node color; absent nodes count as black.
    pub fn color(&self, id: Option<TreeNodeId>) -> NodeColor {
        id.map_or(NodeColor::Black, |id| self.node(id).color)
    }

    /// Whether a (possibly absent) node is red.
    pub fn is_red(&self, id: Option<TreeNodeId>) -> bool {
        self.color(id) == NodeColor::Red
    }

    pub(crate) fn set_color(&mut self, id: TreeNodeId, color: NodeColor) {
        self.node_mut(id).color = color;
    }

    pub(crate) fn set_value(&mut self, id: TreeNodeId, value: i64) {
        self.node_mut(id).value = value;
    }

    /// Locate a value without animating the descent.
    pub fn find(&self, value: i64) -> Option<TreeNodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let here = self.value(id);
            if value == here {
                return Some(id);
            }
            cursor = if value < here {
                self.left(id)
            } else {
                self.right(id)
            };
        }
        None
    }

    /// Values in in-order sequence.
    pub fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut cursor = self.root;
        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.left(id);
            }
            if let Some(id) = stack.pop() {
                out.push(self.value(id));
                cursor = self.right(id);
            }
        }
        out
    }

    /// Link a new leaf under `parent` (or as the root). Red-Black leaves
    /// start red; every other kind stores black.
    pub(crate) fn attach(
        &mut self,
        value: i64,
        parent: Option<TreeNodeId>,
        side: Side,
    ) -> Result<TreeNodeId> {
        if self.len >= MAX_TREE_NODES {
            return Err(StepwiseError::invalid(
                "value",
                format!("tree already holds {} nodes", MAX_TREE_NODES),
            ));
        }

        let color = match self.kind {
            TreeKind::RedBlack => NodeColor::Red,
            _ => NodeColor::Black,
        };
        let node = Node {
            value,
            left: None,
            right: None,
            parent,
            height: 1,
            color,
            live: true,
        };

        let index = match self.nodes.iter().position(|n| !n.live) {
            Some(index) => {
                self.nodes[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        let id = TreeNodeId::new(index as u32);
        self.len += 1;

        match parent {
            None => self.root = Some(id),
            Some(p) => match side {
                Side::Left => self.node_mut(p).left = Some(id),
                Side::Right => self.node_mut(p).right = Some(id),
            },
        }
        self.refresh_heights(parent);
        Ok(id)
    }

    /// Remove a node that has at most one child, promoting that child.
    pub(crate) fn splice(&mut self, id: TreeNodeId) -> Unlinked {
        let node = self.node(id);
        let child = node.left.or(node.right);
        let parent = node.parent;
        let color = node.color;

        self.replace_child(parent, id, child);
        self.nodes[id.index()] = Node::vacant();
        self.len -= 1;
        self.refresh_heights(parent);

        Unlinked {
            parent,
            child,
            color,
        }
    }

    /// Point `parent`'s link to `old` at `new` instead.
    fn replace_child(
        &mut self,
        parent: Option<TreeNodeId>,
        old: TreeNodeId,
        new: Option<TreeNodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.left(p) == Some(old) {
                    self.node_mut(p).left = new;
                } else {
                    self.node_mut(p).right = new;
                }
            }
        }
        if let Some(n) = new {
            self.node_mut(n).parent = parent;
        }
    }

    /// Rotate `id` down towards `side`, returning the node that took its
    /// place, or `None` when the opposite child is missing.
    pub(crate) fn rotate(&mut self, id: TreeNodeId, side: Side) -> Option<TreeNodeId> {
        match side {
            Side::Left => self.rotate_left(id),
            Side::Right => self.rotate_right(id),
        }
    }

    fn rotate_left(&mut self, id: TreeNodeId) -> Option<TreeNodeId> {
        let pivot = self.right(id)?;

        let inner = self.left(pivot);
        self.node_mut(id).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }

        let parent = self.parent(id);
        self.replace_child(parent, id, Some(pivot));

        self.node_mut(pivot).left = Some(id);
        self.node_mut(id).parent = Some(pivot);

        self.refresh_heights(Some(id));
        Some(pivot)
    }

    fn rotate_right(&mut self, id: TreeNodeId) -> Option<TreeNodeId> {
        let pivot = self.left(id)?;

        let inner = self.right(pivot);
        self.node_mut(id).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }

        let parent = self.parent(id);
        self.replace_child(parent, id, Some(pivot));

        self.node_mut(pivot).right = Some(id);
        self.node_mut(id).parent = Some(pivot);

        self.refresh_heights(Some(id));
        Some(pivot)
    }

    /// Recompute heights from `start` up to the root.
    fn refresh_heights(&mut self, start: Option<TreeNodeId>) {
        let mut cursor = start;
        while let Some(id) = cursor {
            let height = 1 + self.height(self.left(id)).max(self.height(self.right(id)));
            self.node_mut(id).height = height;
            cursor = self.parent(id);
        }
    }

    fn recompute_heights(&mut self) {
        let mut preorder = Vec::with_capacity(self.len);
        let mut stack: Vec<TreeNodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            preorder.push(id);
            stack.extend(self.left(id));
            stack.extend(self.right(id));
        }
        for id in preorder.into_iter().rev() {
            let height = 1 + self.height(self.left(id)).max(self.height(self.right(id)));
            self.node_mut(id).height = height;
        }
    }

    /// Links point at live nodes, parent links agree with child links and
    /// every live node is reachable from the root exactly once.
    fn check_structure(&self) -> Result<()> {
        match self.root {
            None if self.len > 0 => {
                return Err(broken(format!("{} nodes but no root", self.len)));
            }
            Some(root) if !self.is_live(root) => {
                return Err(broken(format!("root {} does not exist", root)));
            }
            Some(root) if self.parent(root).is_some() => {
                return Err(broken(format!("root {} has a parent", root)));
            }
            _ => {}
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut reached = 0;
        let mut stack: Vec<TreeNodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if seen[id.index()] {
                return Err(broken(format!("{} is reachable twice", id)));
            }
            seen[id.index()] = true;
            reached += 1;

            for child in [self.left(id), self.right(id)].into_iter().flatten() {
                if !self.is_live(child) {
                    return Err(broken(format!("{} links to missing {}", id, child)));
                }
                if self.parent(child) != Some(id) {
                    return Err(broken(format!("{} does not point back to {}", child, id)));
                }
                stack.push(child);
            }
        }

        if reached != self.len {
            return Err(broken(format!(
                "{} of {} nodes reachable from the root",
                reached, self.len
            )));
        }
        Ok(())
    }

    /// Check every invariant of this tree's kind.
    ///
    /// # Errors
    /// Returns `TreeInvariant` naming the first violation found.
    pub fn verify(&self) -> Result<()> {
        self.check_structure()?;

        let values = self.in_order();
        if let Some(pair) = values.windows(2).find(|w| w[0] >= w[1]) {
            return Err(broken(format!(
                "values out of order: {} before {}",
                pair[0], pair[1]
            )));
        }

        for (index, node) in self.nodes.iter().enumerate().filter(|(_, n)| n.live) {
            let expected = 1 + self.height(node.left).max(self.height(node.right));
            if node.height != expected {
                return Err(broken(format!(
                    "node_{} records height {}, expected {}",
                    index, node.height, expected
                )));
            }
        }

        match self.kind {
            TreeKind::Bst => Ok(()),
            TreeKind::Avl => self.check_avl(),
            TreeKind::RedBlack => self.check_red_black(),
        }
    }

    fn check_avl(&self) -> Result<()> {
        for (index, node) in self.nodes.iter().enumerate().filter(|(_, n)| n.live) {
            let balance =
                i64::from(self.height(node.left)) - i64::from(self.height(node.right));
            if !(-1..=1).contains(&balance) {
                return Err(broken(format!(
                    "node_{} has balance factor {}",
                    index, balance
                )));
            }
        }
        Ok(())
    }

    fn check_red_black(&self) -> Result<()> {
        if self.is_red(self.root) {
            return Err(broken("root is red"));
        }
        for (index, node) in self.nodes.iter().enumerate().filter(|(_, n)| n.live) {
            if node.color == NodeColor::Red && (self.is_red(node.left) || self.is_red(node.right))
            {
                return Err(broken(format!("red node_{} has a red child", index)));
            }
        }
        self.black_height(self.root).map(|_| ())
    }

    fn black_height(&self, id: Option<TreeNodeId>) -> Result<u32> {
        let Some(id) = id else {
            return Ok(1);
        };
        let left = self.black_height(self.left(id))?;
        let right = self.black_height(self.right(id))?;
        if left != right {
            return Err(broken(format!(
                "{} has black heights {} and {}",
                id, left, right
            )));
        }
        Ok(left + u32::from(self.color(Some(id)) == NodeColor::Black))
    }
}
