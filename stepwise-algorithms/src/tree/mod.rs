//! Search trees: plain BST, AVL and Red-Black.
//!
//! All three share the descent, attach and successor-promotion steps in
//! [`bst`]; AVL and Red-Black add their rebalancing on top. Every visited
//! node is checkpointed during descent, followed by the structural change,
//! any rotations or recolors, and a closing `Settle`.
//!
//! A tree outlives a single run: the caller passes the previous tree in
//! [`RunInput::Tree`]'s `base`, and the result carries the new snapshot.

mod arena;
mod avl;
mod bst;
mod red_black;

pub use arena::{MAX_TREE_NODES, TreeArena};

use arena::Side;
use bst::Descent;
use std::time::Duration;
use stepwise_core::checkpoint::{Highlight, StepKind, Subject, TreeSnapshot};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::{RunOutcome, TreeResult};
use stepwise_core::params::{RunInput, TreeAction, TreeKind};
use stepwise_core::scheduler::Pacing;
use stepwise_core::types::TreeNodeId;

use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};

/// Checkpoint the whole tree.
async fn emit(
    ctx: &StepContext,
    arena: &TreeArena,
    highlight: Highlight,
    kind: StepKind,
) -> Result<u64> {
    ctx.checkpoint(Subject::Tree(arena.snapshot()), highlight, kind)
        .await
}

/// Rotate `id` down towards `side` and checkpoint it.
async fn rotate(
    ctx: &StepContext,
    arena: &mut TreeArena,
    id: TreeNodeId,
    side: Side,
) -> Result<TreeNodeId> {
    let top = arena
        .rotate(id, side)
        .ok_or_else(|| StepwiseError::TreeInvariant {
            cause: format!("cannot rotate {} {} without a {} child", id, side, side.opposite()),
        })?;
    tracing::trace!(node = %id, side = %side, "Rotated");
    emit(ctx, arena, Highlight::node(id), StepKind::Rotate).await?;
    Ok(top)
}

/// Apply one action to a tree, animating every step, and finish with a
/// `Settle` checkpoint on the affected node.
///
/// # Errors
/// Returns `InvalidParameter` when inserting into a full tree, or whatever
/// the checkpoint sink reports.
pub async fn apply_action(
    ctx: &StepContext,
    arena: &mut TreeArena,
    action: TreeAction,
) -> Result<TreeResult> {
    let result = match action {
        TreeAction::Search(value) => match bst::descend(ctx, arena, value).await? {
            Descent::Found(id) => {
                emit(ctx, arena, Highlight::node(id), StepKind::Found).await?;
                TreeResult::Found { id }
            }
            Descent::Vacant { .. } => TreeResult::NotFound,
        },
        TreeAction::Insert(value) => match bst::descend(ctx, arena, value).await? {
            Descent::Found(id) => TreeResult::Duplicate { id },
            Descent::Vacant { parent, side } => {
                let id = bst::attach(ctx, arena, value, parent, side).await?;
                match arena.kind() {
                    TreeKind::Bst => {}
                    TreeKind::Avl => avl::rebalance(ctx, arena, parent).await?,
                    TreeKind::RedBlack => red_black::insert_fixup(ctx, arena, id).await?,
                }
                TreeResult::Inserted { id }
            }
        },
        TreeAction::Delete(value) => match bst::descend(ctx, arena, value).await? {
            Descent::Found(id) => {
                let unlinked = bst::unlink(ctx, arena, id).await?;
                match arena.kind() {
                    TreeKind::Bst => {}
                    TreeKind::Avl => avl::rebalance(ctx, arena, unlinked.parent).await?,
                    TreeKind::RedBlack => red_black::delete_fixup(ctx, arena, unlinked).await?,
                }
                TreeResult::Deleted
            }
            Descent::Vacant { .. } => TreeResult::NotFound,
        },
    };

    let highlight = match result {
        TreeResult::Inserted { id } | TreeResult::Duplicate { id } | TreeResult::Found { id } => {
            Highlight::node(id)
        }
        TreeResult::Deleted | TreeResult::NotFound => Highlight::None,
    };
    emit(ctx, arena, highlight, StepKind::Settle).await?;

    tracing::debug!(
        kind = %arena.kind(),
        value = action.value(),
        nodes = arena.len(),
        "Tree action applied"
    );
    Ok(result)
}

/// A registered tree kind.
#[derive(Debug, Clone, Copy)]
pub struct TreeAlgorithm {
    kind: TreeKind,
}

impl TreeAlgorithm {
    /// Tree algorithm for one kind.
    pub fn new(kind: TreeKind) -> Self {
        Self { kind }
    }

    /// The kind this algorithm maintains.
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    fn parts<'i>(&self, input: &'i RunInput) -> Result<(TreeAction, Option<&'i TreeSnapshot>)> {
        match input {
            RunInput::Tree { tree, action, base } => {
                if *tree != self.kind {
                    return Err(StepwiseError::InputMismatch {
                        algorithm: self.kind.as_str().to_string(),
                        expected: format!("{} tree", self.kind),
                        actual: format!("{} tree", tree),
                    });
                }
                if let Some(base) = base
                    && base.kind != self.kind
                {
                    return Err(StepwiseError::TreeKindMismatch {
                        current: base.kind.to_string(),
                        requested: self.kind.to_string(),
                    });
                }
                Ok((*action, base.as_ref()))
            }
            other => Err(self.info().mismatch(other)),
        }
    }

    fn arena(&self, base: Option<&TreeSnapshot>) -> Result<TreeArena> {
        match base {
            Some(snapshot) => TreeArena::from_snapshot(snapshot),
            None => Ok(TreeArena::new(self.kind)),
        }
    }
}

impl Algorithm for TreeAlgorithm {
    fn info(&self) -> AlgorithmInfo {
        let (display, description) = match self.kind {
            TreeKind::Bst => (
                "Binary Search Tree",
                "Unbalanced insert, delete and search with successor promotion",
            ),
            TreeKind::Avl => (
                "AVL Tree",
                "Height-balanced tree restored by single and double rotations",
            ),
            TreeKind::RedBlack => (
                "Red-Black Tree",
                "Color-balanced tree with insert and delete fixups",
            ),
        };
        AlgorithmInfo::new(self.kind.as_str(), AlgorithmCategory::Tree)
            .with_display_name(display)
            .with_description(description)
            .with_input("tree")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        let (action, base) = self.parts(input)?;
        let arena = self.arena(base)?;
        if let TreeAction::Insert(value) = action
            && arena.len() >= MAX_TREE_NODES
            && arena.find(value).is_none()
        {
            return Err(StepwiseError::invalid(
                "value",
                format!("tree already holds {} nodes", MAX_TREE_NODES),
            ));
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (action, base) = self.parts(&input)?;
            let mut arena = self.arena(base)?;
            let result = apply_action(ctx, &mut arena, action).await?;
            Ok(RunOutcome::Tree {
                snapshot: arena.snapshot(),
                result,
            })
        })
    }

    fn pacing(&self, traversal_delay: Duration) -> Pacing {
        Pacing::Fixed(traversal_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::testing::TestHarness;

    fn tree_input(kind: TreeKind, action: TreeAction, base: Option<TreeSnapshot>) -> RunInput {
        RunInput::Tree {
            tree: kind,
            action,
            base,
        }
    }

    #[tokio::test]
    async fn bst_in_order_sorted_after_each_insert() {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(TreeKind::Bst);
        let mut inserted = Vec::new();
        for value in [41, 20, 65, 11, 29, 50, 91, 32, 72, 99] {
            apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
                .await
                .unwrap();
            inserted.push(value);
            inserted.sort_unstable();
            assert_eq!(arena.in_order(), inserted);
        }
    }

    #[tokio::test]
    async fn duplicate_insert_changes_nothing() {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(TreeKind::Bst);
        let first = apply_action(&harness.ctx, &mut arena, TreeAction::Insert(5))
            .await
            .unwrap();
        let again = apply_action(&harness.ctx, &mut arena, TreeAction::Insert(5))
            .await
            .unwrap();

        let TreeResult::Inserted { id } = first else {
            panic!("expected an insert, got {:?}", first);
        };
        assert_eq!(again, TreeResult::Duplicate { id });
        assert_eq!(arena.len(), 1);
    }

    #[tokio::test]
    async fn search_descends_and_reports() {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(TreeKind::Avl);
        for value in [8, 4, 12, 2, 6] {
            apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
                .await
                .unwrap();
        }

        let before = harness.sink.len();
        let hit = apply_action(&harness.ctx, &mut arena, TreeAction::Search(6))
            .await
            .unwrap();
        assert_eq!(
            hit,
            TreeResult::Found {
                id: arena.find(6).unwrap()
            }
        );
        let kinds = harness.sink.kinds()[before..].to_vec();
        assert_eq!(
            kinds,
            vec![
                StepKind::Visit,
                StepKind::Visit,
                StepKind::Visit,
                StepKind::Found,
                StepKind::Settle
            ]
        );

        let miss = apply_action(&harness.ctx, &mut arena, TreeAction::Search(7))
            .await
            .unwrap();
        assert_eq!(miss, TreeResult::NotFound);
    }

    #[tokio::test]
    async fn run_continues_from_base() {
        let harness = TestHarness::new();
        let algorithm = TreeAlgorithm::new(TreeKind::RedBlack);

        let mut base = None;
        for value in [3, 1, 4, 1, 5, 9, 2, 6] {
            let input = tree_input(TreeKind::RedBlack, TreeAction::Insert(value), base.take());
            algorithm.validate(&input).unwrap();
            match algorithm.run(&harness.ctx, input).await.unwrap() {
                RunOutcome::Tree { snapshot, .. } => base = Some(snapshot),
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        let snapshot = base.unwrap();
        assert_eq!(snapshot.in_order(), vec![1, 2, 3, 4, 5, 6, 9]);
        assert!(snapshot.nodes.iter().all(|n| n.color.is_some()));
        assert_eq!(harness.sink.last().unwrap().kind, StepKind::Settle);
    }

    #[test]
    fn validation_errors() {
        let algorithm = TreeAlgorithm::new(TreeKind::Avl);

        let err = algorithm
            .validate(&tree_input(TreeKind::Bst, TreeAction::Insert(1), None))
            .unwrap_err();
        assert_eq!(err.code(), "E102");

        let err = algorithm
            .validate(&tree_input(
                TreeKind::Avl,
                TreeAction::Insert(1),
                Some(TreeSnapshot::empty(TreeKind::RedBlack)),
            ))
            .unwrap_err();
        assert_eq!(err.code(), "E401");

        let err = algorithm
            .validate(&RunInput::Fibonacci { n: 4 })
            .unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn tree_runs_use_fixed_pacing() {
        let delay = Duration::from_millis(300);
        assert_eq!(
            TreeAlgorithm::new(TreeKind::Bst).pacing(delay),
            Pacing::Fixed(delay)
        );
    }
}
