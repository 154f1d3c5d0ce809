//! AVL rebalancing.

use super::arena::{Side, TreeArena};
use super::rotate;
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::types::TreeNodeId;

/// Walk from `start` to the root, restoring the balance factor of every
/// node on the way with single or double rotations.
///
/// Heights are already current when this runs; the arena refreshes them on
/// every link change.
pub(super) async fn rebalance(
    ctx: &StepContext,
    arena: &mut TreeArena,
    start: Option<TreeNodeId>,
) -> Result<()> {
    let mut cursor = start;
    while let Some(id) = cursor {
        let top = balance_at(ctx, arena, id).await?;
        cursor = arena.parent(top);
    }
    Ok(())
}

/// Fix one node; returns the root of its subtree afterwards.
async fn balance_at(ctx: &StepContext, arena: &mut TreeArena, id: TreeNodeId) -> Result<TreeNodeId> {
    let balance = arena.balance(id);

    if balance > 1 {
        // LR: straighten the left child first.
        if let Some(left) = arena.left(id)
            && arena.balance(left) < 0
        {
            rotate(ctx, arena, left, Side::Left).await?;
        }
        return rotate(ctx, arena, id, Side::Right).await;
    }

    if balance < -1 {
        // RL
        if let Some(right) = arena.right(id)
            && arena.balance(right) > 0
        {
            rotate(ctx, arena, right, Side::Right).await?;
        }
        return rotate(ctx, arena, id, Side::Left).await;
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::super::apply_action;
    use super::*;
    use stepwise_core::checkpoint::StepKind;
    use stepwise_core::params::{TreeAction, TreeKind};
    use stepwise_core::testing::TestHarness;

    #[tokio::test]
    async fn ascending_inserts_stay_balanced() {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(TreeKind::Avl);
        for value in 1..=15 {
            apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
                .await
                .unwrap();
            arena.verify().unwrap();
        }
        // A perfect tree of 15 nodes.
        assert_eq!(arena.height(arena.root()), 4);
        assert_eq!(arena.value(arena.root().unwrap()), 8);
        assert!(harness.sink.count(StepKind::Rotate) > 0);
    }

    #[tokio::test]
    async fn double_rotation_for_zigzag() {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(TreeKind::Avl);
        for value in [30, 10, 20] {
            apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
                .await
                .unwrap();
        }
        assert_eq!(arena.value(arena.root().unwrap()), 20);
        assert_eq!(harness.sink.count(StepKind::Rotate), 2);
        arena.verify().unwrap();
    }

    #[tokio::test]
    async fn deletes_rebalance() {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(TreeKind::Avl);
        for value in [50, 25, 75, 10, 30, 60, 80, 5, 15, 27, 1] {
            apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
                .await
                .unwrap();
        }
        for value in [80, 75, 60, 50, 25] {
            apply_action(&harness.ctx, &mut arena, TreeAction::Delete(value))
                .await
                .unwrap();
            arena.verify().unwrap();
        }
        assert_eq!(arena.in_order(), vec![1, 5, 10, 15, 27, 30]);
    }
}
