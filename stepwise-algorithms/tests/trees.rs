//! Tree invariants across many operations.

mod common;

use stepwise_algorithms::tree::{TreeArena, apply_action};
use stepwise_core::testing::TestHarness;
use stepwise_core::{
    NodeColor, RunInput, RunOutcome, StepKind, TreeAction, TreeKind, TreeResult, TreeSnapshot,
};

const KINDS: [TreeKind; 3] = [TreeKind::Bst, TreeKind::Avl, TreeKind::RedBlack];

fn balance_factors(snapshot: &TreeSnapshot) -> Vec<i64> {
    let height = |id| snapshot.node(id).map_or(0, |n| i64::from(n.height));
    snapshot
        .nodes
        .iter()
        .map(|n| n.left.map_or(0, height) - n.right.map_or(0, height))
        .collect()
}

#[tokio::test]
async fn mixed_workload_keeps_invariants() {
    let values = common::scrambled(60, 42, 100);

    for kind in KINDS {
        let harness = TestHarness::new();
        let mut arena = TreeArena::new(kind);
        let mut model = std::collections::BTreeSet::new();

        for (step, &value) in values.iter().enumerate() {
            let action = if step % 3 == 2 {
                TreeAction::Delete(values[step / 2])
            } else {
                TreeAction::Insert(value)
            };

            let result = apply_action(&harness.ctx, &mut arena, action).await.unwrap();
            match action {
                TreeAction::Insert(v) => {
                    let fresh = model.insert(v);
                    assert_eq!(fresh, matches!(result, TreeResult::Inserted { .. }));
                }
                TreeAction::Delete(v) => {
                    let present = model.remove(&v);
                    assert_eq!(present, result == TreeResult::Deleted);
                }
                TreeAction::Search(_) => unreachable!(),
            }

            arena
                .verify()
                .unwrap_or_else(|e| panic!("{} after {:?}: {}", kind, action, e));
            assert_eq!(arena.in_order(), model.iter().copied().collect::<Vec<_>>());
        }
    }
}

#[tokio::test]
async fn avl_balance_factor_bounded() {
    let harness = TestHarness::new();
    let mut arena = TreeArena::new(TreeKind::Avl);
    for value in (0..50).rev() {
        apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
            .await
            .unwrap();
        assert!(balance_factors(&arena.snapshot()).iter().all(|b| b.abs() <= 1));
    }
    for value in (0..50).step_by(3) {
        apply_action(&harness.ctx, &mut arena, TreeAction::Delete(value))
            .await
            .unwrap();
        assert!(balance_factors(&arena.snapshot()).iter().all(|b| b.abs() <= 1));
    }
}

#[tokio::test]
async fn every_tree_checkpoint_is_a_tree() {
    let (outcome, harness) = common::run(
        "red_black",
        RunInput::Tree {
            tree: TreeKind::RedBlack,
            action: TreeAction::Insert(4),
            base: None,
        },
    )
    .await;

    let RunOutcome::Tree { snapshot, result } = outcome else {
        panic!("expected a tree outcome");
    };
    assert!(matches!(result, TreeResult::Inserted { .. }));
    assert_eq!(snapshot.nodes[0].color, Some(NodeColor::Black));

    for checkpoint in harness.sink.checkpoints() {
        assert!(checkpoint.subject.as_tree().is_some());
    }
    assert_eq!(
        harness.sink.kinds(),
        vec![StepKind::Attach, StepKind::Recolor, StepKind::Settle]
    );
}

#[tokio::test]
async fn corrupted_base_is_rejected_before_running() {
    let harness = TestHarness::new();
    let mut arena = TreeArena::new(TreeKind::Avl);
    for value in [1, 2, 3] {
        apply_action(&harness.ctx, &mut arena, TreeAction::Insert(value))
            .await
            .unwrap();
    }
    let mut base = arena.snapshot();
    base.kind = TreeKind::Bst;
    base.nodes.iter_mut().for_each(|n| n.value = -n.value);

    let registry = stepwise_algorithms::AlgorithmRegistry::standard();
    let err = registry
        .get("bst")
        .unwrap()
        .validate(&RunInput::Tree {
            tree: TreeKind::Bst,
            action: TreeAction::Search(1),
            base: Some(base),
        })
        .unwrap_err();
    assert_eq!(err.code(), "E402");
}
