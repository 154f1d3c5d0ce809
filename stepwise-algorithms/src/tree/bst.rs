//! Plain binary search tree steps shared by all three tree kinds.

use super::arena::{Side, TreeArena, Unlinked};
use super::emit;
use stepwise_core::checkpoint::{Highlight, StepKind};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::types::TreeNodeId;

/// Where a descent ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Descent {
    /// The value is stored at this node.
    Found(TreeNodeId),
    /// The value would hang off `parent` on `side`.
    Vacant {
        parent: Option<TreeNodeId>,
        side: Side,
    },
}

/// Walk from the root towards `value`, emitting a `Visit` at each node.
pub(super) async fn descend(
    ctx: &StepContext,
    arena: &TreeArena,
    value: i64,
) -> Result<Descent> {
    let mut parent = None;
    let mut side = Side::Left;
    let mut cursor = arena.root();

    while let Some(id) = cursor {
        emit(ctx, arena, Highlight::node(id), StepKind::Visit).await?;
        let here = arena.value(id);
        if value == here {
            return Ok(Descent::Found(id));
        }
        parent = Some(id);
        side = if value < here { Side::Left } else { Side::Right };
        cursor = arena.child(id, side);
    }

    Ok(Descent::Vacant { parent, side })
}

/// Hang a new leaf where a descent ended.
pub(super) async fn attach(
    ctx: &StepContext,
    arena: &mut TreeArena,
    value: i64,
    parent: Option<TreeNodeId>,
    side: Side,
) -> Result<TreeNodeId> {
    let id = arena.attach(value, parent, side)?;
    emit(ctx, arena, Highlight::node(id), StepKind::Attach).await?;
    Ok(id)
}

/// Remove the value held at `target`.
///
/// A node with two children takes its in-order successor's value (the walk
/// to the successor is animated, then a `Write` on `target`), and the
/// successor is spliced out instead. The `Detach` checkpoint highlights
/// whichever node now occupies the vacated position.
pub(super) async fn unlink(
    ctx: &StepContext,
    arena: &mut TreeArena,
    target: TreeNodeId,
) -> Result<Unlinked> {
    let doomed = match (arena.left(target), arena.right(target)) {
        (Some(_), Some(right)) => {
            let mut successor = right;
            emit(ctx, arena, Highlight::node(successor), StepKind::Visit).await?;
            while let Some(left) = arena.left(successor) {
                successor = left;
                emit(ctx, arena, Highlight::node(successor), StepKind::Visit).await?;
            }

            arena.set_value(target, arena.value(successor));
            emit(ctx, arena, Highlight::node(target), StepKind::Write).await?;
            successor
        }
        _ => target,
    };

    let unlinked = arena.splice(doomed);
    let highlight = unlinked
        .child
        .or(unlinked.parent)
        .map_or(Highlight::None, Highlight::node);
    emit(ctx, arena, highlight, StepKind::Detach).await?;
    Ok(unlinked)
}
