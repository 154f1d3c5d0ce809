//! Red-Black fixups.
//!
//! New nodes arrive red. After an insert, a red parent is resolved by
//! recoloring when the uncle is red and by rotating when it is black; the
//! root is forced black at the end. After a delete, removing a black node
//! leaves a double-black position that is pushed up or absorbed by the
//! usual four sibling cases.

use super::arena::{Side, TreeArena, Unlinked};
use super::{emit, rotate};
use stepwise_core::checkpoint::{Highlight, NodeColor, StepKind};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::types::TreeNodeId;

/// Change a node's color, checkpointing only when it actually changes.
async fn recolor(
    ctx: &StepContext,
    arena: &mut TreeArena,
    id: TreeNodeId,
    color: NodeColor,
) -> Result<()> {
    if arena.color(Some(id)) == color {
        return Ok(());
    }
    arena.set_color(id, color);
    emit(ctx, arena, Highlight::node(id), StepKind::Recolor).await?;
    Ok(())
}

/// Restore the red rules after attaching the red leaf `node`.
pub(super) async fn insert_fixup(
    ctx: &StepContext,
    arena: &mut TreeArena,
    mut node: TreeNodeId,
) -> Result<()> {
    while let Some(parent) = arena.parent(node)
        && arena.is_red(Some(parent))
    {
        let Some(grandparent) = arena.parent(parent) else {
            break;
        };
        let side = if arena.left(grandparent) == Some(parent) {
            Side::Left
        } else {
            Side::Right
        };
        let uncle = arena.child(grandparent, side.opposite());

        if let Some(uncle) = uncle
            && arena.is_red(Some(uncle))
        {
            recolor(ctx, arena, parent, NodeColor::Black).await?;
            recolor(ctx, arena, uncle, NodeColor::Black).await?;
            recolor(ctx, arena, grandparent, NodeColor::Red).await?;
            node = grandparent;
            continue;
        }

        // An inner grandchild is first rotated to the outside.
        if arena.child(parent, side.opposite()) == Some(node) {
            node = parent;
            rotate(ctx, arena, node, side).await?;
        }

        let Some(parent) = arena.parent(node) else {
            break;
        };
        let Some(grandparent) = arena.parent(parent) else {
            break;
        };
        recolor(ctx, arena, parent, NodeColor::Black).await?;
        recolor(ctx, arena, grandparent, NodeColor::Red).await?;
        rotate(ctx, arena, grandparent, side.opposite()).await?;
    }

    if let Some(root) = arena.root() {
        recolor(ctx, arena, root, NodeColor::Black).await?;
    }
    Ok(())
}

/// Restore the black-height rule after a splice.
pub(super) async fn delete_fixup(
    ctx: &StepContext,
    arena: &mut TreeArena,
    unlinked: Unlinked,
) -> Result<()> {
    if unlinked.color == NodeColor::Red {
        return Ok(());
    }

    let mut node = unlinked.child;
    let mut parent = unlinked.parent;

    while let Some(p) = parent
        && !arena.is_red(node)
    {
        // A black node was removed from this side, so the sibling exists.
        let side = if node == arena.left(p) {
            Side::Left
        } else {
            Side::Right
        };
        let Some(mut sibling) = arena.child(p, side.opposite()) else {
            break;
        };

        if arena.is_red(Some(sibling)) {
            recolor(ctx, arena, sibling, NodeColor::Black).await?;
            recolor(ctx, arena, p, NodeColor::Red).await?;
            rotate(ctx, arena, p, side).await?;
            let Some(next) = arena.child(p, side.opposite()) else {
                break;
            };
            sibling = next;
        }

        let near = arena.child(sibling, side);
        let far = arena.child(sibling, side.opposite());

        if !arena.is_red(near) && !arena.is_red(far) {
            recolor(ctx, arena, sibling, NodeColor::Red).await?;
            node = Some(p);
            parent = arena.parent(p);
            continue;
        }

        if !arena.is_red(far) {
            if let Some(near) = near {
                recolor(ctx, arena, near, NodeColor::Black).await?;
            }
            recolor(ctx, arena, sibling, NodeColor::Red).await?;
            rotate(ctx, arena, sibling, side.opposite()).await?;
            let Some(next) = arena.child(p, side.opposite()) else {
                break;
            };
            sibling = next;
        }

        let parent_color = arena.color(Some(p));
        recolor(ctx, arena, sibling, parent_color).await?;
        recolor(ctx, arena, p, NodeColor::Black).await?;
        if let Some(far) = arena.child(sibling, side.opposite()) {
            recolor(ctx, arena, far, NodeColor::Black).await?;
        }
        rotate(ctx, arena, p, side).await?;
        node = arena.root();
        parent = None;
    }

    if let Some(node) = node {
        recolor(ctx, arena, node, NodeColor::Black).await?;
    }
    Ok(())
}
