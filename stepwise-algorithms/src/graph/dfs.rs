use super::{Graph, Walk};
use stepwise_core::checkpoint::StepKind;
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;

/// Depth-first traversal.
///
/// The frontier in each checkpoint is the current recursion path. An edge
/// into a vertex that is already visited still moves the cursor there with a
/// `Dequeue` checkpoint before the traversal backs off.
pub async fn depth_first(ctx: &StepContext, graph: &Graph, start: &str) -> Result<Vec<String>> {
    let mut walk = Walk::default();
    let mut path = Vec::new();
    enter(ctx, graph, start, &mut walk, &mut path).await?;
    tracing::debug!(visited = walk.order.len(), "Depth-first traversal finished");
    Ok(walk.order)
}

fn enter<'a>(
    ctx: &'a StepContext,
    graph: &'a Graph,
    vertex: &'a str,
    walk: &'a mut Walk,
    path: &'a mut Vec<String>,
) -> StepFuture<'a, ()> {
    Box::pin(async move {
        walk.visit(vertex);
        path.push(vertex.to_string());
        walk.emit(ctx, vertex, path.clone(), StepKind::Visit).await?;

        for neighbor in graph.neighbors(vertex) {
            if walk.seen(neighbor) {
                walk.emit(ctx, neighbor, path.clone(), StepKind::Dequeue).await?;
            } else {
                enter(ctx, graph, neighbor, &mut *walk, &mut *path).await?;
            }
        }

        path.pop();
        Ok(())
    })
}
