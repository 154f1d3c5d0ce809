use super::{Graph, Walk};
use std::collections::VecDeque;
use stepwise_core::checkpoint::StepKind;
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;

/// Breadth-first traversal.
///
/// Every dequeue is checkpointed before the visited check, so a vertex
/// queued twice shows up twice as `Dequeue` but only once as `Visit`.
pub async fn breadth_first(ctx: &StepContext, graph: &Graph, start: &str) -> Result<Vec<String>> {
    let mut walk = Walk::default();
    let mut queue: VecDeque<String> = VecDeque::from([start.to_string()]);

    while let Some(vertex) = queue.pop_front() {
        walk.emit(ctx, &vertex, queue.iter().cloned().collect(), StepKind::Dequeue)
            .await?;

        if !walk.visit(&vertex) {
            continue;
        }

        for neighbor in graph.neighbors(&vertex) {
            if !walk.seen(neighbor) {
                queue.push_back(neighbor.clone());
            }
        }
        walk.emit(ctx, &vertex, queue.iter().cloned().collect(), StepKind::Visit)
            .await?;
    }

    tracing::debug!(visited = walk.order.len(), "Breadth-first traversal finished");
    Ok(walk.order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::params::GraphEdge;
    use stepwise_core::testing::TestHarness;

    fn diamond() -> Graph {
        let nodes: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        Graph::build(
            &nodes,
            &[
                GraphEdge::new("a", "b"),
                GraphEdge::new("a", "c"),
                GraphEdge::new("b", "d"),
                GraphEdge::new("c", "d"),
                GraphEdge::new("d", "a"),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn visits_level_by_level() {
        let harness = TestHarness::new();
        let order = breadth_first(&harness.ctx, &diamond(), "a").await.unwrap();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert_eq!(harness.sink.count(StepKind::Visit), 4);
    }

    #[tokio::test]
    async fn duplicate_enqueue_dequeues_twice() {
        let harness = TestHarness::new();
        breadth_first(&harness.ctx, &diamond(), "a").await.unwrap();
        // d is queued by both b and c before it is visited.
        assert_eq!(harness.sink.count(StepKind::Dequeue), 5);
        assert_eq!(harness.sink.kinds()[0], StepKind::Dequeue);
    }

    #[tokio::test]
    async fn unreachable_vertices_are_skipped() {
        let harness = TestHarness::new();
        let order = breadth_first(&harness.ctx, &diamond(), "d").await.unwrap();
        assert_eq!(order, vec!["d", "a", "b", "c"]);

        let nodes = vec!["x".to_string(), "y".to_string()];
        let lonely = Graph::build(&nodes, &[]).unwrap();
        let harness = TestHarness::new();
        let order = breadth_first(&harness.ctx, &lonely, "y").await.unwrap();
        assert_eq!(order, vec!["y"]);
    }
}
