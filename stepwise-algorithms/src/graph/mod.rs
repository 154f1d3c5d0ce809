//! Graph traversals over a directed adjacency list.
//!
//! The graph is built from a vertex list and `from -> to` edges; edges are
//! never mirrored. Neighbors are visited in edge-list order. Both traversals
//! keep a visited set, so cycles and repeated edges are harmless.

mod bfs;
mod dfs;

pub use bfs::breadth_first;
pub use dfs::depth_first;

use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use std::collections::{HashMap, HashSet};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject, TraversalFrame};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{GraphEdge, RunInput};

/// Largest accepted vertex count.
pub const MAX_VERTICES: usize = 200;

/// Directed graph keyed by vertex name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertices: Vec<String>,
    adjacency: HashMap<String, Vec<String>>,
}

impl Graph {
    /// Build a graph, rejecting unknown endpoints and duplicate vertices.
    ///
    /// # Errors
    /// Returns `InvalidParameter` naming the offending vertex.
    pub fn build(vertices: &[String], edges: &[GraphEdge]) -> Result<Self> {
        if vertices.is_empty() {
            return Err(StepwiseError::invalid("nodes", "must not be empty"));
        }
        crate::input::check_at_most("nodes", vertices.len(), MAX_VERTICES)?;

        let mut adjacency: HashMap<String, Vec<String>> = HashMap::with_capacity(vertices.len());
        for vertex in vertices {
            if adjacency.insert(vertex.clone(), Vec::new()).is_some() {
                return Err(StepwiseError::invalid(
                    "nodes",
                    format!("vertex '{}' is listed twice", vertex),
                ));
            }
        }

        for edge in edges {
            if !adjacency.contains_key(&edge.to) {
                return Err(StepwiseError::invalid(
                    "edges",
                    format!("edge {} -> {} targets an unknown vertex", edge.from, edge.to),
                ));
            }
            match adjacency.get_mut(&edge.from) {
                Some(neighbors) => neighbors.push(edge.to.clone()),
                None => {
                    return Err(StepwiseError::invalid(
                        "edges",
                        format!("edge {} -> {} starts at an unknown vertex", edge.from, edge.to),
                    ));
                }
            }
        }

        Ok(Self {
            vertices: vertices.to_vec(),
            adjacency,
        })
    }

    /// Outgoing neighbors of a vertex, in edge order.
    pub fn neighbors(&self, vertex: &str) -> &[String] {
        self.adjacency.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the vertex exists.
    pub fn contains(&self, vertex: &str) -> bool {
        self.adjacency.contains_key(vertex)
    }

    /// Vertices in declaration order.
    pub fn vertices(&self) -> &[String] {
        &self.vertices
    }
}

/// Which traversal to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalKind {
    /// Queue-driven, level by level.
    BreadthFirst,
    /// Recursive, deepest first.
    DepthFirst,
}

/// A registered traversal.
#[derive(Debug, Clone, Copy)]
pub struct GraphTraversal {
    kind: TraversalKind,
}

impl GraphTraversal {
    /// Create a traversal algorithm.
    pub fn new(kind: TraversalKind) -> Self {
        Self { kind }
    }

    fn graph_input(&self, input: &RunInput) -> Result<(Graph, String)> {
        match input {
            RunInput::Graph {
                nodes,
                edges,
                start,
            } => {
                let graph = Graph::build(nodes, edges)?;
                if !graph.contains(start) {
                    return Err(StepwiseError::invalid(
                        "start",
                        format!("'{}' is not a vertex of the graph", start),
                    ));
                }
                Ok((graph, start.clone()))
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for GraphTraversal {
    fn info(&self) -> AlgorithmInfo {
        let info = match self.kind {
            TraversalKind::BreadthFirst => AlgorithmInfo::new("bfs", AlgorithmCategory::Graph)
                .with_display_name("Breadth-First Search")
                .with_description("FIFO traversal; checkpoints each dequeue and each first visit"),
            TraversalKind::DepthFirst => AlgorithmInfo::new("dfs", AlgorithmCategory::Graph)
                .with_display_name("Depth-First Search")
                .with_description("Recursive traversal; checkpoints on entry and on each edge into a visited vertex"),
        };
        info.with_input("graph")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.graph_input(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (graph, start) = self.graph_input(&input)?;
            let order = match self.kind {
                TraversalKind::BreadthFirst => breadth_first(ctx, &graph, &start).await?,
                TraversalKind::DepthFirst => depth_first(ctx, &graph, &start).await?,
            };
            Ok(RunOutcome::Traversal { order })
        })
    }
}

/// Shared traversal bookkeeping.
#[derive(Debug, Default)]
struct Walk {
    visited: HashSet<String>,
    order: Vec<String>,
}

impl Walk {
    /// Mark a vertex visited; false if it already was.
    fn visit(&mut self, vertex: &str) -> bool {
        if !self.visited.insert(vertex.to_string()) {
            return false;
        }
        self.order.push(vertex.to_string());
        true
    }

    fn seen(&self, vertex: &str) -> bool {
        self.visited.contains(vertex)
    }

    async fn emit(
        &self,
        ctx: &StepContext,
        current: &str,
        frontier: Vec<String>,
        kind: StepKind,
    ) -> Result<()> {
        let frame = TraversalFrame {
            current: Some(current.to_string()),
            visited: self.order.clone(),
            frontier,
        };
        ctx.checkpoint(Subject::Traversal(frame), Highlight::vertex(current), kind)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn edges_are_directed() {
        let graph = Graph::build(&names(&["a", "b"]), &[GraphEdge::new("a", "b")]).unwrap();
        assert_eq!(graph.neighbors("a"), &["b".to_string()]);
        assert!(graph.neighbors("b").is_empty());
    }

    #[test]
    fn rejects_unknown_vertices() {
        let err = Graph::build(&names(&["a"]), &[GraphEdge::new("a", "z")]).unwrap_err();
        assert!(err.to_string().contains("unknown vertex"));

        let err = Graph::build(&names(&["a", "a"]), &[]).unwrap_err();
        assert!(err.to_string().contains("listed twice"));

        let traversal = GraphTraversal::new(TraversalKind::BreadthFirst);
        let err = traversal
            .validate(&RunInput::Graph {
                nodes: names(&["a"]),
                edges: vec![],
                start: "q".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.code(), "E101");
    }
}
