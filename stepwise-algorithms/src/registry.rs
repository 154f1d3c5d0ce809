//! Algorithm trait and name-based registry.
//!
//! Every algorithm is registered under a stable snake_case name. The run
//! controller resolves the requested name here, validates the input with
//! [`Algorithm::validate`] before anything is spawned, and then drives
//! [`Algorithm::run`] inside the run task.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, TreeKind};
use stepwise_core::scheduler::Pacing;

/// Family an algorithm belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmCategory {
    /// Comparison sorts.
    Sorting,
    /// Array searches.
    Searching,
    /// Graph traversals.
    Graph,
    /// Dynamic programming tables.
    DynamicProgramming,
    /// Greedy constructions.
    Greedy,
    /// Backtracking searches.
    Backtracking,
    /// Self-balancing and plain search trees.
    Tree,
}

impl AlgorithmCategory {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sorting => "sorting",
            Self::Searching => "searching",
            Self::Graph => "graph",
            Self::DynamicProgramming => "dynamic_programming",
            Self::Greedy => "greedy",
            Self::Backtracking => "backtracking",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about an algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmInfo {
    /// Registry name (e.g., `quick_sort`).
    pub name: String,
    /// Family.
    pub category: AlgorithmCategory,
    /// Human-readable name.
    pub display_name: String,
    /// What the algorithm does and what it checkpoints.
    pub description: String,
    /// The [`RunInput`] kind it accepts.
    pub input_kind: String,
}

impl AlgorithmInfo {
    /// Create new algorithm info.
    pub fn new(name: impl Into<String>, category: AlgorithmCategory) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            category,
            description: String::new(),
            input_kind: String::new(),
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the accepted input kind.
    pub fn with_input(mut self, input_kind: impl Into<String>) -> Self {
        self.input_kind = input_kind.into();
        self
    }

    /// Error for an input of the wrong kind.
    pub fn mismatch(&self, input: &RunInput) -> StepwiseError {
        StepwiseError::InputMismatch {
            algorithm: self.name.clone(),
            expected: self.input_kind.clone(),
            actual: input.kind_name().to_string(),
        }
    }
}

/// An instrumented algorithm.
///
/// # Example
///
/// ```ignore
/// struct Reverse;
///
/// impl Algorithm for Reverse {
///     fn info(&self) -> AlgorithmInfo {
///         AlgorithmInfo::new("reverse", AlgorithmCategory::Sorting).with_input("array")
///     }
///
///     fn validate(&self, input: &RunInput) -> Result<()> {
///         array_input(&self.info(), input).map(|_| ())
///     }
///
///     fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
///         Box::pin(async move {
///             let (mut values, _) = array_input(&self.info(), &input)?;
///             values.reverse();
///             ctx.checkpoint_plain(Subject::Array(values.clone()), StepKind::Final).await?;
///             Ok(RunOutcome::Sorted { values })
///         })
///     }
/// }
/// ```
pub trait Algorithm: Send + Sync {
    /// Metadata for listing and dispatch.
    fn info(&self) -> AlgorithmInfo;

    /// Check the input before a run is started.
    ///
    /// # Errors
    /// Returns `InputMismatch` or `InvalidParameter`.
    fn validate(&self, input: &RunInput) -> Result<()>;

    /// Execute against a step context, emitting checkpoints as it goes.
    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome>;

    /// Post-checkpoint pacing this algorithm wants.
    ///
    /// Tree operations animate descent at a fixed traversal delay; everything
    /// else follows the playback speed.
    fn pacing(&self, traversal_delay: std::time::Duration) -> Pacing {
        let _ = traversal_delay;
        Pacing::Speed
    }
}

/// Name-indexed collection of algorithms.
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, Arc<dyn Algorithm>>,
}

impl AlgorithmRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an algorithm under its info name, replacing any previous one.
    pub fn register(&mut self, algorithm: Arc<dyn Algorithm>) {
        let name = algorithm.info().name;
        self.algorithms.insert(name, algorithm);
    }

    /// Resolve a name.
    ///
    /// # Errors
    /// Returns `UnknownAlgorithm` when nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Algorithm>> {
        self.algorithms
            .get(name)
            .cloned()
            .ok_or_else(|| StepwiseError::UnknownAlgorithm {
                name: name.to_string(),
            })
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    /// Metadata of every registered algorithm, sorted by name.
    pub fn list(&self) -> Vec<AlgorithmInfo> {
        self.algorithms.values().map(|a| a.info()).collect()
    }

    /// Metadata of one family.
    pub fn by_category(&self, category: AlgorithmCategory) -> Vec<AlgorithmInfo> {
        self.list()
            .into_iter()
            .filter(|info| info.category == category)
            .collect()
    }

    /// Number of registered algorithms.
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Registry with every built-in algorithm.
    pub fn standard() -> Self {
        use crate::backtracking::{NQueens, Sudoku};
        use crate::dynamic::{Fibonacci, Knapsack, LongestCommonSubsequence, LongestIncreasing};
        use crate::graph::{GraphTraversal, TraversalKind};
        use crate::greedy::{ActivitySelection, HuffmanCoding};
        use crate::searching::{SearchAlgorithm, SearchKind};
        use crate::sorting::{SortAlgorithm, SortKind};
        use crate::tree::TreeAlgorithm;

        let mut registry = Self::new();

        for kind in SortKind::ALL {
            registry.register(Arc::new(SortAlgorithm::new(kind)));
        }
        registry.register(Arc::new(SearchAlgorithm::new(SearchKind::Linear)));
        registry.register(Arc::new(SearchAlgorithm::new(SearchKind::Binary)));
        registry.register(Arc::new(GraphTraversal::new(TraversalKind::BreadthFirst)));
        registry.register(Arc::new(GraphTraversal::new(TraversalKind::DepthFirst)));

        registry.register(Arc::new(Fibonacci));
        registry.register(Arc::new(Knapsack));
        registry.register(Arc::new(LongestCommonSubsequence));
        registry.register(Arc::new(LongestIncreasing));

        registry.register(Arc::new(ActivitySelection));
        registry.register(Arc::new(HuffmanCoding));

        registry.register(Arc::new(NQueens));
        registry.register(Arc::new(Sudoku));

        for kind in [TreeKind::Bst, TreeKind::Avl, TreeKind::RedBlack] {
            registry.register(Arc::new(TreeAlgorithm::new(kind)));
        }

        registry
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.algorithms.keys().collect::<Vec<_>>())
            .finish()
    }
}
