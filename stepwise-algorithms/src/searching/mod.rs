//! Array searches.
//!
//! One checkpoint per probed index, emitted before the probe's outcome is
//! acted on. The probe that hits the target is labeled `Found`; all others
//! are `Probe`. The checkpoint count therefore equals the number of
//! elements examined.

mod binary;
mod linear;

pub use binary::binary_search;
pub use linear::linear_search;

use crate::input::search_input;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, SortOrder};

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// Left-to-right scan.
    Linear,
    /// Halving search over sorted input.
    Binary,
}

/// Where a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Index of the target, if present.
    pub index: Option<usize>,
    /// Number of indices probed.
    pub probes: usize,
}

/// A registered search.
#[derive(Debug, Clone, Copy)]
pub struct SearchAlgorithm {
    kind: SearchKind,
}

impl SearchAlgorithm {
    /// Create a search algorithm.
    pub fn new(kind: SearchKind) -> Self {
        Self { kind }
    }
}

impl Algorithm for SearchAlgorithm {
    fn info(&self) -> AlgorithmInfo {
        let info = match self.kind {
            SearchKind::Linear => AlgorithmInfo::new("linear_search", AlgorithmCategory::Searching)
                .with_display_name("Linear Search")
                .with_description("Scans left to right until the target is found"),
            SearchKind::Binary => AlgorithmInfo::new("binary_search", AlgorithmCategory::Searching)
                .with_display_name("Binary Search")
                .with_description("Halves an ascending array around the midpoint"),
        };
        info.with_input("search")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        let (values, _) = search_input(&self.info(), input)?;
        if self.kind == SearchKind::Binary && !SortOrder::Ascending.is_sorted(&values) {
            return Err(StepwiseError::invalid(
                "values",
                "binary search needs the values in ascending order",
            ));
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            self.validate(&input)?;
            let (values, target) = search_input(&self.info(), &input)?;
            let result = match self.kind {
                SearchKind::Linear => linear_search(ctx, values, target).await?,
                SearchKind::Binary => binary_search(ctx, values, target).await?,
            };
            Ok(RunOutcome::Search {
                index: result.index,
                probes: result.probes,
            })
        })
    }
}

async fn probe(ctx: &StepContext, values: &[i64], index: usize, hit: bool) -> Result<()> {
    let kind = if hit { StepKind::Found } else { StepKind::Probe };
    ctx.checkpoint(Subject::Array(values.to_vec()), Highlight::index(index), kind)
        .await?;
    Ok(())
}
