//! Comparison sorts.
//!
//! Every sort follows the same checkpoint discipline:
//!
//! - `Compare` with the pair highlighted, before anything moves
//! - `Swap` or `Write` right after the array changes
//! - a single `Final` with no highlight once the array is sorted
//!
//! [`SortOrder`] flips every comparison, so each sort handles ascending and
//! descending input through the same code path.

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use bubble::bubble_sort;
pub use insertion::insertion_sort;
pub use merge::merge_sort;
pub use quick::{INSERTION_CUTOFF, quick_sort};
pub use selection::selection_sort;

use crate::input::array_input;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, SortOrder};

/// Which sort to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Bubble sort with early exit.
    Bubble,
    /// Selection sort.
    Selection,
    /// Insertion sort.
    Insertion,
    /// Top-down merge sort.
    Merge,
    /// Median-of-three quicksort.
    Quick,
}

impl SortKind {
    /// Every sort, in registry order.
    pub const ALL: [SortKind; 5] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Merge,
        Self::Quick,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bubble => "bubble_sort",
            Self::Selection => "selection_sort",
            Self::Insertion => "insertion_sort",
            Self::Merge => "merge_sort",
            Self::Quick => "quick_sort",
        }
    }
}

/// A registered sort.
#[derive(Debug, Clone, Copy)]
pub struct SortAlgorithm {
    kind: SortKind,
}

impl SortAlgorithm {
    /// Create a sort algorithm.
    pub fn new(kind: SortKind) -> Self {
        Self { kind }
    }
}

impl Algorithm for SortAlgorithm {
    fn info(&self) -> AlgorithmInfo {
        let (display, description) = match self.kind {
            SortKind::Bubble => (
                "Bubble Sort",
                "Repeatedly swaps adjacent out-of-order pairs; stops after a pass without swaps",
            ),
            SortKind::Selection => (
                "Selection Sort",
                "Selects the extreme remaining element and swaps it into place",
            ),
            SortKind::Insertion => (
                "Insertion Sort",
                "Sinks each element left until it meets an in-order neighbor",
            ),
            SortKind::Merge => (
                "Merge Sort",
                "Splits recursively and merges halves back through an auxiliary copy",
            ),
            SortKind::Quick => (
                "Quick Sort",
                "Median-of-three partitioning; small ranges finish with insertion sort",
            ),
        };
        AlgorithmInfo::new(self.kind.name(), AlgorithmCategory::Sorting)
            .with_display_name(display)
            .with_description(description)
            .with_input("array")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        array_input(&self.info(), input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (values, order) = array_input(&self.info(), &input)?;
            let values = match self.kind {
                SortKind::Bubble => bubble_sort(ctx, values, order).await?,
                SortKind::Selection => selection_sort(ctx, values, order).await?,
                SortKind::Insertion => insertion_sort(ctx, values, order).await?,
                SortKind::Merge => merge_sort(ctx, values, order).await?,
                SortKind::Quick => quick_sort(ctx, values, order).await?,
            };
            Ok(RunOutcome::Sorted { values })
        })
    }
}

async fn compare(ctx: &StepContext, values: &[i64], i: usize, j: usize) -> Result<()> {
    ctx.checkpoint(
        Subject::Array(values.to_vec()),
        Highlight::pair(i, j),
        StepKind::Compare,
    )
    .await?;
    Ok(())
}

async fn swapped(ctx: &StepContext, values: &[i64], i: usize, j: usize) -> Result<()> {
    ctx.checkpoint(
        Subject::Array(values.to_vec()),
        Highlight::pair(i, j),
        StepKind::Swap,
    )
    .await?;
    Ok(())
}

async fn written(ctx: &StepContext, values: &[i64], index: usize) -> Result<()> {
    ctx.checkpoint(
        Subject::Array(values.to_vec()),
        Highlight::index(index),
        StepKind::Write,
    )
    .await?;
    Ok(())
}

async fn finish(ctx: &StepContext, values: &[i64]) -> Result<()> {
    ctx.checkpoint_plain(Subject::Array(values.to_vec()), StepKind::Final)
        .await?;
    Ok(())
}

/// Insertion sort over the inclusive range `lo..=hi`.
async fn insertion_range(
    ctx: &StepContext,
    values: &mut [i64],
    lo: usize,
    hi: usize,
    order: SortOrder,
) -> Result<()> {
    for i in lo + 1..=hi {
        let mut j = i;
        while j > lo {
            compare(ctx, values, j - 1, j).await?;
            if !order.should_swap(values[j - 1], values[j]) {
                break;
            }
            values.swap(j - 1, j);
            swapped(ctx, values, j - 1, j).await?;
            j -= 1;
        }
    }
    Ok(())
}
