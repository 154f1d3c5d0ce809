use crate::input::check_at_most;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::RunInput;

/// Largest accepted item count.
pub const MAX_ITEMS: usize = 50;

/// Largest accepted capacity.
pub const MAX_CAPACITY: usize = 200;

/// 0/1 knapsack table.
///
/// `dp[i][w]` is the best value using the first `i` items within weight `w`.
/// Row 0 is the empty prefix and stays zero; every other cell gets a fill
/// checkpoint.
pub async fn knapsack(
    ctx: &StepContext,
    values: &[i64],
    weights: &[usize],
    capacity: usize,
) -> Result<Vec<Vec<i64>>> {
    let items = values.len();
    let mut dp = vec![vec![0i64; capacity + 1]; items + 1];

    for i in 1..=items {
        let (value, weight) = (values[i - 1], weights[i - 1]);
        for w in 0..=capacity {
            let skip = dp[i - 1][w];
            dp[i][w] = if weight <= w {
                let take = dp[i - 1][w - weight]
                    .checked_add(value)
                    .ok_or_else(overflow)?;
                skip.max(take)
            } else {
                skip
            };
            ctx.checkpoint(Subject::Table(dp.clone()), Highlight::cell(i, w), StepKind::Fill)
                .await?;
        }
    }

    Ok(dp)
}

fn overflow() -> StepwiseError {
    StepwiseError::invalid("values", "total item value overflows")
}

/// Registered knapsack.
#[derive(Debug, Clone, Copy)]
pub struct Knapsack;

impl Knapsack {
    fn parts<'i>(&self, input: &'i RunInput) -> Result<(&'i [i64], &'i [usize], usize)> {
        match input {
            RunInput::Knapsack {
                values,
                weights,
                capacity,
            } => {
                if values.len() != weights.len() {
                    return Err(StepwiseError::invalid(
                        "weights",
                        format!(
                            "{} weights for {} values; every item needs both",
                            weights.len(),
                            values.len()
                        ),
                    ));
                }
                if values.is_empty() {
                    return Err(StepwiseError::invalid("values", "must not be empty"));
                }
                if let Some(v) = values.iter().find(|v| **v < 0) {
                    return Err(StepwiseError::invalid(
                        "values",
                        format!("item value {} is negative", v),
                    ));
                }
                if values
                    .iter()
                    .try_fold(0i64, |total, v| total.checked_add(*v))
                    .is_none()
                {
                    return Err(overflow());
                }
                check_at_most("values", values.len(), MAX_ITEMS)?;
                check_at_most("capacity", *capacity, MAX_CAPACITY)?;
                Ok((values.as_slice(), weights.as_slice(), *capacity))
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for Knapsack {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("knapsack", AlgorithmCategory::DynamicProgramming)
            .with_display_name("0/1 Knapsack")
            .with_description("Best total value per item prefix and capacity")
            .with_input("knapsack")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.parts(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (values, weights, capacity) = self.parts(&input)?;
            let table = knapsack(ctx, values, weights, capacity).await?;
            let answer = table[values.len()][capacity];
            Ok(RunOutcome::Table { table, answer })
        })
    }
}
