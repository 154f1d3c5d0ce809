use crate::input::array_input;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::RunInput;

/// Longest strictly increasing subsequence, quadratic table.
///
/// `lis[i]` is the longest run ending at `i`. A checkpoint highlighting
/// `(j, i)` is emitted whenever extending from `j` improves `lis[i]`.
pub async fn longest_increasing_subsequence(ctx: &StepContext, values: &[i64]) -> Result<Vec<i64>> {
    let mut lis = vec![1i64; values.len()];

    for i in 1..values.len() {
        for j in 0..i {
            if values[j] < values[i] && lis[j] + 1 > lis[i] {
                lis[i] = lis[j] + 1;
                ctx.checkpoint(Subject::Array(lis.clone()), Highlight::pair(j, i), StepKind::Fill)
                    .await?;
            }
        }
    }

    Ok(lis)
}

/// Registered LIS.
#[derive(Debug, Clone, Copy)]
pub struct LongestIncreasing;

impl Algorithm for LongestIncreasing {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("lis", AlgorithmCategory::DynamicProgramming)
            .with_display_name("Longest Increasing Subsequence")
            .with_description("Longest strictly increasing run ending at each index")
            .with_input("array")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        array_input(&self.info(), input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (values, _) = array_input(&self.info(), &input)?;
            let table = longest_increasing_subsequence(ctx, &values).await?;
            let answer = table.iter().copied().max().unwrap_or(0);
            Ok(RunOutcome::Sequence { table, answer })
        })
    }
}
