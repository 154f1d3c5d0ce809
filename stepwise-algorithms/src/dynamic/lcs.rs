use crate::input::check_at_most;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::RunInput;

/// Longest accepted string, in characters.
pub const MAX_SEQUENCE_LEN: usize = 60;

/// Longest common subsequence length table.
pub async fn longest_common_subsequence(
    ctx: &StepContext,
    first: &str,
    second: &str,
) -> Result<Vec<Vec<i64>>> {
    let a: Vec<char> = first.chars().collect();
    let b: Vec<char> = second.chars().collect();
    let mut dp = vec![vec![0i64; b.len() + 1]; a.len() + 1];

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
            ctx.checkpoint(Subject::Table(dp.clone()), Highlight::cell(i, j), StepKind::Fill)
                .await?;
        }
    }

    Ok(dp)
}

/// Registered LCS.
#[derive(Debug, Clone, Copy)]
pub struct LongestCommonSubsequence;

impl LongestCommonSubsequence {
    fn strings<'i>(&self, input: &'i RunInput) -> Result<(&'i str, &'i str)> {
        match input {
            RunInput::Sequences { first, second } => {
                check_at_most("first", first.chars().count(), MAX_SEQUENCE_LEN)?;
                check_at_most("second", second.chars().count(), MAX_SEQUENCE_LEN)?;
                Ok((first.as_str(), second.as_str()))
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for LongestCommonSubsequence {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("lcs", AlgorithmCategory::DynamicProgramming)
            .with_display_name("Longest Common Subsequence")
            .with_description("Prefix-by-prefix LCS lengths of two strings")
            .with_input("sequences")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.strings(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (first, second) = self.strings(&input)?;
            let table = longest_common_subsequence(ctx, first, second).await?;
            let answer = table
                .last()
                .and_then(|row| row.last())
                .copied()
                .unwrap_or(0);
            Ok(RunOutcome::Table { table, answer })
        })
    }
}
