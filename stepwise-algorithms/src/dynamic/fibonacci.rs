use crate::input::check_at_most;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::RunInput;

/// Largest `n` whose table fits comfortably in `i64`.
pub const MAX_FIBONACCI_N: usize = 90;

/// Bottom-up fibonacci table `F(0)..=F(n)`.
///
/// The seeds `F(0)` and `F(1)` are written without a checkpoint, so `n - 1`
/// fill checkpoints are emitted for `n >= 1`.
pub async fn fibonacci(ctx: &StepContext, n: usize) -> Result<Vec<i64>> {
    let mut table = vec![0i64; n + 1];
    if n >= 1 {
        table[1] = 1;
    }

    for i in 2..=n {
        table[i] = table[i - 1] + table[i - 2];
        ctx.checkpoint(
            Subject::Array(table.clone()),
            Highlight::index(i),
            StepKind::Fill,
        )
        .await?;
    }

    Ok(table)
}

/// Registered fibonacci table.
#[derive(Debug, Clone, Copy)]
pub struct Fibonacci;

impl Fibonacci {
    fn size(&self, input: &RunInput) -> Result<usize> {
        match input {
            RunInput::Fibonacci { n } => {
                check_at_most("n", *n, MAX_FIBONACCI_N)?;
                Ok(*n)
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for Fibonacci {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("fibonacci", AlgorithmCategory::DynamicProgramming)
            .with_display_name("Fibonacci")
            .with_description("Fills F(0)..=F(n) bottom-up")
            .with_input("fibonacci")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.size(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let n = self.size(&input)?;
            let table = fibonacci(ctx, n).await?;
            let answer = table[n];
            Ok(RunOutcome::Sequence { table, answer })
        })
    }
}
