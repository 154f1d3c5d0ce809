//! Backtracking searches.
//!
//! Both searches follow place, recurse, undo. A `Place` checkpoint follows
//! every placement and a `Remove` checkpoint every undo, so each placed
//! piece that is later taken back has a matching removal. A completed board
//! is recorded as a [`Solution`] together with the sequence number of the
//! `Solved` checkpoint that revealed it. The search stops early once its
//! [`SolutionLimit`] is reached; otherwise it finishes with `Exhausted`.

mod n_queens;
mod sudoku;

pub use n_queens::{MAX_QUEENS, NQueens, solve_n_queens};
pub use sudoku::{Sudoku, solve_sudoku};

use stepwise_core::checkpoint::{StepKind, Subject};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::outcome::{RunOutcome, Solution};
use stepwise_core::params::SolutionLimit;

/// Solutions collected so far and when to stop.
#[derive(Debug)]
struct SolutionLog {
    limit: SolutionLimit,
    solutions: Vec<Solution>,
}

impl SolutionLog {
    fn new(limit: SolutionLimit) -> Self {
        Self {
            limit,
            solutions: Vec::new(),
        }
    }

    /// Record a completed board; true when the search should stop.
    async fn record(&mut self, ctx: &StepContext, board: &[Vec<u8>]) -> Result<bool> {
        let seq = ctx
            .checkpoint_plain(Subject::Board(board.to_vec()), StepKind::Solved)
            .await?;
        self.solutions.push(Solution {
            board: board.to_vec(),
            seq,
        });
        tracing::debug!(found = self.solutions.len(), seq, "Solution recorded");
        Ok(self.limit.reached(self.solutions.len()))
    }

    /// Close the search, emitting `Exhausted` when it ran to the end.
    async fn finish(
        self,
        ctx: &StepContext,
        board: &[Vec<u8>],
        stopped: bool,
    ) -> Result<RunOutcome> {
        if !stopped {
            ctx.checkpoint_plain(Subject::Board(board.to_vec()), StepKind::Exhausted)
                .await?;
        }
        Ok(RunOutcome::Solutions {
            solutions: self.solutions,
            exhausted: !stopped,
        })
    }
}
